//! Shared fixtures: a small but realistic client command set and an
//! in-memory channel.

use std::cell::RefCell;
use std::rc::Rc;

use chatline::commands::{Args, CommandDispatcher, CommandSpec, CommandTable, Scope};
use chatline::completion::StaticSources;

/// Records which handlers ran and with what arguments.
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Spec whose handler appends `name:args` to the log.
pub fn recording(name: &str, log: &CallLog) -> CommandSpec {
    let log = Rc::clone(log);
    let tag = name.to_string();
    CommandSpec::new(name, "test command")
        .arity(0, None)
        .handler(move |_scope, args| {
            let rendered = match args {
                Args::Raw(s) => s.to_string(),
                Args::Vector(v) => v.join(","),
            };
            log.borrow_mut().push(format!("{tag}:{rendered}"));
            Ok(())
        })
}

/// Dispatcher with a chat-client flavored command set.
pub fn client_dispatcher(log: &CallLog) -> CommandDispatcher {
    let builtin = CommandTable::from_specs(vec![
        recording("clear", log).arity(0, Some(0)),
        recording("say", log),
        recording("help", log).arity(0, Some(1)).completion("%w"),
        recording("set", log).completion("%o %v"),
        recording("connect", log).arity(1, Some(1)).completion("%s"),
    ]);
    let protocol = CommandTable::from_specs(vec![
        recording("join", log)
            .arity(1, Some(2))
            .completion("%C")
            .needs_connection(),
        recording("msg", log).arity(2, None).completion("%n"),
        recording("nick", log).arity(1, Some(1)).needs_connection(),
        recording("part", log).completion("%C|%c %p").needs_connection(),
        recording("topic", log).completion("%c %t").no_dcc(),
    ]);
    CommandDispatcher::new(builtin, protocol)
}

/// A channel with three nicks, one recent speaker, and some servers.
pub fn channel_sources() -> StaticSources {
    StaticSources {
        nicks: vec![
            "zoe".to_string(),
            "alice".to_string(),
            "[dan]".to_string(),
        ],
        speakers: vec!["alice".to_string()],
        own_nick: Some("me".to_string()),
        servers: vec!["libera".to_string(), "oftc".to_string()],
        channels: vec!["#dev".to_string(), "#chat".to_string()],
        current_channel: Some("#dev".to_string()),
        topic: Some("release planning".to_string()),
        options: vec![(
            "completion.nick_completer".to_string(),
            ":".to_string(),
        )],
        ..StaticSources::default()
    }
}

/// Scope for a connected channel buffer.
pub fn connected_scope() -> Scope {
    Scope::channel("libera", "#dev")
}
