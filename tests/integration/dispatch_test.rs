//! End-to-end dispatch behavior across the routing layers.

use chatline::commands::{
    is_command, CommandDispatcher, CommandTable, PluginDispatch, PluginHost, Scope,
};
use chatline::error::CommandError;
use pretty_assertions::assert_eq;

use super::common::{client_dispatcher, connected_scope, CallLog};

#[test]
fn chat_text_is_not_a_command() {
    assert!(!is_command("hello everyone"));
    assert!(!is_command("//me shrugs"));
    assert!(is_command("/me shrugs"));
}

#[test]
fn builtin_command_runs_with_arguments() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    dispatcher
        .dispatch(&connected_scope(), "/say hello there")
        .unwrap();
    assert_eq!(log.borrow().as_slice(), ["say:hello there"]);
}

#[test]
fn arity_violations_report_before_running() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    let err = dispatcher.dispatch(&connected_scope(), "/nick").unwrap_err();
    assert_eq!(
        err.to_string(),
        "wrong argument count for command \"/nick\" (expected: 1, got: 0)"
    );

    let err = dispatcher
        .dispatch(&connected_scope(), "/join #a #b #c")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "wrong argument count for command \"/join\" (expected: between 1 and 2, got: 3)"
    );
    assert!(log.borrow().is_empty());
}

#[test]
fn protocol_commands_check_connection() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    let err = dispatcher
        .dispatch(&Scope::offline("libera"), "/join #dev")
        .unwrap_err();
    assert!(matches!(err, CommandError::PreconditionFailed { .. }));

    dispatcher
        .dispatch(&connected_scope(), "/join #dev")
        .unwrap();
    assert_eq!(log.borrow().as_slice(), ["join:#dev"]);
}

#[test]
fn dcc_scope_blocks_marked_commands() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    let scope = Scope {
        connected: true,
        dcc: true,
        ..Scope::default()
    };
    let err = dispatcher.dispatch(&scope, "/topic new topic").unwrap_err();
    assert!(matches!(err, CommandError::PreconditionFailed { .. }));
    assert!(log.borrow().is_empty());
}

#[test]
fn unknown_command_names_the_command() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    let err = dispatcher
        .dispatch(&connected_scope(), "/no_such_thing")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown command \"/no_such_thing\" (type /help for help)"
    );
}

struct ScriptPlugin;

impl PluginHost for ScriptPlugin {
    fn run_command(&self, name: &str, _args: Option<&str>, _scope: &Scope) -> PluginDispatch {
        match name {
            "script" => PluginDispatch::Handled,
            // shadows the builtin on purpose
            "clear" => PluginDispatch::Handled,
            _ => PluginDispatch::NotFound,
        }
    }

    fn command_names(&self) -> Vec<String> {
        vec!["script".to_string()]
    }

    fn completion_template(&self, _name: &str) -> Option<String> {
        Some("load|unload".to_string())
    }

    fn custom_candidates(&self, _name: &str) -> Vec<String> {
        Vec::new()
    }
}

#[test]
fn plugins_outrank_builtins() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log).with_plugin_host(ScriptPlugin);

    dispatcher.dispatch(&connected_scope(), "/clear").unwrap();
    // the builtin handler never ran
    assert!(log.borrow().is_empty());
}

#[test]
fn builtin_escape_hatch_skips_plugins_and_aliases() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log).with_plugin_host(ScriptPlugin);
    dispatcher
        .aliases_mut()
        .register("say", "/join #elsewhere")
        .unwrap();

    dispatcher
        .dispatch(&connected_scope(), "/builtin clear")
        .unwrap();
    dispatcher
        .dispatch(&connected_scope(), "/builtin say hi")
        .unwrap();
    assert_eq!(log.borrow().as_slice(), ["clear:", "say:hi"]);
}

#[test]
fn alias_multi_command_inherits_args_on_last_only() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);
    dispatcher
        .aliases_mut()
        .register("x", "/clear;/say")
        .unwrap();

    dispatcher.dispatch(&connected_scope(), "/x hello").unwrap();
    assert_eq!(log.borrow().as_slice(), ["clear:", "say:hello"]);
}

#[test]
fn circular_aliases_execute_nothing() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);
    dispatcher.aliases_mut().register("a", "/b").unwrap();
    dispatcher.aliases_mut().register("b", "/a").unwrap();

    let err = dispatcher.dispatch(&connected_scope(), "/a").unwrap_err();
    assert!(matches!(err, CommandError::CircularReference(_)));
    assert!(log.borrow().is_empty());
}

#[test]
fn escaped_separator_stays_in_one_command() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);
    dispatcher
        .aliases_mut()
        .register("wink", "/say \\;-) see you;/say twice")
        .unwrap();

    // the escaped ';' is literal text, the unescaped one splits
    dispatcher.dispatch(&connected_scope(), "/wink").unwrap();
    assert_eq!(log.borrow().as_slice(), ["say:;-) see you", "say:twice"]);
}

#[test]
fn failed_sub_command_stops_the_expansion() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);
    dispatcher
        .aliases_mut()
        .register("broken", "/nope;/say after")
        .unwrap();

    let err = dispatcher.dispatch(&connected_scope(), "/broken").unwrap_err();
    assert!(matches!(err, CommandError::UnknownCommand(_)));
    assert!(log.borrow().is_empty());

    // the in_progress flag did not leak
    dispatcher.dispatch(&connected_scope(), "/broken").unwrap_err();
}

#[test]
fn alias_management_commands_round_trip() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    dispatcher
        .dispatch(&connected_scope(), "/alias hi say hello $1")
        .unwrap();
    dispatcher.dispatch(&connected_scope(), "/hi world").unwrap();
    assert_eq!(log.borrow().as_slice(), ["say:hello world"]);

    dispatcher.dispatch(&connected_scope(), "/unalias hi").unwrap();
    let err = dispatcher.dispatch(&connected_scope(), "/hi").unwrap_err();
    assert!(matches!(err, CommandError::UnknownCommand(_)));
}

#[test]
fn reserved_alias_name_is_rejected() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);

    let err = dispatcher
        .dispatch(&connected_scope(), "/alias builtin say gotcha")
        .unwrap_err();
    assert!(matches!(err, CommandError::ReservedName(_)));
}

#[test]
fn empty_tables_only_know_management_commands() {
    let mut dispatcher = CommandDispatcher::new(CommandTable::new(), CommandTable::new());
    assert!(dispatcher
        .dispatch(&Scope::default(), "/alias")
        .is_ok());
    assert!(dispatcher
        .dispatch(&Scope::default(), "/anything")
        .is_err());
}

#[test]
fn handler_counts_match_sub_command_count() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);
    dispatcher
        .aliases_mut()
        .register("triple", "/say one;/say two;/say three")
        .unwrap();

    dispatcher.dispatch(&connected_scope(), "/triple").unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        ["say:one", "say:two", "say:three"]
    );
}
