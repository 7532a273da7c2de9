//! End-to-end completion: context detection, templates and cycling
//! wired together the way a line editor would drive them.

use chatline::completion::{
    find_context, CandidateProvider, CompletionSession, ContextKind, Direction,
};
use chatline::config::CompletionConfig;
use pretty_assertions::assert_eq;

use super::common::{channel_sources, client_dispatcher, CallLog};

#[test]
fn command_names_complete_after_the_marker() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let r = session
        .search(&provider, Direction::Forward, "/con", 4)
        .unwrap();
    assert_eq!(r.word, "connect");
    assert_eq!(r.position, 1);
    // "/con" grows to "/connect"
    assert_eq!(r.size_delta, 4);
}

#[test]
fn server_argument_completes_from_sources() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let r = session
        .search(&provider, Direction::Forward, "/connect li", 11)
        .unwrap();
    assert_eq!(r.word, "libera");
    assert_eq!(r.position, 9);
}

#[test]
fn completion_template_is_reached_through_an_alias() {
    let log = CallLog::default();
    let mut dispatcher = client_dispatcher(&log);
    dispatcher.aliases_mut().register("co", "/connect").unwrap();
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let r = session
        .search(&provider, Direction::Forward, "/co o", 5)
        .unwrap();
    assert_eq!(r.word, "oftc");
}

#[test]
fn nick_cycling_walks_the_roster() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    // /msg completes nicks; typing "da" matches "[dan]" via ignored chars
    let r = session
        .search(&provider, Direction::Forward, "/msg da", 7)
        .unwrap();
    assert_eq!(r.word, "[dan]");
}

#[test]
fn chat_text_completes_nicks_with_completer_at_line_start() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let r = session
        .search(&provider, Direction::Forward, "al", 2)
        .unwrap();
    assert_eq!(r.word, "alice:");
    assert!(r.add_space);
}

#[test]
fn tab_cycles_through_matches_and_wraps() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    // both "help" and "hel"-free commands: /help matches only one entry,
    // so cycle over nicks instead where several match
    let first = session
        .search(&provider, Direction::Forward, "/msg a", 6)
        .unwrap();
    assert_eq!(first.word, "alice");
    let cursor = first.position + first.word.len() + 1;

    let second = session
        .search(&provider, Direction::Forward, "/msg alice ", cursor)
        .unwrap();
    assert_eq!(second.word, "alice");
}

#[test]
fn empty_base_word_in_chat_never_completes() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let ctx = find_context("pasted text ", 12);
    assert_eq!(ctx.kind, ContextKind::None);
    assert!(session
        .search(&provider, Direction::Forward, "pasted text ", 12)
        .is_none());
}

#[test]
fn disabled_and_out_of_range_positions_complete_nothing() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    // /connect takes one completable argument
    assert!(session
        .search(&provider, Direction::Forward, "/connect libera ex", 18)
        .is_none());
}

#[test]
fn option_value_completes_from_previous_argument() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let r = session
        .search(
            &provider,
            Direction::Forward,
            "/set completion.nick_completer ",
            31,
        )
        .unwrap();
    assert_eq!(r.word, ":");
}

#[test]
fn unknown_command_argument_falls_back_to_nicks() {
    let log = CallLog::default();
    let dispatcher = client_dispatcher(&log);
    let sources = channel_sources();
    let config = CompletionConfig::default();
    let provider = CandidateProvider::new(&dispatcher, &sources, &config);
    let mut session = CompletionSession::new();

    let r = session
        .search(&provider, Direction::Forward, "/mystery zo", 11)
        .unwrap();
    assert_eq!(r.word, "zoe");
    assert_eq!(session.context().kind, ContextKind::Nick);
}
