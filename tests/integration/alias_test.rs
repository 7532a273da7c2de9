//! Alias registry behavior observed through the public API.

use chatline::commands::{expand_args, AliasRegistry};
use chatline::error::CommandError;
use pretty_assertions::assert_eq;

#[test]
fn registrations_come_back_sorted() {
    let mut registry = AliasRegistry::new();
    registry.register("wc", "/window close").unwrap();
    registry.register("J", "/join").unwrap();
    registry.register("ns", "/msg nickserv").unwrap();

    let names: Vec<&str> = registry.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["J", "ns", "wc"]);
}

#[test]
fn re_registration_updates_in_place() {
    let mut registry = AliasRegistry::new();
    registry.register("j", "/join").unwrap();
    registry.register("/J", "/join -noswitch").unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("j").unwrap().name(), "j");
    assert_eq!(registry.get("j").unwrap().expansion(), "/join -noswitch");
}

#[test]
fn resolution_follows_chains_and_stops_at_arguments() {
    let mut registry = AliasRegistry::new();
    registry.register("j", "/jn").unwrap();
    registry.register("jn", "/join").unwrap();
    registry.register("jd", "/join #dev").unwrap();

    assert_eq!(registry.resolve_final("j").unwrap(), "join");
    assert_eq!(registry.resolve_final("jd").unwrap(), "join #dev");
    assert_eq!(registry.resolve_final("join").unwrap(), "join");
}

#[test]
fn three_step_cycle_is_detected() {
    let mut registry = AliasRegistry::new();
    registry.register("a", "/b").unwrap();
    registry.register("b", "/c").unwrap();
    registry.register("c", "/a").unwrap();

    let err = registry.resolve_final("b").unwrap_err();
    assert!(matches!(err, CommandError::CircularReference(_)));

    // registry is fully usable afterwards
    registry.register("d", "/join").unwrap();
    assert_eq!(registry.resolve_final("d").unwrap(), "join");
}

#[test]
fn positional_parameters_pick_tokens() {
    assert_eq!(
        expand_args("/msg $1 you said: $2", "dan hello"),
        "/msg dan you said: hello"
    );
    assert_eq!(expand_args("/away $*", "lunch break"), "/away lunch break");
    assert_eq!(expand_args("/say price is \\$5", ""), "/say price is $5");
}

#[test]
fn unused_arguments_are_appended() {
    assert_eq!(expand_args("/ban", "dan"), "/ban dan");
    assert_eq!(expand_args("/kick $1", "dan for spamming"), "/kick dan");
}
