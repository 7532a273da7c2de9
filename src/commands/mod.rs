//! Command parsing and dispatch.
//!
//! This module keeps splitting, alias resolution and routing separate,
//! so each stage is unit-testable without wiring up a whole client.

pub mod aliases;
pub mod definitions;
pub mod dispatcher;
pub mod splitter;

pub use aliases::{expand_args, AliasEntry, AliasRegistry};
pub use definitions::{
    ArgMode, Args, CharsetEncoder, CommandSpec, CommandTable, Handler, HandlerError,
    HandlerResult, IdentityEncoder, NoPlugins, PluginDispatch, PluginHost, Scope,
};
pub use dispatcher::{is_command, CommandDispatcher, COMMAND_MARKER};
pub use splitter::{split_top_level, tokenize};
