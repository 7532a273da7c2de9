//! chatline - command dispatch and tab completion for a terminal chat
//! client.
//!
//! The crate is the interactive command layer only: it parses command
//! lines, expands aliases, routes to command tables and plugins, and
//! drives tab completion. Rendering, networking and scripting live in
//! the embedding client, which talks to this crate through the
//! [`commands::PluginHost`], [`commands::CharsetEncoder`] and
//! [`completion::CompletionSources`] traits.

pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;

pub use commands::{CommandDispatcher, CommandSpec, CommandTable, Scope};
pub use completion::{CandidateProvider, CompletionSession, Direction};
pub use config::{CompletionConfig, Config};
pub use error::{CommandError, Result};
