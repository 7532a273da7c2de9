//! Error types for chatline.
//!
//! Defines the main error enum used throughout the engine. Every routing
//! failure is a recoverable value handed back to the caller; the engine
//! never panics on user input.

use thiserror::Error;

/// Main error type for command dispatch and registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// An alias expansion re-entered an alias that is still being expanded.
    #[error("circular reference when calling alias \"/{0}\"")]
    CircularReference(String),

    /// Argument count outside the command's declared `[min, max]` range.
    #[error("{}", arity_message(.command, .min, .max, .given))]
    Arity {
        /// Command name (without the leading marker).
        command: String,
        /// Minimum accepted argument count.
        min: usize,
        /// Maximum accepted argument count, `None` for unbounded.
        max: Option<usize>,
        /// Argument count actually supplied.
        given: usize,
    },

    /// No plugin, alias, builtin or protocol command matched the name.
    #[error("unknown command \"/{0}\" (type /help for help)")]
    UnknownCommand(String),

    /// A handler ran and reported failure. The handler owns the detailed
    /// reporting; this is the terse dispatcher-level record.
    #[error("command \"/{0}\" failed")]
    HandlerFailed(String),

    /// A protocol command precondition was not met (not connected, or
    /// command not allowed in a DCC conversation).
    #[error("command \"/{command}\" unavailable: {reason}")]
    PreconditionFailed {
        /// Command name (without the leading marker).
        command: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Could not reserve memory while building a table or candidate list.
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// Attempt to register an alias under a reserved name.
    #[error("alias name \"{0}\" is reserved")]
    ReservedName(String),

    /// Configuration errors (invalid config file, bad option value, etc.)
    #[error("configuration error: {0}")]
    Config(String),
}

fn arity_message(command: &str, min: &usize, max: &Option<usize>, given: &usize) -> String {
    match max {
        Some(max) if max == min => format!(
            "wrong argument count for command \"/{command}\" (expected: {min}, got: {given})"
        ),
        Some(max) => format!(
            "wrong argument count for command \"/{command}\" (expected: between {min} and {max}, got: {given})"
        ),
        None => format!(
            "wrong argument count for command \"/{command}\" (expected: at least {min}, got: {given})"
        ),
    }
}

impl CommandError {
    /// Creates a precondition failure with the given reason.
    pub fn precondition(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Creates an allocation error with the given message.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::CircularReference(_) => "Alias Error",
            Self::Arity { .. } => "Usage Error",
            Self::UnknownCommand(_) => "Unknown Command",
            Self::HandlerFailed(_) => "Command Error",
            Self::PreconditionFailed { .. } => "Command Error",
            Self::Allocation(_) => "Internal Error",
            Self::ReservedName(_) => "Alias Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using CommandError.
pub type Result<T> = std::result::Result<T, CommandError>;
