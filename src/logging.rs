//! Logging configuration for chatline.
//!
//! The engine is embedded in a full-screen chat client, so the default
//! initializer writes to a file instead of stderr (stderr would corrupt
//! the terminal display). A stderr variant exists for headless use and
//! test debugging.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes logging for embedded (full-screen client) use.
///
/// Logs go to `~/.local/state/chatline/chatline.log` on Linux (XDG state
/// directory), or the platform-appropriate directory elsewhere. Failure
/// to set up the file silently disables logging rather than writing to
/// the terminal.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging to stderr for headless use.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("chatline").join("chatline.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("chatline").join("chatline.log");
    }

    std::env::temp_dir().join("chatline.log")
}
