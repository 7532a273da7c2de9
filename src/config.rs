//! Configuration management for chatline.
//!
//! Handles loading the engine's look-and-feel options from a TOML file.
//! Everything has a default, so a missing file or a file with only some
//! keys set is fine.

use crate::error::{CommandError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for chatline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Completion look-and-feel options.
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Options controlling nick completion and default message texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Characters ignored when prefix-matching nicknames, so typing
    /// `dan` can complete to `[dan]` or `dan^`.
    #[serde(default = "default_nick_ignore_chars")]
    pub nick_ignore_chars: String,

    /// String appended after a nick completed at the start of the line.
    #[serde(default = "default_nick_completer")]
    pub nick_completer: String,

    /// When true, nicks only complete at the start of the line.
    #[serde(default)]
    pub nick_first_only: bool,

    /// Default message offered when completing the part command.
    #[serde(default)]
    pub default_part_message: String,

    /// Default message offered when completing the quit command.
    #[serde(default)]
    pub default_quit_message: String,
}

fn default_nick_ignore_chars() -> String {
    "[]-^".to_string()
}

fn default_nick_completer() -> String {
    ":".to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            nick_ignore_chars: default_nick_ignore_chars(),
            nick_completer: default_nick_completer(),
            nick_first_only: false,
            default_part_message: String::new(),
            default_quit_message: String::new(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chatline")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CommandError::config(format!("failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CommandError::config(format!("error in {}:\n  {}", path.display(), e))
        })
    }
}
