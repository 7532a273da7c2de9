//! Dynamic candidate sources.
//!
//! The template escapes pull their data from the client through the
//! [`CompletionSources`] trait. Every method has an empty default so a
//! client only wires up what it actually has; [`StaticSources`] is a
//! plain in-memory implementation used in tests and small embeddings.

use std::path::PathBuf;

/// Data the client exposes to completion.
pub trait CompletionSources {
    /// Nicks present in the current channel.
    fn channel_nicks(&self) -> Vec<String> {
        Vec::new()
    }

    /// Nicks that spoke recently, most recent first.
    fn recent_speakers(&self) -> Vec<String> {
        Vec::new()
    }

    /// The user's own nickname.
    fn own_nick(&self) -> Option<String> {
        None
    }

    /// Configured server names.
    fn server_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Channels joined on the current server.
    fn channel_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Name of the current channel.
    fn current_channel(&self) -> Option<String> {
        None
    }

    /// Topic of the current channel.
    fn topic(&self) -> Option<String> {
        None
    }

    /// All configuration option names.
    fn option_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Current value of a configuration option.
    fn option_value(&self, _name: &str) -> Option<String> {
        None
    }

    /// Names of bindable key functions.
    fn key_function_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Names of loaded plugins.
    fn plugin_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Filesystem entries matching a partial path.
    fn file_entries(&self, base_word: &str) -> Vec<String> {
        list_directory(base_word)
    }
}

/// In-memory [`CompletionSources`] implementation.
#[derive(Debug, Clone, Default)]
pub struct StaticSources {
    /// Channel nick roster.
    pub nicks: Vec<String>,
    /// Recent speakers, most recent first.
    pub speakers: Vec<String>,
    /// Own nickname.
    pub own_nick: Option<String>,
    /// Server names.
    pub servers: Vec<String>,
    /// Channels on the current server.
    pub channels: Vec<String>,
    /// Current channel name.
    pub current_channel: Option<String>,
    /// Current channel topic.
    pub topic: Option<String>,
    /// Option names and current values.
    pub options: Vec<(String, String)>,
    /// Key function names.
    pub key_functions: Vec<String>,
    /// Plugin names.
    pub plugins: Vec<String>,
}

impl CompletionSources for StaticSources {
    fn channel_nicks(&self) -> Vec<String> {
        self.nicks.clone()
    }

    fn recent_speakers(&self) -> Vec<String> {
        self.speakers.clone()
    }

    fn own_nick(&self) -> Option<String> {
        self.own_nick.clone()
    }

    fn server_names(&self) -> Vec<String> {
        self.servers.clone()
    }

    fn channel_names(&self) -> Vec<String> {
        self.channels.clone()
    }

    fn current_channel(&self) -> Option<String> {
        self.current_channel.clone()
    }

    fn topic(&self) -> Option<String> {
        self.topic.clone()
    }

    fn option_names(&self) -> Vec<String> {
        self.options.iter().map(|(name, _)| name.clone()).collect()
    }

    fn option_value(&self, name: &str) -> Option<String> {
        self.options
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.clone())
    }

    fn key_function_names(&self) -> Vec<String> {
        self.key_functions.clone()
    }

    fn plugin_names(&self) -> Vec<String> {
        self.plugins.clone()
    }
}

/// Lists directory entries completing a partial path.
///
/// A leading `~` expands to the home directory for the lookup but is
/// kept in the returned candidates, so the user's spelling survives the
/// completion. Directories come back with a trailing `/`. Unreadable
/// paths yield no candidates.
pub fn list_directory(base_word: &str) -> Vec<String> {
    let (typed_dir, prefix) = match base_word.rfind('/') {
        Some(pos) => (&base_word[..pos + 1], &base_word[pos + 1..]),
        None => ("", base_word),
    };

    let lookup_dir = expand_home(typed_dir);
    let read_dir = match std::fs::read_dir(if lookup_dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        lookup_dir
    }) {
        Ok(rd) => rd,
        Err(_) => return Vec::new(),
    };

    let mut entries: Vec<String> = read_dir
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(prefix) || (prefix.is_empty() && name.starts_with('.')) {
                return None;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let suffix = if is_dir { "/" } else { "" };
            Some(format!("{typed_dir}{name}{suffix}"))
        })
        .collect();
    entries.sort_by_key(|e| e.to_lowercase());
    entries
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
