//! Alias registry.
//!
//! Aliases map a short name to an expansion string, which may contain
//! several `;`-separated sub-commands and positional parameters. The
//! registry keeps entries sorted by name (case-insensitive) so listings
//! and completion come out in a stable order.

use std::cell::Cell;

use tracing::debug;

use crate::error::{CommandError, Result};
use crate::commands::splitter::tokenize;

/// One registered alias.
///
/// `in_progress` marks an alias currently being expanded. The engine is
/// single-threaded, so a `Cell` is enough; the flag only lives for the
/// duration of one dispatch or one template resolution.
#[derive(Debug)]
pub struct AliasEntry {
    name: String,
    expansion: String,
    in_progress: Cell<bool>,
}

impl AliasEntry {
    /// Alias name, without the command marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expansion text as registered.
    pub fn expansion(&self) -> &str {
        &self.expansion
    }

    pub(crate) fn in_progress(&self) -> bool {
        self.in_progress.get()
    }

    pub(crate) fn set_in_progress(&self, value: bool) {
        self.in_progress.set(value);
    }
}

/// Ordered collection of aliases.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    entries: Vec<AliasEntry>,
}

impl AliasRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an alias, replacing the expansion if the name already
    /// exists (case-insensitive; the entry keeps its position and its
    /// original spelling).
    ///
    /// Leading `/` characters are stripped from the name. The name
    /// `builtin` is reserved for the force-builtin dispatch entry point.
    pub fn register(&mut self, name: &str, expansion: &str) -> Result<()> {
        let name = name.trim_start_matches('/');
        if name.is_empty() {
            return Err(CommandError::config("alias name is empty"));
        }
        if name.eq_ignore_ascii_case("builtin") {
            return Err(CommandError::ReservedName(name.to_string()));
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| eq_name(&e.name, name)) {
            debug!(alias = name, "replacing alias expansion");
            entry.expansion = expansion.to_string();
            return Ok(());
        }

        self.entries
            .try_reserve(1)
            .map_err(|e| CommandError::allocation(e.to_string()))?;

        let key = name.to_lowercase();
        let pos = self
            .entries
            .iter()
            .position(|e| e.name.to_lowercase() > key)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            AliasEntry {
                name: name.to_string(),
                expansion: expansion.to_string(),
                in_progress: Cell::new(false),
            },
        );
        Ok(())
    }

    /// Removes an alias by name. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim_start_matches('/');
        match self.entries.iter().position(|e| eq_name(&e.name, name)) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Looks up an alias by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&AliasEntry> {
        let name = name.trim_start_matches('/');
        self.entries.iter().find(|e| eq_name(&e.name, name))
    }

    /// Iterates over entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follows alias-to-alias chains and returns the final command name.
    ///
    /// An expansion beginning with `/other` where `other` is itself an
    /// alias is followed one hop at a time; an expansion carrying
    /// arguments ends the chain. Input that is not an alias comes back
    /// unchanged. Each entry on the chain is flagged `in_progress` for
    /// the duration of its hop; meeting a flagged entry means the chain
    /// loops and resolution fails with [`CommandError::CircularReference`].
    pub fn resolve_final(&self, name: &str) -> Result<String> {
        let entry = match self.get(name) {
            Some(entry) => entry,
            None => return Ok(name.trim_start_matches('/').to_string()),
        };
        if entry.in_progress() {
            return Err(CommandError::CircularReference(entry.name.clone()));
        }

        let target = entry
            .expansion
            .strip_prefix('/')
            .unwrap_or(&entry.expansion);
        if self.get(target).is_none() {
            return Ok(target.to_string());
        }

        entry.set_in_progress(true);
        let result = self.resolve_final(target);
        entry.set_in_progress(false);
        result
    }
}

fn eq_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Substitutes positional parameters in an alias expansion segment.
///
/// `$1` through `$9` insert the corresponding whitespace-separated token
/// of `user_args` (empty if absent), `$*` inserts all of `user_args`,
/// and `\$` produces a literal `$`. When no parameter consumed the
/// arguments and `user_args` is non-empty, a space and the full argument
/// string are appended instead, so plain aliases still forward what the
/// user typed.
pub fn expand_args(expansion: &str, user_args: &str) -> String {
    let tokens = tokenize(user_args, " ", 0);
    let mut out = String::with_capacity(expansion.len() + user_args.len());
    let mut args_used = false;
    let mut chars = expansion.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'$') => {
                out.push('$');
                chars.next();
            }
            '$' => match chars.peek() {
                Some(&d @ '1'..='9') => {
                    let index = d as usize - '1' as usize;
                    if let Some(token) = tokens.get(index) {
                        out.push_str(token);
                    }
                    args_used = true;
                    chars.next();
                }
                Some('*') => {
                    out.push_str(user_args);
                    args_used = true;
                    chars.next();
                }
                _ => out.push('$'),
            },
            _ => out.push(c),
        }
    }

    if !args_used && !user_args.is_empty() {
        out.push(' ');
        out.push_str(user_args);
    }
    out
}
