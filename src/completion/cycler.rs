//! Candidate cycling.
//!
//! A [`CompletionSession`] lives in the client's input state. Every tab
//! press calls [`CompletionSession::search`]; the session decides
//! whether the context is still the one it was built for, picks the
//! next matching candidate, and tells the caller exactly what to splice
//! into the line.

use tracing::trace;
use unicode_width::UnicodeWidthStr;

use crate::completion::candidates::{Candidate, CandidateList};
use crate::completion::context::{find_context, Context, ContextKind};
use crate::completion::provider::CandidateProvider;
use crate::config::CompletionConfig;

/// Which way a tab press walks the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Tab: scan the list front to back.
    Forward,
    /// Shift-tab: scan back to front.
    Backward,
}

/// Edit the caller applies to the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Byte offset where the base word (past the marker in Command
    /// context) gets replaced.
    pub position: usize,
    /// Text to insert, completer suffix included for nicks.
    pub word: String,
    /// Byte growth of the line relative to the previous state.
    pub size_delta: isize,
    /// Display-column growth of the line.
    pub length_delta: isize,
    /// Whether the caller should add a trailing space.
    pub add_space: bool,
}

/// Completion state for one input line.
///
/// Idle until a search finds more than one match; cycling until the
/// cursor moves away from where the last completion left it.
#[derive(Default)]
pub struct CompletionSession {
    context: Context,
    candidates: CandidateList,
    /// Raw candidate last emitted; the skip marker while cycling.
    last_emitted: Option<String>,
    /// Text actually spliced in last time (may carry the completer).
    last_inserted: Option<String>,
    /// Cursor position the session is anchored to; `None` while idle.
    anchor: Option<usize>,
}

impl CompletionSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session is cycling through several matches.
    pub fn is_cycling(&self) -> bool {
        self.anchor.is_some() && self.last_emitted.is_some()
    }

    /// The context the current candidate list was built for.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Drops all state. Call when the candidate data changed under the
    /// session (nick joined, alias added) or the line was cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Finds the next completion for the cursor position.
    ///
    /// Any cursor move since the last call rebuilds the context and the
    /// candidate list. Returns `None` when there is nothing to complete;
    /// completion never surfaces an error.
    pub fn search(
        &mut self,
        provider: &CandidateProvider<'_>,
        direction: Direction,
        line: &str,
        cursor: usize,
    ) -> Option<Replacement> {
        if self.anchor != Some(cursor) {
            self.rebuild(provider, line, cursor);
        }
        if self.context.kind == ContextKind::None || self.candidates.is_empty() {
            return None;
        }

        let config = provider.config();
        let base = self.effective_base().to_string();
        let first_call = self.last_emitted.is_none();
        let (candidate, more_after) = self.next_match(&base, config, direction)?;

        let mut inserted = candidate.word.clone();
        if candidate.is_nick
            && self.context.base_word_start == 0
            && !config.nick_completer.is_empty()
        {
            inserted.push_str(&config.nick_completer);
        }
        let add_space = !inserted.ends_with('/');

        let previous = match &self.last_inserted {
            Some(word) => word.as_str(),
            None => self.context.base_word.as_str(),
        };
        let mut size_delta = inserted.len() as isize - previous.len() as isize;
        let mut length_delta = inserted.width() as isize - previous.width() as isize;
        if first_call && self.context.kind == ContextKind::Command {
            // the marker stays in the line but is not part of the
            // replacement text
            size_delta += 1;
            length_delta += 1;
        }

        let position = self.context.replace_position;
        let next_cursor = position + inserted.len() + usize::from(add_space);
        if first_call && !more_after {
            trace!(word = %candidate.word, "single match, staying idle");
            self.anchor = None;
            self.last_emitted = None;
            self.last_inserted = None;
        } else {
            self.anchor = Some(next_cursor);
            self.last_emitted = Some(candidate.word);
            self.last_inserted = Some(inserted.clone());
        }

        Some(Replacement {
            position,
            word: inserted,
            size_delta,
            length_delta,
            add_space,
        })
    }

    fn rebuild(&mut self, provider: &CandidateProvider<'_>, line: &str, cursor: usize) {
        let mut context = find_context(line, cursor);
        self.last_emitted = None;
        self.last_inserted = None;
        match provider.candidates_for(&context) {
            Some((list, kind)) => {
                context.kind = kind;
                self.candidates = list;
            }
            None => {
                context.kind = ContextKind::None;
                self.candidates = CandidateList::new();
            }
        }
        trace!(kind = ?context.kind, candidates = self.candidates.len(), "rebuilt completion context");
        self.context = context;
        self.anchor = Some(cursor);
    }

    /// The text candidates are matched against; the marker is not part
    /// of it in Command context.
    fn effective_base(&self) -> &str {
        if self.context.kind == ContextKind::Command {
            &self.context.base_word[1..]
        } else {
            &self.context.base_word
        }
    }

    /// Picks the next matching candidate in scan direction.
    ///
    /// While cycling, all matches up to and including the previously
    /// emitted word (compared by value) are skipped. Falling off the
    /// end clears that marker and rescans once, which is what wraps the
    /// cycle around. The returned flag says whether more matches follow
    /// the pick in the scan direction.
    fn next_match(
        &self,
        base: &str,
        config: &CompletionConfig,
        direction: Direction,
    ) -> Option<(Candidate, bool)> {
        let items = self.candidates.items();
        let order: Vec<usize> = match direction {
            Direction::Forward => (0..items.len()).collect(),
            Direction::Backward => (0..items.len()).rev().collect(),
        };

        let mut skip_until = self.last_emitted.as_deref();
        for _attempt in 0..2 {
            let mut passed = skip_until.is_none();
            for (rank, &i) in order.iter().enumerate() {
                let candidate = &items[i];
                if !matches_base(candidate, base, config) {
                    continue;
                }
                if passed {
                    let more_after = order[rank + 1..]
                        .iter()
                        .any(|&j| matches_base(&items[j], base, config));
                    return Some((candidate.clone(), more_after));
                }
                if skip_until == Some(candidate.word.as_str()) {
                    passed = true;
                }
            }
            if skip_until.is_none() {
                return None;
            }
            skip_until = None;
        }
        None
    }
}

/// Case-insensitive prefix match, with the nick twist: when the typed
/// base contains none of the configured ignored characters, those
/// characters are stripped from both sides first, so `dan` matches
/// `[dan]`. A base that itself contains ignored characters is compared
/// plainly (the check is deliberately one-directional).
fn matches_base(candidate: &Candidate, base: &str, config: &CompletionConfig) -> bool {
    if base.is_empty() {
        return true;
    }
    let ignore = &config.nick_ignore_chars;
    if candidate.is_nick
        && !ignore.is_empty()
        && !base.chars().any(|c| ignore.contains(c))
    {
        let strip = |s: &str| -> String {
            s.chars().filter(|c| !ignore.contains(*c)).collect()
        };
        return strip(&candidate.word)
            .to_lowercase()
            .starts_with(&strip(base).to_lowercase());
    }
    candidate
        .word
        .to_lowercase()
        .starts_with(&base.to_lowercase())
}
