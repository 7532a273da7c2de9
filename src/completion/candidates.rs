//! Candidate storage.
//!
//! One flat ordered list per completion session. Insertion keeps the
//! bulk of candidates sorted while letting specific providers pin
//! entries to the front (recent speakers) or the back (own nickname).

use crate::error::{CommandError, Result};

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text inserted when this candidate is picked.
    pub word: String,
    /// Whether nick matching rules (ignored characters, completer
    /// suffix) apply to this candidate.
    pub is_nick: bool,
}

impl Candidate {
    /// Plain candidate.
    pub fn word(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_nick: false,
        }
    }

    /// Nick-flagged candidate.
    pub fn nick(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_nick: true,
        }
    }
}

/// Ordered list of candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateList {
    items: Vec<Candidate>,
}

impl CandidateList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts before the first entry sorting above `candidate`
    /// (case-insensitive), or at the end. Providers do their sorted
    /// inserts first and pin front/back entries afterwards.
    pub fn insert_sorted(&mut self, candidate: Candidate) -> Result<()> {
        self.reserve_one()?;
        let key = candidate.word.to_lowercase();
        let pos = self
            .items
            .iter()
            .position(|c| c.word.to_lowercase() > key)
            .unwrap_or(self.items.len());
        self.items.insert(pos, candidate);
        Ok(())
    }

    /// Appends at the end.
    pub fn push_back(&mut self, candidate: Candidate) -> Result<()> {
        self.reserve_one()?;
        self.items.push(candidate);
        Ok(())
    }

    /// Prepends at the front.
    pub fn push_front(&mut self, candidate: Candidate) -> Result<()> {
        self.reserve_one()?;
        self.items.insert(0, candidate);
        Ok(())
    }

    fn reserve_one(&mut self) -> Result<()> {
        self.items
            .try_reserve(1)
            .map_err(|e| CommandError::allocation(e.to_string()))
    }

    /// Candidates in list order.
    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
