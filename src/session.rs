//! In-memory session transcript
//!
//! One `Session` per user session, created at session start and owned
//! by the application state. The transcript is append-only: entries go
//! in as user/reply pairs and are never mutated or removed.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    You,
    Bot,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::You => write!(f, "You"),
            Self::Bot => write!(f, "Bot"),
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

/// A single user session and its transcript
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Local>,
    entries: Vec<TranscriptEntry>,
}

impl Session {
    pub fn new(id: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            id: id.into(),
            created_at,
            entries: Vec::new(),
        }
    }

    /// Append one completed turn: the user utterance followed by the
    /// bot reply, sharing a single timestamp. Pairing is enforced here
    /// rather than left to callers.
    pub fn append_turn(
        &mut self,
        utterance: impl Into<String>,
        reply: impl Into<String>,
        timestamp: DateTime<Local>,
    ) {
        self.entries.push(TranscriptEntry {
            speaker: Speaker::You,
            message: utterance.into(),
            timestamp,
        });
        self.entries.push(TranscriptEntry {
            speaker: Speaker::Bot,
            message: reply.into(),
            timestamp,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    #[allow(dead_code)] // Accessor for API completeness
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Entries newest-first, the order the page displays them in
    pub fn entries_rev(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().rev()
    }

    /// The last appended turn, if any
    pub fn last_turn(&self) -> Option<(&TranscriptEntry, &TranscriptEntry)> {
        match self.entries.as_slice() {
            [.., user, bot] => Some((user, bot)),
            _ => None,
        }
    }
}
