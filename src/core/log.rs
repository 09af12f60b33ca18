//! The running game log.
//!
//! Every engine decision that a player could reasonably ask "why?" about
//! gets a log entry: refused actions, scoring, combat outcomes, unsupported
//! ability text. The log is part of `GameState` and survives projection,
//! so entries must never mention concealed information (a draw is logged
//! as "draws a card", never by name).

use im::Vector;
use serde::{Deserialize, Serialize};

/// A single log entry, stamped with the turn it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Turn number when the entry was recorded.
    pub turn: u32,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[T{}] {}", self.turn, self.message)
    }
}

/// Append-only game log backed by a persistent vector.
///
/// Uses `im::Vector` so cloning the whole game state for AI lookahead
/// shares the log structurally instead of copying it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<LogEntry>,
}

impl GameLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, turn: u32, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(turn, %message, "log");
        self.entries.push_back(LogEntry { turn, message });
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Check whether any entry contains the given fragment.
    ///
    /// Convenience for tests and diagnostics.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(fragment))
    }
}
