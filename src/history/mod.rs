//! Recently converted files.
//!
//! The tracker keeps the last few successful conversions for display. It is
//! a bounded FIFO: once full, every insert evicts the single oldest entry,
//! regardless of how often entries were read.

use crate::config::DEFAULT_HISTORY_CAPACITY;
use mp3forge_common::Bitrate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub file_name: String,
    pub bitrate_kbps: u32,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(
        file_name: impl Into<String>,
        bitrate_kbps: u32,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bitrate_kbps,
            timestamp: timestamp.into(),
        }
    }

    /// Entry stamped with the current local time.
    pub fn now(file_name: impl Into<String>, bitrate: Bitrate) -> Self {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::new(file_name, bitrate.kbps(), timestamp)
    }
}

/// Bounded, newest-first record of conversions.
pub struct HistoryTracker {
    // Oldest at the front, newest at the back.
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryTracker {
    /// Tracker with the default bound of 10 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Tracker keeping at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, evicting the oldest once the bound is exceeded.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// All entries, most recent first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let entries = self.entries.read();
        entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new()
    }
}
