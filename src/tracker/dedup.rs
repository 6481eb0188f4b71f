//! Per-key deduplication of repeated faults.
//!
//! Independent of the rate limiter: a duplicate inside the window is counted
//! but not re-forwarded, so the "this error keeps happening" signal survives
//! even while network traffic is suppressed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Aggregated occurrence counts for one report key.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorCount {
    /// Occurrences seen while this entry lived.
    pub count: u64,
    /// Instant the entry was created. Immutable afterwards.
    pub first_seen: DateTime<Utc>,
    /// Instant of the most recent occurrence.
    pub last_seen: DateTime<Utc>,
}

/// Outcome of observing one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First occurrence of this key within the window: record and forward.
    Fresh,
    /// Repeat within the window: counted, nothing else happens.
    Duplicate { count: u64 },
}

/// Table of [`ErrorCount`] entries keyed by report key.
#[derive(Debug)]
pub struct DedupTable {
    window_ms: i64,
    entries: HashMap<String, ErrorCount>,
}

impl DedupTable {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis().min(i64::MAX as u128) as i64,
            entries: HashMap::new(),
        }
    }

    /// Observe one occurrence of `key` at `now`.
    ///
    /// An existing entry first seen within the window absorbs the occurrence
    /// as a duplicate. Otherwise the entry is replaced wholesale, so there
    /// is always exactly one entry per key and `first_seen` never moves
    /// while an entry lives.
    pub fn observe(&mut self, key: &str, now: DateTime<Utc>) -> Observation {
        if let Some(entry) = self.entries.get_mut(key) {
            let age = now.signed_duration_since(entry.first_seen).num_milliseconds();
            if (0..self.window_ms).contains(&age) {
                entry.count += 1;
                entry.last_seen = now;
                return Observation::Duplicate { count: entry.count };
            }
        }

        self.entries.insert(
            key.to_string(),
            ErrorCount {
                count: 1,
                first_seen: now,
                last_seen: now,
            },
        );
        Observation::Fresh
    }

    /// Number of distinct keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone of the full count table for a stats snapshot.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, ErrorCount> {
        self.entries.clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
