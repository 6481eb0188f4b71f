//! Bounded FIFO buffer of recent reports.
//!
//! Introspection only - records are forwarded before they land here and are
//! never replayed from the buffer.

use crate::report::ErrorRecord;
use std::collections::VecDeque;

/// Ordered sequence of records, oldest evicted first at capacity.
#[derive(Debug)]
pub struct ReportBuffer {
    capacity: usize,
    entries: VecDeque<ErrorRecord>,
}

impl ReportBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    /// Append a record, evicting the oldest if the buffer is full.
    pub fn push(&mut self, record: ErrorRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent `n` records, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ErrorRecord> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
