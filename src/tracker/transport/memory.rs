//! In-memory report sink.
//!
//! Retains every delivered report for later inspection. Useful for embedded
//! hosts that surface reports in their own UI, and for tests.

use super::{Transport, TransportError};
use crate::report::ErrorRecord;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Transport that appends reports to a shared in-process vector.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<ErrorRecord>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<ErrorRecord> {
        self.sent.lock().clone()
    }

    /// Number of delivered reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Make every subsequent delivery fail, for exercising the swallow path.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, record: &ErrorRecord) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("memory transport set to fail".to_string()));
        }
        self.sent.lock().push(record.clone());
        Ok(())
    }
}
