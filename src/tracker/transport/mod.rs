//! Transport trait for the outbound log endpoint.
//!
//! Defines the interface report forwarding goes through, enabling pluggable
//! delivery (HTTP, in-memory for embedding and tests).

mod http;
mod memory;

pub use http::HttpTransport;
pub use memory::MemoryTransport;

use crate::report::ErrorRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Failure while handing a report to the log endpoint.
///
/// These never reach the tracker's callers; the service swallows them and
/// logs locally at debug level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be performed.
    #[error("failed to reach log endpoint: {0}")]
    Request(#[from] reqwest::Error),
    /// The transport refused the report.
    #[error("log transport rejected the report: {0}")]
    Rejected(String),
}

/// Delivery backend for normalized reports.
///
/// Implementations must be thread-safe (`Send + Sync`) for use with tokio.
/// Delivery is best-effort and unordered; callers never await it on the
/// capture path.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver one report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report could not be handed off. The caller
    /// does not retry.
    async fn send(&self, record: &ErrorRecord) -> Result<(), TransportError>;
}
