//! Fault tracking: buffering, deduplication, rate limiting, forwarding.
//!
//! The [`ErrorTracker`] service is the single reporting path for the crate:
//! boundaries, the panic hook, tracked tasks, and manual capture sites all
//! feed it. Internals:
//!
//! - `buffer`: bounded FIFO of recent reports, introspection only
//! - `dedup`: per-key occurrence counting inside a fixed window
//! - `rate_limit`: hard ceiling on reports per window
//! - [`transport`]: pluggable delivery to the log endpoint

mod buffer;
mod dedup;
mod rate_limit;
mod service;
pub mod transport;


pub use dedup::{ErrorCount, Observation};
pub use service::{ErrorTracker, ErrorTrackerBuilder, TrackerStats};
