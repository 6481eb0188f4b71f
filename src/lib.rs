//! brace - client-side fault tracking, error boundaries, and accessibility
//! primitives.
//!
//! The crate has three pillars:
//!
//! - [`tracker`] - the [`ErrorTracker`](tracker::ErrorTracker) service:
//!   captures faults, deduplicates repeats, rate-limits the outbound flow,
//!   and forwards normalized reports to a log endpoint without ever failing
//!   its caller.
//! - [`boundary`] - [`Boundary`](boundary::Boundary) supervisors that
//!   convert a panicking or failing subtree into an accessible fallback view
//!   with recovery actions, instead of taking the whole application down.
//! - [`a11y`] - live regions, focus trapping, and keyboard shortcut
//!   dispatch for the UI layer that hosts the fallbacks.
//!
//! # Example
//!
//! ```rust,ignore
//! use brace::{Boundary, ErrorTracker, TrackerConfig};
//!
//! let tracker = ErrorTracker::builder(TrackerConfig::default()).build()?;
//! tracker.install();
//!
//! let mut boundary = Boundary::page(tracker.clone(), "/dashboard");
//! match boundary.render(|| render_dashboard()) {
//!     brace::BoundaryOutput::Content(view) => show(view),
//!     brace::BoundaryOutput::Fallback(fallback) => show_fallback(fallback),
//! }
//! ```
//!
//! The tracker is an explicit, dependency-injected service: construct it
//! once, clone the handle freely, and pass it to every boundary. There is no
//! hidden global beyond the process-wide panic hook that [`ErrorTracker::install`]
//! manages.
//!
//! [`ErrorTracker::install`]: tracker::ErrorTracker::install

pub mod a11y;
pub mod boundary;
pub mod capture;
pub mod config;
pub mod constants;
pub mod report;
pub mod tracker;

pub use boundary::{Boundary, BoundaryOutput, BoundaryScope, FallbackView, RecoveryAction};
pub use capture::spawn_tracked;
pub use config::{Mode, TrackerConfig};
pub use report::{ErrorRecord, Fault};
pub use tracker::{ErrorTracker, TrackerStats};
