//! Crate-wide default values.
//!
//! Centralizes the tunable limits of the tracking pipeline so the config
//! layer and the service agree on one set of defaults.

/// Maximum number of reports retained in the introspection buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// Maximum reports accepted per rate window.
pub const DEFAULT_MAX_REPORTS_PER_WINDOW: u32 = 10;

/// Length of the rate-limit window in seconds.
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 60;

/// Length of the per-key deduplication window in seconds.
pub const DEFAULT_DEDUP_WINDOW_SECS: u64 = 60;

/// Number of records returned by the `recent` portion of a stats snapshot.
pub const DEFAULT_RECENT_REPORTS: usize = 10;

/// Default path of the outbound log endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/log-error";

/// Request timeout for the outbound log endpoint in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Environment variable that overrides the configured mode.
pub const MODE_ENV_VAR: &str = "BRACE_ENV";
