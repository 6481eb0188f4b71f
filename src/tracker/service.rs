//! The error tracking service.
//!
//! Capture, normalize, deduplicate, rate-limit, and forward fault reports
//! without ever failing the caller: a fault in the tracking machinery must
//! never crash the application it protects.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::capture;
use crate::config::{Mode, TrackerConfig};
use crate::report::{self, EnvInfo, ErrorRecord, Fault, ReportContext};

use super::buffer::ReportBuffer;
use super::dedup::{DedupTable, ErrorCount, Observation};
use super::rate_limit::ReportRateLimit;
use super::transport::{HttpTransport, Transport};

/// Read-only snapshot of tracker state.
#[derive(Debug, Clone)]
pub struct TrackerStats {
    /// Records currently held in the buffer.
    pub buffered: usize,
    /// Distinct report keys tracked.
    pub distinct_keys: usize,
    /// The most recent records, oldest first.
    pub recent: Vec<ErrorRecord>,
    /// Full occurrence table keyed by report key.
    pub counts: HashMap<String, ErrorCount>,
}

/// Shared mutable tracker state.
///
/// One mutex covers the buffer, the dedup table, and the rate limiter, so a
/// rate-window reset plus slot consumption, or a dedup check plus buffer
/// append, is a single atomic section.
struct TrackerState {
    buffer: ReportBuffer,
    dedup: DedupTable,
    limiter: ReportRateLimit,
}

struct Inner {
    state: Mutex<TrackerState>,
    transport: Arc<dyn Transport>,
    env: EnvInfo,
    mode: Mode,
    recent_reports: usize,
    runtime: Option<tokio::runtime::Handle>,
}

/// Fault tracking service handle.
///
/// Cheap to clone; all clones share one buffer, dedup table, and rate
/// limiter. Construct via [`ErrorTracker::builder`], pass clones to every
/// boundary and capture site.
#[derive(Clone)]
pub struct ErrorTracker {
    inner: Arc<Inner>,
}

impl ErrorTracker {
    /// Start building a tracker from a configuration.
    pub fn builder(config: TrackerConfig) -> ErrorTrackerBuilder {
        ErrorTrackerBuilder {
            config,
            transport: None,
            env: EnvInfo::default(),
            runtime: None,
        }
    }

    /// Attach the process-wide capture hooks (panic hook).
    ///
    /// Guarded against double registration: a second call warns and does
    /// nothing. Pair with [`ErrorTracker::shutdown`].
    pub fn install(&self) {
        capture::install(self);
        info!(target: "brace::tracker", "capture hooks installed");
    }

    /// Detach the process-wide capture hooks, restoring what was installed
    /// before. Safe to call without a prior [`ErrorTracker::install`].
    pub fn shutdown(&self) {
        capture::uninstall();
        info!(target: "brace::tracker", "capture hooks removed");
    }

    /// Record a fault with no extra context.
    ///
    /// See [`ErrorTracker::log_error_with`].
    pub fn log_error(&self, fault: impl Into<Fault>) {
        self.log_error_with(fault, ReportContext::new());
    }

    /// Record a fault with caller-supplied context.
    ///
    /// The pipeline, in order: the global rate limiter (exhausted window is
    /// a hard drop), normalization, the per-key deduplicator (a repeat
    /// within the window is counted and absorbed), then buffer append and
    /// fire-and-forget forwarding. Never panics, never blocks on I/O, never
    /// returns an error.
    pub fn log_error_with(&self, fault: impl Into<Fault>, context: ReportContext) {
        let now = Utc::now();
        let record = report::normalize(fault.into(), context, &self.inner.env);
        let key = report::report_key(&record);

        let forward = self.admit(record, &key, now);
        if let Some(record) = forward {
            self.forward(record);
        }
    }

    /// Run a record through limiter, dedup, and buffer under one lock.
    /// Returns the record when it should be forwarded.
    fn admit(&self, record: ErrorRecord, key: &str, now: DateTime<Utc>) -> Option<ErrorRecord> {
        let mut state = self.inner.state.lock();

        if !state.limiter.try_acquire(now) {
            warn!(
                target: "brace::tracker",
                key,
                "report rate limit reached, dropping report"
            );
            return None;
        }

        match state.dedup.observe(key, now) {
            Observation::Duplicate { count } => {
                debug!(
                    target: "brace::tracker",
                    key,
                    count,
                    "duplicate report within window, absorbed"
                );
                None
            },
            Observation::Fresh => {
                state.buffer.push(record.clone());
                Some(record)
            },
        }
    }

    /// Hand a record to the transport on the async runtime.
    ///
    /// Best-effort and unordered; a failed or impossible delivery is logged
    /// locally and dropped, so the transport can never feed an error back
    /// into the capture path.
    fn forward(&self, record: ErrorRecord) {
        let handle = self
            .inner
            .runtime
            .clone()
            .or_else(|| tokio::runtime::Handle::try_current().ok());

        let Some(handle) = handle else {
            debug!(
                target: "brace::tracker",
                "no async runtime available, report buffered but not forwarded"
            );
            return;
        };

        let transport = Arc::clone(&self.inner.transport);
        handle.spawn(async move {
            if let Err(err) = transport.send(&record).await {
                debug!(
                    target: "brace::tracker",
                    error = %err,
                    "failed to forward report, dropping"
                );
            }
        });
    }

    /// Read-only snapshot: buffer size, distinct keys, recent records, and
    /// the full occurrence table. No side effects.
    #[must_use]
    pub fn stats(&self) -> TrackerStats {
        let state = self.inner.state.lock();
        TrackerStats {
            buffered: state.buffer.len(),
            distinct_keys: state.dedup.len(),
            recent: state.buffer.recent(self.inner.recent_reports),
            counts: state.dedup.snapshot(),
        }
    }

    /// Empty the buffer and the occurrence table. The rate limiter keeps
    /// its current window.
    pub fn clear_buffer(&self) {
        let mut state = self.inner.state.lock();
        state.buffer.clear();
        state.dedup.clear();
    }

    /// Effective mode the tracker was built with.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.inner.mode
    }
}

/// Builder for [`ErrorTracker`].
pub struct ErrorTrackerBuilder {
    config: TrackerConfig,
    transport: Option<Arc<dyn Transport>>,
    env: EnvInfo,
    runtime: Option<tokio::runtime::Handle>,
}

impl ErrorTrackerBuilder {
    /// Use a custom delivery backend instead of the HTTP transport built
    /// from the configured endpoint.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Describe the surface faults occur on; stamped onto every record.
    #[must_use]
    pub fn env(mut self, env: EnvInfo) -> Self {
        self.env = env;
        self
    }

    /// Forward reports on this runtime instead of whichever runtime the
    /// capture site happens to be on.
    #[must_use]
    pub fn runtime(mut self, handle: tokio::runtime::Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Validate the configuration and construct the tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP
    /// transport cannot be constructed.
    pub fn build(self) -> anyhow::Result<ErrorTracker> {
        let validation = self.config.validate()?;
        for warning in &validation.warnings {
            warn!(target: "brace::tracker", %warning, "configuration warning");
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                self.config.endpoint.clone(),
                self.config.request_timeout(),
            )?),
        };

        let now = Utc::now();
        let state = TrackerState {
            buffer: ReportBuffer::new(self.config.buffer_capacity),
            dedup: DedupTable::new(self.config.dedup_window()),
            limiter: ReportRateLimit::new(
                self.config.max_reports_per_window,
                self.config.rate_window(),
                now,
            ),
        };

        Ok(ErrorTracker {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                transport,
                env: self.env,
                mode: self.config.resolved_mode(),
                recent_reports: self.config.recent_reports,
                runtime: self.runtime,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::transport::MemoryTransport;
    use std::time::Duration;

    fn tracker_with(config: TrackerConfig) -> (ErrorTracker, MemoryTransport) {
        let transport = MemoryTransport::new();
        let tracker = ErrorTracker::builder(config)
            .transport(Arc::new(transport.clone()))
            .build()
            .expect("config must be valid");
        (tracker, transport)
    }

    fn config() -> TrackerConfig {
        TrackerConfig {
            endpoint: url::Url::parse("https://logs.example.com/api/log-error").unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_log_error_buffers_and_forwards() {
        let (tracker, transport) = tracker_with(config());

        tracker.log_error("connection lost");
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stats = tracker.stats();
        assert_eq!(stats.buffered, 1);
        assert_eq!(stats.distinct_keys, 1);
        assert_eq!(transport.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_counted_not_reforwarded() {
        let (tracker, transport) = tracker_with(config());

        for _ in 0..3 {
            tracker.log_error("connection lost");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stats = tracker.stats();
        assert_eq!(stats.buffered, 1);
        assert_eq!(transport.len(), 1);
        let count = stats.counts.values().next().map(|c| c.count);
        assert_eq!(count, Some(3));
    }

    #[tokio::test]
    async fn test_rate_limit_hard_drop() {
        let (tracker, transport) = tracker_with(config());

        for i in 0..11 {
            tracker.log_error(format!("distinct failure {i}"));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stats = tracker.stats();
        assert_eq!(stats.buffered, 10);
        assert_eq!(stats.distinct_keys, 10);
        assert_eq!(transport.len(), 10);
    }

    #[tokio::test]
    async fn test_clear_buffer_resets_stats_not_limiter() {
        let (tracker, _transport) = tracker_with(config());

        for i in 0..10 {
            tracker.log_error(format!("distinct failure {i}"));
        }
        tracker.clear_buffer();

        let stats = tracker.stats();
        assert_eq!(stats.buffered, 0);
        assert_eq!(stats.distinct_keys, 0);

        // The limiter window survived the clear: the next report is still
        // beyond the ceiling and gets dropped.
        tracker.log_error("one more");
        assert_eq!(tracker.stats().buffered, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let (tracker, transport) = tracker_with(config());
        transport.set_failing(true);

        tracker.log_error("boom");
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Still buffered locally; the delivery failure never surfaced.
        assert_eq!(tracker.stats().buffered, 1);
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_stats_recent_is_capped() {
        let mut cfg = config();
        cfg.max_reports_per_window = 100;
        let (tracker, _transport) = tracker_with(cfg);

        for i in 0..25 {
            tracker.log_error(format!("failure {i}"));
        }

        let stats = tracker.stats();
        assert_eq!(stats.recent.len(), 10);
        assert_eq!(stats.recent.last().map(|r| r.message.clone()), Some("failure 24".to_string()));
    }

    #[test]
    fn test_without_runtime_buffers_without_forwarding() {
        let (tracker, transport) = tracker_with(config());

        tracker.log_error("no runtime here");

        assert_eq!(tracker.stats().buffered, 1);
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_context_lands_on_record() {
        let (tracker, _transport) = tracker_with(config());

        let mut context = ReportContext::new();
        context.insert("source".to_string(), "api".to_string());
        tracker.log_error_with("connection lost", context);

        let stats = tracker.stats();
        assert_eq!(
            stats.recent[0].context.get("source").map(String::as_str),
            Some("api")
        );
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let cfg = TrackerConfig {
            buffer_capacity: 0,
            ..config()
        };
        assert!(ErrorTracker::builder(cfg).build().is_err());
    }
}
