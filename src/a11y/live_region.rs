//! Live region announcements for assistive technology.
//!
//! A live region holds transient text that screen readers pick up without a
//! focus change. The optional clear-after delay expires lazily on read so
//! stale text is never re-announced; no timer is scheduled.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// How urgently assistive technology should announce a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    /// Announced at the next graceful opportunity.
    Polite,
    /// Interrupts the current announcement.
    Assertive,
}

impl Politeness {
    #[must_use]
    pub fn as_aria(self) -> &'static str {
        match self {
            Politeness::Polite => "polite",
            Politeness::Assertive => "assertive",
        }
    }
}

struct Announcement {
    text: String,
    announced_at: Instant,
}

/// A visually hidden region whose text changes are announced.
pub struct LiveRegion {
    politeness: Politeness,
    atomic: bool,
    role: Option<&'static str>,
    clear_after: Option<Duration>,
    current: Mutex<Option<Announcement>>,
}

impl LiveRegion {
    pub fn new(politeness: Politeness, atomic: bool) -> Self {
        Self {
            politeness,
            atomic,
            role: None,
            clear_after: None,
            current: Mutex::new(None),
        }
    }

    /// Give the region an explicit landmark role (`alert`, `status`, `log`).
    #[must_use]
    pub fn with_role(mut self, role: &'static str) -> Self {
        self.role = Some(role);
        self
    }

    /// Clear announced text after `delay`, lazily on the next read.
    #[must_use]
    pub fn with_clear_after(mut self, delay: Duration) -> Self {
        self.clear_after = Some(delay);
        self
    }

    /// Replace the region's text.
    pub fn announce(&self, text: impl Into<String>) {
        *self.current.lock() = Some(Announcement {
            text: text.into(),
            announced_at: Instant::now(),
        });
    }

    /// Current text, if it has not expired.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let mut current = self.current.lock();

        let expired = match (current.as_ref(), self.clear_after) {
            (Some(announcement), Some(delay)) => announcement.announced_at.elapsed() >= delay,
            _ => false,
        };
        if expired {
            *current = None;
        }

        current.as_ref().map(|a| a.text.clone())
    }

    /// Drop the current text immediately.
    pub fn clear(&self) {
        *self.current.lock() = None;
    }

    /// The attribute set the host should render on the region element.
    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("aria-live", self.politeness.as_aria().to_string()),
            ("aria-atomic", self.atomic.to_string()),
        ];
        if let Some(role) = self.role {
            attrs.push(("role", role.to_string()));
        }
        attrs
    }

    #[must_use]
    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }
}

/// Assertive, atomic region for urgent alerts.
#[must_use]
pub fn alert_region() -> LiveRegion {
    LiveRegion::new(Politeness::Assertive, true).with_role("alert")
}

/// Polite, atomic region for status updates.
#[must_use]
pub fn status_region() -> LiveRegion {
    LiveRegion::new(Politeness::Polite, true).with_role("status")
}

/// Polite, non-atomic region for streams of appended entries.
#[must_use]
pub fn log_region() -> LiveRegion {
    LiveRegion::new(Politeness::Polite, false).with_role("log")
}
