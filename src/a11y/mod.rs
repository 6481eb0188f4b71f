//! Accessibility primitives for the hosting UI layer.
//!
//! Framework-agnostic building blocks: [`LiveRegion`] announcements for
//! assistive technology, [`FocusTrap`] keyboard containment for dialogs and
//! fallback panels, and a [`ShortcutRegistry`] for document-level key
//! combinations.

mod focus;
mod keys;
mod live_region;
mod shortcuts;

pub use focus::{FocusDirective, FocusQuery, FocusTrap};
pub use keys::{Key, KeyEvent, Modifiers};
pub use live_region::{LiveRegion, Politeness, alert_region, log_region, status_region};
pub use shortcuts::{ShortcutRegistry, normalize as normalize_shortcut};
