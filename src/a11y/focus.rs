//! Keyboard focus containment.
//!
//! While a trap is active, Tab and Shift+Tab cycle through the focusable
//! elements inside its boundary and Escape hands control back to the host.
//! The focusable set is queried on every key event - dialog content changes
//! between renders, so a cached set would go stale.

use super::keys::{Key, KeyEvent};

/// Source of the currently focusable element ids, queried per event.
pub trait FocusQuery {
    fn focusables(&self) -> Vec<String>;
}

impl<F> FocusQuery for F
where
    F: Fn() -> Vec<String>,
{
    fn focusables(&self) -> Vec<String> {
        self()
    }
}

/// What the host should do with focus after a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusDirective {
    /// Move focus to this element and consume the event.
    MoveTo(String),
    /// The trap released (Escape); the host decides where focus goes.
    Release,
    /// Not handled; let the event propagate.
    Pass,
}

/// Constrains Tab cycling to the focusables within a boundary.
pub struct FocusTrap<Q: FocusQuery> {
    query: Q,
    active: bool,
    current: Option<String>,
    on_escape: Option<Box<dyn FnMut() + Send>>,
}

impl<Q: FocusQuery> FocusTrap<Q> {
    pub fn new(query: Q) -> Self {
        Self {
            query,
            active: true,
            current: None,
            on_escape: None,
        }
    }

    /// Invoke `callback` whenever Escape is pressed inside the trap.
    #[must_use]
    pub fn on_escape(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_escape = Some(Box::new(callback));
        self
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tell the trap where focus currently is (e.g. after a pointer click).
    pub fn set_current(&mut self, id: impl Into<String>) {
        self.current = Some(id.into());
    }

    /// First focusable element; the host should move focus there when the
    /// trap activates.
    pub fn initial_focus(&mut self) -> Option<String> {
        let focusables = self.query.focusables();
        let first = focusables.first().cloned();
        if let Some(id) = &first {
            self.current = Some(id.clone());
        }
        first
    }

    /// Handle one key event while the trap is mounted.
    pub fn handle_key(&mut self, event: &KeyEvent) -> FocusDirective {
        if !self.active {
            return FocusDirective::Pass;
        }

        match &event.key {
            Key::Tab => {
                let focusables = self.query.focusables();
                if focusables.is_empty() {
                    return FocusDirective::Pass;
                }

                let position = self
                    .current
                    .as_ref()
                    .and_then(|id| focusables.iter().position(|f| f == id));

                let next = if event.modifiers.shift {
                    match position {
                        Some(0) | None => focusables.len() - 1,
                        Some(i) => i - 1,
                    }
                } else {
                    match position {
                        Some(i) if i + 1 < focusables.len() => i + 1,
                        _ => 0,
                    }
                };

                let id = focusables[next].clone();
                self.current = Some(id.clone());
                FocusDirective::MoveTo(id)
            },
            Key::Escape => {
                if let Some(callback) = &mut self.on_escape {
                    callback();
                }
                FocusDirective::Release
            },
            _ => FocusDirective::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a11y::keys::Modifiers;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tab() -> KeyEvent {
        KeyEvent::plain(Key::Tab)
    }

    fn shift_tab() -> KeyEvent {
        KeyEvent::new(Key::Tab, Modifiers::SHIFT)
    }

    fn ids(ids: &[&str]) -> impl Fn() -> Vec<String> {
        let owned: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        move || owned.clone()
    }

    #[test]
    fn test_tab_cycles_forward_with_wrap() {
        let mut trap = FocusTrap::new(ids(&["close", "retry", "details"]));
        trap.set_current("close");

        assert_eq!(trap.handle_key(&tab()), FocusDirective::MoveTo("retry".into()));
        assert_eq!(trap.handle_key(&tab()), FocusDirective::MoveTo("details".into()));
        assert_eq!(trap.handle_key(&tab()), FocusDirective::MoveTo("close".into()));
    }

    #[test]
    fn test_shift_tab_cycles_backward_with_wrap() {
        let mut trap = FocusTrap::new(ids(&["close", "retry", "details"]));
        trap.set_current("close");

        assert_eq!(
            trap.handle_key(&shift_tab()),
            FocusDirective::MoveTo("details".into())
        );
        assert_eq!(
            trap.handle_key(&shift_tab()),
            FocusDirective::MoveTo("retry".into())
        );
    }

    #[test]
    fn test_initial_focus_is_first_focusable() {
        let mut trap = FocusTrap::new(ids(&["close", "retry"]));
        assert_eq!(trap.initial_focus().as_deref(), Some("close"));
        assert_eq!(trap.handle_key(&tab()), FocusDirective::MoveTo("retry".into()));
    }

    #[test]
    fn test_focusable_set_queried_per_event() {
        // The set shrinks between events; the trap must not act on a cache.
        let shrinking = {
            let calls = Arc::new(AtomicUsize::new(0));
            move || {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    vec!["a".to_string(), "b".to_string(), "c".to_string()]
                } else {
                    vec!["a".to_string(), "c".to_string()]
                }
            }
        };

        let mut trap = FocusTrap::new(shrinking);
        trap.set_current("a");
        assert_eq!(trap.handle_key(&tab()), FocusDirective::MoveTo("b".into()));
        // "b" is gone now; cycling restarts from the head of the fresh set.
        assert_eq!(trap.handle_key(&tab()), FocusDirective::MoveTo("a".into()));
    }

    #[test]
    fn test_empty_focusable_set_passes() {
        let mut trap = FocusTrap::new(ids(&[]));
        assert_eq!(trap.handle_key(&tab()), FocusDirective::Pass);
    }

    #[test]
    fn test_escape_invokes_callback_and_releases() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut trap =
            FocusTrap::new(ids(&["close"])).on_escape(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(
            trap.handle_key(&KeyEvent::plain(Key::Escape)),
            FocusDirective::Release
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inactive_trap_passes_everything() {
        let mut trap = FocusTrap::new(ids(&["close"]));
        trap.set_active(false);
        assert_eq!(trap.handle_key(&tab()), FocusDirective::Pass);
        assert_eq!(
            trap.handle_key(&KeyEvent::plain(Key::Escape)),
            FocusDirective::Pass
        );
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut trap = FocusTrap::new(ids(&["close"]));
        assert_eq!(
            trap.handle_key(&KeyEvent::plain(Key::Char('x'))),
            FocusDirective::Pass
        );
        assert_eq!(
            trap.handle_key(&KeyEvent::plain(Key::Enter)),
            FocusDirective::Pass
        );
    }
}
