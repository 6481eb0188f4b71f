//! Document-level keyboard shortcut dispatch.
//!
//! Bindings are keyed by a normalized combination string such as
//! `ctrl+shift+k`: modifiers in canonical order, lowercase, aliases folded.
//! A matched combination consumes the event, which the host translates to
//! preventing the default action.

use std::collections::HashMap;

use super::keys::{Key, KeyEvent};

type Handler = Box<dyn FnMut() + Send>;

/// Registry of key combinations active while a UI surface is mounted.
pub struct ShortcutRegistry {
    bindings: HashMap<String, Handler>,
    enabled: bool,
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            enabled: true,
        }
    }

    /// Bind `combo` to `handler`, replacing any previous binding for the
    /// same normalized combination.
    pub fn register(&mut self, combo: &str, handler: impl FnMut() + Send + 'static) {
        self.bindings.insert(normalize(combo), Box::new(handler));
    }

    /// Remove a binding. Returns whether it existed.
    pub fn unregister(&mut self, combo: &str) -> bool {
        self.bindings.remove(&normalize(combo)).is_some()
    }

    /// Enable or disable dispatch without dropping the bindings.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Dispatch one key event.
    ///
    /// Returns `true` when a binding matched and ran - the host should stop
    /// propagation and suppress the default action for the event.
    pub fn handle(&mut self, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(combo) = event_combo(event) else {
            return false;
        };
        match self.bindings.get_mut(&combo) {
            Some(handler) => {
                handler();
                true
            },
            None => false,
        }
    }
}

/// Canonicalize a combination string: lowercase, aliases folded, modifiers
/// ordered ctrl, alt, shift, meta, key last.
#[must_use]
pub fn normalize(combo: &str) -> String {
    let mut ctrl = false;
    let mut alt = false;
    let mut shift = false;
    let mut meta = false;
    let mut key: Option<String> = None;

    for token in combo.split('+') {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }
        match token.as_str() {
            "ctrl" | "control" => ctrl = true,
            "alt" | "option" => alt = true,
            "shift" => shift = true,
            "meta" | "cmd" | "command" | "super" => meta = true,
            "esc" => key = Some("escape".to_string()),
            "return" => key = Some("enter".to_string()),
            other => key = Some(other.to_string()),
        }
    }

    let mut parts = Vec::new();
    if ctrl {
        parts.push("ctrl".to_string());
    }
    if alt {
        parts.push("alt".to_string());
    }
    if shift {
        parts.push("shift".to_string());
    }
    if meta {
        parts.push("meta".to_string());
    }
    if let Some(key) = key {
        parts.push(key);
    }
    parts.join("+")
}

/// Normalized combination for a key event; `None` when the key alone cannot
/// name a combination (modifier-only presses arrive as such events in some
/// hosts).
fn event_combo(event: &KeyEvent) -> Option<String> {
    let key = match &event.key {
        Key::Tab => "tab".to_string(),
        Key::Enter => "enter".to_string(),
        Key::Escape => "escape".to_string(),
        Key::Char(c) => c.to_lowercase().to_string(),
        Key::Named(name) => {
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                return None;
            }
            name
        },
    };

    let mut parts = Vec::new();
    if event.modifiers.ctrl {
        parts.push("ctrl".to_string());
    }
    if event.modifiers.alt {
        parts.push("alt".to_string());
    }
    if event.modifiers.shift {
        parts.push("shift".to_string());
    }
    if event.modifiers.meta {
        parts.push("meta".to_string());
    }
    parts.push(key);
    Some(parts.join("+"))
}
