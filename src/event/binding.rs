//! Key bindings and ordered resolution.
//!
//! A [`Binding`] maps a key chord to an event name. [`Bindings`] is an ordered
//! list: resolution scans it front to back and the first enabled entry whose
//! key matches wins, so a widget overrides a default by placing its own entry
//! earlier in the list.

use std::fmt;

use super::input::{Key, KeyEvent};
use super::names;

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// A single key binding: key chord -> event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: KeyEvent,
    pub event: String,
    pub description: String,
    pub enabled: bool,
}

impl Binding {
    /// Create an enabled binding.
    pub fn new(key: impl Into<KeyEvent>, event: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            event: event.into(),
            description: description.into(),
            enabled: true,
        }
    }

    /// Set the enabled flag (builder).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether this binding fires for `event`.
    pub fn fires_on(&self, event: &KeyEvent) -> bool {
        self.enabled && self.key.matches(event)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.description)
    }
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Ordered list of bindings. Order is significant: first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The five record-editor bindings, in resolution order.
    ///
    /// - `Enter` -> RowSelected
    /// - `Ctrl+N` -> NewItemRequested
    /// - `Ctrl+D` -> ItemDeleted
    /// - `Ctrl+S` -> FormSubmit
    /// - `Esc` -> FormCancel
    pub fn crud_defaults() -> Self {
        Self::from(vec![
            Binding::new(Key::Enter, names::ROW_SELECTED, "select"),
            Binding::new(KeyEvent::ctrl('n'), names::NEW_ITEM_REQUESTED, "new"),
            Binding::new(KeyEvent::ctrl('d'), names::ITEM_DELETED, "delete"),
            Binding::new(KeyEvent::ctrl('s'), names::FORM_SUBMIT, "save"),
            Binding::new(Key::Escape, names::FORM_CANCEL, "cancel"),
        ])
    }

    /// Append a binding (lowest priority).
    pub fn push(&mut self, binding: Binding) {
        self.entries.push(binding);
    }

    /// Insert a binding ahead of every existing one (highest priority).
    pub fn prepend(&mut self, binding: Binding) {
        self.entries.insert(0, binding);
    }

    /// Find the first enabled binding matching `event`.
    ///
    /// Returns the position in the list alongside the binding.
    pub fn resolve(&self, event: &KeyEvent) -> Option<(usize, &Binding)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, binding)| binding.fires_on(event))
    }

    /// Enable or disable every binding for `event_name`. Returns how many changed.
    pub fn set_enabled(&mut self, event_name: &str, enabled: bool) -> usize {
        let mut changed = 0;
        for binding in self.entries.iter_mut().filter(|b| b.event == event_name) {
            if binding.enabled != enabled {
                binding.enabled = enabled;
                changed += 1;
            }
        }
        changed
    }

    /// Enabled bindings in order.
    pub fn enabled(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter().filter(|b| b.enabled)
    }

    /// All bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Binding>> for Bindings {
    fn from(entries: Vec<Binding>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
