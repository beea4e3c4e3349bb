//! Single-line text editor backing each form field.
//!
//! Supports cursor movement, character insertion/deletion, placeholder text,
//! password masking and a numeric-only mode.

use crate::config::{FieldKind, FieldSpec};
use crate::event::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A text input with cursor, placeholder, and password support.
///
/// The cursor position is tracked as a byte offset into the value string.
/// All cursor operations are char-boundary safe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    value: String,
    placeholder: String,
    cursor_position: usize,
    password: bool,
    numeric: bool,
}

impl Input {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an input for a form field, pre-filled with its default.
    pub fn for_field(spec: &FieldSpec) -> Self {
        Self::new()
            .with_placeholder(spec.placeholder.clone())
            .with_value(spec.default.clone())
            .password(spec.kind == FieldKind::Password)
            .numeric(spec.kind == FieldKind::Number)
    }

    /// Set the placeholder text (builder pattern).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the initial value (builder pattern).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Enable or disable password masking (builder pattern).
    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    /// Accept only characters that can appear in a number (builder pattern).
    pub fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    /// Return the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value, moving the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor_position = self.value.len();
    }

    /// Clear the input value and reset the cursor.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    /// Insert a character at the current cursor position.
    ///
    /// Returns `false` if numeric mode rejected it.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.numeric && !(ch.is_ascii_digit() || ch == '-' || ch == '.') {
            return false;
        }
        self.value.insert(self.cursor_position, ch);
        self.cursor_position += ch.len_utf8();
        true
    }

    /// Insert a string at the cursor, character by character.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert_char(ch);
        }
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let prev = self.prev_char_boundary();
        self.value.drain(prev..self.cursor_position);
        self.cursor_position = prev;
    }

    /// Delete the character after the cursor (delete forward).
    pub fn delete_forward(&mut self) {
        if self.cursor_position >= self.value.len() {
            return;
        }
        let next = self.next_char_boundary();
        self.value.drain(self.cursor_position..next);
    }

    /// Move the cursor left by one character.
    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position = self.prev_char_boundary();
        }
    }

    /// Move the cursor right by one character.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.len() {
            self.cursor_position = self.next_char_boundary();
        }
    }

    /// Move the cursor to the start of the input.
    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    /// Move the cursor to the end of the input.
    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.value.len();
    }

    /// Return the cursor position (byte offset).
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Apply an editing key. Returns whether the key was an editing key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.contains(Modifiers::CTRL) || key.modifiers.contains(Modifiers::ALT) {
            return false;
        }
        match key.code {
            Key::Char(ch) => {
                self.insert_char(ch);
            }
            Key::Backspace => self.delete_char(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.move_cursor_left(),
            Key::Right => self.move_cursor_right(),
            Key::Home => self.move_cursor_home(),
            Key::End => self.move_cursor_end(),
            _ => return false,
        }
        true
    }

    /// Display string: either the value (possibly masked) or the placeholder.
    pub fn display_text(&self) -> String {
        if self.value.is_empty() {
            self.placeholder.clone()
        } else if self.password {
            "\u{2022}".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn prev_char_boundary(&self) -> usize {
        let mut pos = self.cursor_position.saturating_sub(1);
        while pos > 0 && !self.value.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn next_char_boundary(&self) -> usize {
        let mut pos = self.cursor_position + 1;
        while pos < self.value.len() && !self.value.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_value_sets_cursor_to_end() {
        let i = Input::new().with_value("hello");
        assert_eq!(i.value(), "hello");
        assert_eq!(i.cursor_position(), 5);
    }

    #[test]
    fn placeholder_shown_when_empty() {
        let i = Input::new().with_placeholder("Type here...");
        assert_eq!(i.display_text(), "Type here...");
    }

    #[test]
    fn password_masks_value() {
        let i = Input::new().with_value("secret").password(true);
        assert_eq!(i.display_text(), "\u{2022}".repeat(6));
    }

    #[test]
    fn insert_in_middle() {
        let mut i = Input::new().with_value("ac");
        i.move_cursor_left();
        i.insert_char('b');
        assert_eq!(i.value(), "abc");
        assert_eq!(i.cursor_position(), 2);
    }

    #[test]
    fn multibyte_editing() {
        let mut i = Input::new().with_value("né");
        i.delete_char();
        assert_eq!(i.value(), "n");
        i.insert_char('ü');
        i.move_cursor_home();
        i.delete_forward();
        assert_eq!(i.value(), "ü");
    }

    #[test]
    fn numeric_rejects_letters() {
        let mut i = Input::new().numeric(true);
        assert!(i.insert_char('4'));
        assert!(!i.insert_char('x'));
        assert!(i.insert_char('.'));
        assert_eq!(i.value(), "4.");
    }

    #[test]
    fn handle_key_edits() {
        let mut i = Input::new();
        for ch in "abc".chars() {
            assert!(i.handle_key(&KeyEvent::plain(Key::Char(ch))));
        }
        assert!(i.handle_key(&KeyEvent::plain(Key::Backspace)));
        assert!(i.handle_key(&KeyEvent::plain(Key::Home)));
        assert!(i.handle_key(&KeyEvent::plain(Key::Delete)));
        assert_eq!(i.value(), "b");
    }

    #[test]
    fn handle_key_leaves_chords_and_navigation() {
        let mut i = Input::new();
        assert!(!i.handle_key(&KeyEvent::ctrl('s')));
        assert!(!i.handle_key(&KeyEvent::plain(Key::Tab)));
        assert!(!i.handle_key(&KeyEvent::plain(Key::Enter)));
        assert!(i.value().is_empty());
    }

    #[test]
    fn for_field_applies_spec() {
        let spec = FieldSpec {
            name: "age".into(),
            kind: FieldKind::Number,
            default: "30".into(),
            placeholder: "years".into(),
            ..FieldSpec::default()
        };
        let mut i = Input::for_field(&spec);
        assert_eq!(i.value(), "30");
        assert!(!i.insert_char('y'));
        i.clear();
        assert_eq!(i.display_text(), "years");
    }
}
