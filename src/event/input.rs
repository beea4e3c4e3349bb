//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`] and supporting types. Crossterm events
//! are converted via `From` impls so the dispatch core never depends on
//! crossterm directly. Keys can also be parsed from the short textual form
//! used in configuration (`"enter"`, `"ctrl+n"`, `"shift+tab"`, `"f5"`).

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// A key crossterm reports that we have no name for. Never matches a binding.
    Unknown,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "space"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => write!(f, "enter"),
            Key::Escape => write!(f, "esc"),
            Key::Tab => write!(f, "tab"),
            Key::BackTab => write!(f, "backtab"),
            Key::Backspace => write!(f, "backspace"),
            Key::Delete => write!(f, "delete"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Home => write!(f, "home"),
            Key::End => write!(f, "end"),
            Key::PageUp => write!(f, "pgup"),
            Key::PageDown => write!(f, "pgdown"),
            Key::F(n) => write!(f, "f{n}"),
            Key::Unknown => write!(f, "?"),
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `self` with the bits of `other` cleared.
    pub fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// Ctrl + the given character.
    pub fn ctrl(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::CTRL)
    }

    /// Canonical form used for binding comparison.
    ///
    /// Shift is already folded into the character for `Key::Char` (terminals
    /// report `'A'` with SHIFT), and `BackTab` implies it, so SHIFT is dropped
    /// for those keys. Ctrl+letter is compared case-insensitively.
    pub fn normalized(self) -> Self {
        match self.code {
            Key::Char(c) => {
                let c = if self.modifiers.contains(Modifiers::CTRL) {
                    c.to_ascii_lowercase()
                } else {
                    c
                };
                Self::new(Key::Char(c), self.modifiers.without(Modifiers::SHIFT))
            }
            Key::BackTab => Self::new(Key::BackTab, self.modifiers.without(Modifiers::SHIFT)),
            _ => self,
        }
    }

    /// Whether two events denote the same key chord.
    pub fn matches(&self, other: &KeyEvent) -> bool {
        self.normalized() == other.normalized()
    }
}

impl From<Key> for KeyEvent {
    fn from(code: Key) -> Self {
        Self::plain(code)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            write!(f, "alt+")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            write!(f, "shift+")?;
        }
        write!(f, "{}", self.code)
    }
}

/// Error returned when a key description cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised key `{}`", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    /// Parse `"ctrl+n"`, `"esc"`, `"shift+tab"`, `"f5"`, `"a"` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseKeyError(s.to_owned()));
        }

        let mut modifiers = Modifiers::NONE;
        let mut rest = trimmed;
        // A lone "+" is the plus key, not a separator.
        while let Some((head, tail)) = rest.split_once('+') {
            if tail.is_empty() {
                break;
            }
            modifiers = modifiers
                | match head.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" => Modifiers::CTRL,
                    "alt" | "meta" => Modifiers::ALT,
                    "shift" => Modifiers::SHIFT,
                    _ => return Err(ParseKeyError(s.to_owned())),
                };
            rest = tail;
        }

        let lower = rest.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "tab" if modifiers.contains(Modifiers::SHIFT) => Key::BackTab,
            "tab" => Key::Tab,
            "backtab" => Key::BackTab,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "home" => Key::Home,
            "end" => Key::End,
            "pgup" | "pageup" => Key::PageUp,
            "pgdown" | "pagedown" => Key::PageDown,
            "space" => Key::Char(' '),
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=24).contains(&n) => Key::F(n),
                        _ => return Err(ParseKeyError(s.to_owned())),
                    },
                }
            }
        };

        Ok(KeyEvent::new(code, modifiers).normalized())
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Raw input delivered by the terminal layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    FocusGained,
    FocusLost,
    Paste(String),
    /// Mouse activity; the dispatch core does not interpret it.
    Mouse,
}

impl InputEvent {
    /// The key event, if this is one.
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            InputEvent::Key(ke) => Some(ke),
            _ => None,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(ke: KeyEvent) -> Self {
        InputEvent::Key(ke)
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;

        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Unknown,
        };
        KeyEvent::new(code, convert_modifiers(ct.modifiers))
    }
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        match ct {
            crossterm::event::Event::Key(ke) => InputEvent::Key(KeyEvent::from(ke)),
            crossterm::event::Event::Mouse(_) => InputEvent::Mouse,
            crossterm::event::Event::Resize(w, h) => InputEvent::Resize {
                width: w,
                height: h,
            },
            crossterm::event::Event::FocusGained => InputEvent::FocusGained,
            crossterm::event::Event::FocusLost => InputEvent::FocusLost,
            crossterm::event::Event::Paste(s) => InputEvent::Paste(s),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    #[test]
    fn modifiers_without() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods.without(Modifiers::SHIFT), Modifiers::CTRL);
        assert!(Modifiers::SHIFT.without(Modifiers::SHIFT).is_empty());
    }

    // ── Parsing ──────────────────────────────────────────────────────

    #[test]
    fn parse_named_keys() {
        assert_eq!("enter".parse::<KeyEvent>().unwrap(), KeyEvent::plain(Key::Enter));
        assert_eq!("Esc".parse::<KeyEvent>().unwrap(), KeyEvent::plain(Key::Escape));
        assert_eq!("pgdown".parse::<KeyEvent>().unwrap(), KeyEvent::plain(Key::PageDown));
        assert_eq!("space".parse::<KeyEvent>().unwrap(), KeyEvent::plain(Key::Char(' ')));
        assert_eq!("f5".parse::<KeyEvent>().unwrap(), KeyEvent::plain(Key::F(5)));
    }

    #[test]
    fn parse_modified_keys() {
        assert_eq!("ctrl+n".parse::<KeyEvent>().unwrap(), KeyEvent::ctrl('n'));
        assert_eq!("Ctrl+S".parse::<KeyEvent>().unwrap(), KeyEvent::ctrl('s'));
        assert_eq!(
            "shift+tab".parse::<KeyEvent>().unwrap(),
            KeyEvent::plain(Key::BackTab)
        );
        assert_eq!(
            "alt+x".parse::<KeyEvent>().unwrap(),
            KeyEvent::new(Key::Char('x'), Modifiers::ALT)
        );
    }

    #[test]
    fn parse_plus_key() {
        assert_eq!("+".parse::<KeyEvent>().unwrap(), KeyEvent::plain(Key::Char('+')));
        assert_eq!("ctrl++".parse::<KeyEvent>().unwrap(), KeyEvent::ctrl('+'));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<KeyEvent>().is_err());
        assert!("hyper+x".parse::<KeyEvent>().is_err());
        assert!("enterprise".parse::<KeyEvent>().is_err());
        assert!("f99".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn display_round_trips_common_chords() {
        for text in ["enter", "esc", "ctrl+n", "tab", "f2", "space"] {
            let ke: KeyEvent = text.parse().unwrap();
            assert_eq!(ke.to_string(), text);
        }
    }

    // ── Matching ─────────────────────────────────────────────────────

    #[test]
    fn shifted_char_matches_plain_binding() {
        let pressed = KeyEvent::new(Key::Char('A'), Modifiers::SHIFT);
        let bound = KeyEvent::plain(Key::Char('A'));
        assert!(pressed.matches(&bound));
        assert!(!pressed.matches(&KeyEvent::plain(Key::Char('a'))));
    }

    #[test]
    fn ctrl_chords_ignore_case() {
        let pressed = KeyEvent::new(Key::Char('N'), Modifiers::CTRL | Modifiers::SHIFT);
        assert!(pressed.matches(&KeyEvent::ctrl('n')));
    }

    #[test]
    fn modifiers_must_agree() {
        assert!(!KeyEvent::plain(Key::Char('n')).matches(&KeyEvent::ctrl('n')));
        assert!(!KeyEvent::new(Key::Enter, Modifiers::ALT).matches(&KeyEvent::plain(Key::Enter)));
    }

    // ── From<crossterm> ──────────────────────────────────────────────

    #[test]
    fn from_crossterm_key_with_ctrl() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('d'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke, KeyEvent::ctrl('d'));
    }

    #[test]
    fn from_crossterm_key_navigation() {
        for (ct_code, expected) in [
            (crossterm::event::KeyCode::Home, Key::Home),
            (crossterm::event::KeyCode::End, Key::End),
            (crossterm::event::KeyCode::PageUp, Key::PageUp),
            (crossterm::event::KeyCode::PageDown, Key::PageDown),
            (crossterm::event::KeyCode::Delete, Key::Delete),
            (crossterm::event::KeyCode::Backspace, Key::Backspace),
            (crossterm::event::KeyCode::Esc, Key::Escape),
        ] {
            let ct = crossterm::event::KeyEvent::new(
                ct_code,
                crossterm::event::KeyModifiers::NONE,
            );
            assert_eq!(KeyEvent::from(ct).code, expected);
        }
    }

    #[test]
    fn from_crossterm_unknown_key_is_unknown() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Insert,
            crossterm::event::KeyModifiers::NONE,
        );
        assert_eq!(KeyEvent::from(ct).code, Key::Unknown);
    }

    #[test]
    fn from_crossterm_event_variants() {
        assert_eq!(
            InputEvent::from(crossterm::event::Event::Resize(120, 40)),
            InputEvent::Resize {
                width: 120,
                height: 40
            }
        );
        assert_eq!(
            InputEvent::from(crossterm::event::Event::FocusLost),
            InputEvent::FocusLost
        );
        assert_eq!(
            InputEvent::from(crossterm::event::Event::Paste("hi".into())),
            InputEvent::Paste("hi".into())
        );
    }

    #[test]
    fn as_key_only_for_key_events() {
        let key = InputEvent::Key(KeyEvent::plain(Key::Enter));
        assert!(key.as_key().is_some());
        assert!(InputEvent::FocusGained.as_key().is_none());
    }
}
