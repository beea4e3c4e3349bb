//! Pilot: programmatic interaction with a headless [`App`].
//!
//! The `Pilot` owns a single-threaded tokio runtime and blocks on
//! [`App::process`], so tests can drive widgets synchronously: press keys,
//! process, then assert on [`view`](Pilot::view) or the root widget.

use std::io;

use tokio::runtime::{Builder, Runtime};

use crate::app::{App, AppConfig};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers};
use crate::event::message::Message;
use crate::widget::kind::Widget;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```
/// use weft_tui::event::{Bindings, Key};
/// use weft_tui::testing::Pilot;
/// use weft_tui::widgets::Help;
///
/// let mut pilot = Pilot::new(Help::new("help", Bindings::crud_defaults())).unwrap();
/// pilot.press_key(Key::Char('?'));
/// pilot.process();
/// assert!(pilot.view().starts_with("enter"));
/// assert!(pilot.is_running());
/// ```
pub struct Pilot {
    app: App,
    runtime: Runtime,
}

impl Pilot {
    /// Create a pilot around `root` with the default config.
    pub fn new(root: impl Into<Widget>) -> io::Result<Self> {
        Self::with_config(root, AppConfig::default())
    }

    /// Create a pilot around `root` with `config`.
    pub fn with_config(root: impl Into<Widget>, config: AppConfig) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_time().build()?;
        Ok(Self {
            app: App::with_config(root, config),
            runtime,
        })
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.app
            .handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Simulate a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.app.handle_input(InputEvent::Resize { width, height });
    }

    /// Enqueue an arbitrary message.
    pub fn send(&mut self, msg: Message) {
        self.app.send(msg);
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Run the app until its queue is empty. Returns the number of messages
    /// the root handled.
    pub fn process(&mut self) -> usize {
        self.runtime.block_on(self.app.process())
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Render the root widget.
    pub fn view(&self) -> String {
        self.app.view()
    }

    /// Borrow the underlying app immutably.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Borrow the underlying app mutably.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
