//! Headless runtime: message queue, command execution, global bindings.
//!
//! [`App`] owns one root [`Widget`]. Input is enqueued as messages; each call
//! to [`App::process`] feeds queued messages to the root one at a time and runs
//! the [`Cmd`] it returns before taking the next message. Terminal output is
//! left to the embedding program, which renders [`App::view`] however it likes.

use std::time::Duration;

use crate::command::Cmd;
use crate::event::binding::{Binding, Bindings};
use crate::event::input::{InputEvent, KeyEvent};
use crate::event::message::Message;
use crate::event::names;
use crate::event::queue::MessageQueue;
use crate::widget::kind::Widget;
use crate::widget::traits::Component;

const DEFAULT_MAX_STEPS: usize = 10_000;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the runtime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional application title.
    pub title: Option<String>,
    /// Upper bound on messages handled by a single [`App::process`] call.
    pub max_steps: usize,
    /// Initial terminal size.
    pub size: (u16, u16),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            max_steps: DEFAULT_MAX_STEPS,
            size: (80, 24),
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the step limit (builder). Zero is treated as one.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Set the initial size (builder).
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = (width, height);
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The runtime around one root widget.
#[derive(Debug)]
pub struct App {
    root: Widget,
    queue: MessageQueue,
    /// Commands waiting to run before the next message, e.g. the root's `init`.
    pending: Vec<Cmd>,
    bindings: Bindings,
    config: AppConfig,
    size: (u16, u16),
    running: bool,
}

impl App {
    /// Create a runtime with the default config.
    pub fn new(root: impl Into<Widget>) -> Self {
        Self::with_config(root, AppConfig::default())
    }

    /// Create a runtime. The root's `init` command runs on the first
    /// [`process`](Self::process).
    pub fn with_config(root: impl Into<Widget>, config: AppConfig) -> Self {
        let mut root = root.into();
        let init = root.init();
        tracing::debug!(root = %root.id(), kind = root.kind(), "app created");
        Self {
            root,
            queue: MessageQueue::new(),
            pending: vec![init],
            bindings: Bindings::from(vec![Binding::new(KeyEvent::ctrl('c'), names::QUIT, "quit")]),
            size: config.size,
            config,
            running: true,
        }
    }

    /// Application-level bindings, checked before the root sees a key.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Mutable access to the application-level bindings.
    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// The runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The root widget.
    pub fn root(&self) -> &Widget {
        &self.root
    }

    /// Mutable access to the root widget.
    pub fn root_mut(&mut self) -> &mut Widget {
        &mut self.root
    }

    /// Last known terminal size.
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Render the root widget.
    pub fn view(&self) -> String {
        self.root.view()
    }

    /// Number of messages waiting.
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Turn raw input into queued messages.
    ///
    /// Global bindings are resolved first; a `Quit` binding stops the app
    /// without the root seeing the key. Resizes are recorded, not enqueued.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => {
                let global = self.bindings.resolve(&key).map(|(_, b)| b.event.clone());
                match global.as_deref() {
                    Some(names::QUIT) => {
                        tracing::debug!("quit binding pressed");
                        self.running = false;
                    }
                    Some(name) => self.queue.push(Message::action(name)),
                    None => self.queue.push(Message::key(key)),
                }
            }
            InputEvent::Resize { width, height } => self.size = (width, height),
            InputEvent::Mouse => {}
            other => self.queue.push(Message::Input(other)),
        }
    }

    /// Enqueue a message for the root.
    pub fn send(&mut self, msg: Message) {
        self.queue.push(msg);
    }

    /// Whether the app should quit.
    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Request the app to quit.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Run pending commands and drain the queue.
    ///
    /// Messages and commands produced along the way are handled in the same
    /// call, until the queue is empty, the app quits, or the step limit is
    /// reached. Returns how many messages the root was given.
    pub async fn process(&mut self) -> usize {
        let mut stack: Vec<Cmd> = self.pending.drain(..).rev().collect();
        let mut steps = 0;
        loop {
            while let Some(cmd) = stack.pop() {
                if !self.running {
                    break;
                }
                self.execute(cmd, &mut stack).await;
            }
            if !self.running {
                break;
            }
            if steps >= self.config.max_steps {
                if !self.queue.is_empty() {
                    tracing::warn!(
                        steps,
                        pending = self.queue.pending_count(),
                        "step limit reached; leaving messages queued"
                    );
                }
                break;
            }
            let Some(msg) = self.queue.pop() else {
                break;
            };
            steps += 1;
            let name = msg.message_name().to_owned();
            let (cmd, response) = self.root.update(msg);
            tracing::trace!(message = %name, handled = response.is_handled(), "root updated");
            stack.push(cmd);
        }
        steps
    }

    async fn execute(&mut self, cmd: Cmd, stack: &mut Vec<Cmd>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => stack.extend(cmds.into_iter().rev()),
            Cmd::Msg(msg) => self.queue.push(msg),
            Cmd::Publish(publication) => {
                publication.deliver();
            }
            Cmd::Perform(future) => {
                let msg = future.await;
                self.queue.push(msg);
            }
            Cmd::Tick { after, message } => {
                sleep(after).await;
                self.queue.push(message);
            }
            Cmd::Quit => {
                tracing::debug!("quit command");
                self.running = false;
            }
        }
    }
}

async fn sleep(after: Duration) {
    if !after.is_zero() {
        tokio::time::sleep(after).await;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
