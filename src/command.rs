//! Deferred commands returned from `update`.
//!
//! A [`Cmd`] describes work for the surrounding runtime to do after the
//! current synchronous update step has returned: deliver an event to bus
//! subscribers, run an async operation and feed its result back as a message,
//! re-enqueue a message, or stop. Widgets never perform these effects inline.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::event::bus::{Event, Publication};
use crate::event::message::Message;

/// An async operation that finishes with exactly one message.
pub type BoxFuture = Pin<Box<dyn Future<Output = Message> + Send + 'static>>;

/// A side effect to run after `update` returns.
#[must_use = "a command does nothing unless returned to the runtime"]
#[derive(Default)]
pub enum Cmd {
    /// Nothing to do.
    #[default]
    None,
    /// Run each command in order.
    Batch(Vec<Cmd>),
    /// Feed a message back into the runtime queue.
    Msg(Message),
    /// Deliver an event to the subscribers of a bus.
    Publish(Publication),
    /// Await a future and enqueue the message it yields.
    Perform(BoxFuture),
    /// Enqueue `message` after `after` has elapsed.
    Tick { after: Duration, message: Message },
    /// Stop the runtime.
    Quit,
}

impl Cmd {
    /// Wrap a future as a deferred operation.
    pub fn perform<F>(future: F) -> Self
    where
        F: Future<Output = Message> + Send + 'static,
    {
        Cmd::Perform(Box::pin(future))
    }

    /// Combine commands, dropping `None`s and flattening nested batches.
    pub fn batch(cmds: impl IntoIterator<Item = Cmd>) -> Self {
        let mut flat = Vec::new();
        for cmd in cmds {
            match cmd {
                Cmd::None => {}
                Cmd::Batch(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Cmd::None,
            1 => flat.pop().unwrap_or_default(),
            _ => Cmd::Batch(flat),
        }
    }

    /// Append another command after this one.
    pub fn and(self, next: Cmd) -> Self {
        Cmd::batch([self, next])
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Events this command would publish, in delivery order.
    pub fn published(&self) -> Vec<&Event> {
        let mut out = Vec::new();
        self.collect_published(&mut out);
        out
    }

    fn collect_published<'a>(&'a self, out: &mut Vec<&'a Event>) {
        match self {
            Cmd::Publish(publication) => out.push(publication.event()),
            Cmd::Batch(cmds) => cmds.iter().for_each(|c| c.collect_published(out)),
            _ => {}
        }
    }

    /// Number of async operations in this command.
    pub fn pending_operations(&self) -> usize {
        match self {
            Cmd::Perform(_) => 1,
            Cmd::Batch(cmds) => cmds.iter().map(Cmd::pending_operations).sum(),
            _ => 0,
        }
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(msg) => f.debug_tuple("Msg").field(msg).finish(),
            Self::Publish(p) => f.debug_tuple("Publish").field(p.event()).finish(),
            Self::Perform(_) => write!(f, "Perform(<future>)"),
            Self::Tick { after, message } => f
                .debug_struct("Tick")
                .field("after", after)
                .field("message", message)
                .finish(),
            Self::Quit => write!(f, "Quit"),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
