//! The interactive dispatch template.
//!
//! Every interactive widget runs incoming messages through [`dispatch`]:
//!
//! 1. Unwrap `Targeted` envelopes. A message for someone else is `Ignored`
//!    without touching the widget.
//! 2. For key input, resolve the widget's ordered bindings. On a match the
//!    widget's special-key handler gets the first say; if it passes, the
//!    generic binding handler publishes the binding's event.
//! 3. Anything else is delegated to the widget's native update.
//!
//! Exactly one of "handled via binding" or "delegated" happens per call.

use crate::command::Cmd;
use crate::error::DispatchError;
use crate::event::binding::{Binding, Bindings};
use crate::event::bus::EventBus;
use crate::event::input::KeyEvent;
use crate::event::message::{payload, Message};
use crate::widget::traits::{Component, ComponentId, Response};

/// Deepest envelope nesting accepted before a message is treated as malformed.
pub const MAX_UNWRAP_DEPTH: usize = 32;

/// What a widget's special-key handler decided.
#[derive(Debug)]
pub enum KeyOutcome {
    /// Consumed; return this command.
    Handled(Cmd),
    /// Deliberately left unhandled so an enclosing layout can act on it.
    Ignored,
    /// Not special in the current state; fall through to the binding handler.
    Pass,
}

/// Hooks a widget supplies to reuse [`dispatch`].
pub trait Interactive: Component {
    /// Ordered bindings; read-only during a dispatch pass.
    fn bindings(&self) -> &Bindings;

    /// Bus the generic binding handler publishes on.
    fn bus(&self) -> Option<&EventBus> {
        None
    }

    /// Widget-specific handling for a key that matched `binding`.
    fn handle_special_key(&mut self, _key: &KeyEvent, _binding: &Binding) -> KeyOutcome {
        KeyOutcome::Pass
    }

    /// Generic handling for a matched binding: publish its event.
    ///
    /// The payload carries the chord (`key`) and the binding `description`.
    fn handle_binding(&mut self, key: &KeyEvent, binding: &Binding) -> (Cmd, Response) {
        let cmd = match self.bus() {
            Some(bus) => bus.publish(
                self.id(),
                binding.event.clone(),
                payload([
                    ("key", key.to_string()),
                    ("description", binding.description.clone()),
                ]),
            ),
            None => Cmd::None,
        };
        (cmd, Response::Handled)
    }

    /// Forward the message to the wrapped widget's own update.
    fn delegate(&mut self, msg: Message) -> (Cmd, Response);
}

/// Peel `Targeted` envelopes addressed to `id`.
///
/// Returns `Ok(None)` if any layer is addressed to someone else, and an error
/// if the nesting exceeds [`MAX_UNWRAP_DEPTH`].
pub fn unwrap_targeted(id: &ComponentId, msg: Message) -> Result<Option<Message>, DispatchError> {
    let mut current = msg;
    let mut depth = 0;
    loop {
        match current {
            Message::Targeted { target, inner } => {
                if target != *id {
                    return Ok(None);
                }
                depth += 1;
                if depth > MAX_UNWRAP_DEPTH {
                    return Err(DispatchError::UnwrapDepthExceeded {
                        depth: MAX_UNWRAP_DEPTH,
                        target,
                    });
                }
                current = *inner;
            }
            other => return Ok(Some(other)),
        }
    }
}

/// Run one message through the template for `widget`.
pub fn dispatch<W>(widget: &mut W, msg: Message) -> (Cmd, Response)
where
    W: Interactive + ?Sized,
{
    let msg = match unwrap_targeted(widget.id(), msg) {
        Ok(Some(msg)) => msg,
        Ok(None) => return (Cmd::None, Response::Ignored),
        Err(err) => {
            tracing::warn!(widget = %widget.id(), error = %err, "dropping malformed message");
            return (Cmd::None, Response::Ignored);
        }
    };

    if let Some(key) = msg.as_key().copied() {
        let matched = widget.bindings().resolve(&key).map(|(_, b)| b.clone());
        if let Some(binding) = matched {
            tracing::trace!(widget = %widget.id(), key = %key, event = %binding.event, "binding matched");
            match widget.handle_special_key(&key, &binding) {
                KeyOutcome::Handled(cmd) => return (cmd, Response::Handled),
                KeyOutcome::Ignored => return (Cmd::None, Response::Ignored),
                KeyOutcome::Pass => return widget.handle_binding(&key, &binding),
            }
        }
    }

    tracing::trace!(widget = %widget.id(), msg = msg.message_name(), "delegating");
    widget.delegate(msg)
}

// ===========================================================================
// Tests
// ===========================================================================
