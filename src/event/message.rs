//! Messages: the closed set of things a component's `update` can receive.
//!
//! A [`Message`] is either raw input, a named [`Action`] with a payload, or a
//! `Targeted` envelope addressing an inner message to one component among
//! siblings sharing a message stream.

use serde_json::{Map, Value};

use super::input::{InputEvent, KeyEvent};
use crate::widget::ComponentId;

/// Arbitrary event/action payload.
pub type Payload = Map<String, Value>;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A named event carrying a payload.
///
/// Used both for UI-origin events (`RowSelected`, `FormSubmit`) and for
/// completion notifications from deferred data operations
/// (`DATA_LOAD_COMPLETED`).
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub payload: Payload,
}

impl Action {
    /// Create an action with an empty payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::new(),
        }
    }

    /// Create an action with the given payload.
    pub fn with_payload(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Input to a component's `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Only the component whose id equals `target` acts on `inner`.
    Targeted {
        target: ComponentId,
        inner: Box<Message>,
    },
    Action(Action),
    Input(InputEvent),
}

impl Message {
    /// Wrap `inner` so that only `target` handles it.
    pub fn targeted(target: impl Into<ComponentId>, inner: Message) -> Self {
        Message::Targeted {
            target: target.into(),
            inner: Box::new(inner),
        }
    }

    /// A named action with an empty payload.
    pub fn action(name: impl Into<String>) -> Self {
        Message::Action(Action::new(name))
    }

    /// A named action with a payload.
    pub fn action_with(name: impl Into<String>, payload: Payload) -> Self {
        Message::Action(Action::with_payload(name, payload))
    }

    /// A key press.
    pub fn key(event: impl Into<KeyEvent>) -> Self {
        Message::Input(InputEvent::Key(event.into()))
    }

    /// The key event, if this is a raw key input.
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Message::Input(input) => input.as_key(),
            _ => None,
        }
    }

    /// The action, if this is one.
    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Message::Action(action) => Some(action),
            _ => None,
        }
    }

    /// Short name for logging.
    pub fn message_name(&self) -> &str {
        match self {
            Message::Targeted { .. } => "Targeted",
            Message::Action(action) => &action.name,
            Message::Input(InputEvent::Key(_)) => "Key",
            Message::Input(_) => "Input",
        }
    }
}

impl From<Action> for Message {
    fn from(action: Action) -> Self {
        Message::Action(action)
    }
}

impl From<InputEvent> for Message {
    fn from(input: InputEvent) -> Self {
        Message::Input(input)
    }
}

/// Build a payload from `(key, value)` pairs.
pub fn payload<K, V, I>(pairs: I) -> Payload
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::Key;

    #[test]
    fn message_names() {
        assert_eq!(Message::action("RowSelected").message_name(), "RowSelected");
        assert_eq!(Message::key(Key::Enter).message_name(), "Key");
        assert_eq!(
            Message::Input(InputEvent::FocusGained).message_name(),
            "Input"
        );
        let wrapped = Message::targeted("table", Message::action("x"));
        assert_eq!(wrapped.message_name(), "Targeted");
    }

    #[test]
    fn as_key_and_as_action() {
        let key = Message::key(Key::Escape);
        assert_eq!(key.as_key(), Some(&KeyEvent::plain(Key::Escape)));
        assert!(key.as_action().is_none());

        let action = Message::action("FormCancel");
        assert_eq!(action.as_action().map(|a| a.name.as_str()), Some("FormCancel"));
        assert!(action.as_key().is_none());
    }

    #[test]
    fn targeted_keeps_inner() {
        let msg = Message::targeted("crud", Message::key(Key::Enter));
        match msg {
            Message::Targeted { target, inner } => {
                assert_eq!(target.as_str(), "crud");
                assert_eq!(*inner, Message::key(Key::Enter));
            }
            _ => panic!("expected Targeted"),
        }
    }

    #[test]
    fn payload_builder() {
        let p = payload([("transition", "a"), ("state", "b")]);
        assert_eq!(p.get("transition"), Some(&Value::from("a")));
        assert_eq!(p.len(), 2);
    }
}
