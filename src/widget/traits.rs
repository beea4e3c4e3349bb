//! Component contract: identity, view, update, focus.
//!
//! Every widget implements [`Component`]. Focus querying is an optional
//! capability expressed by [`Focusable`]; callers ask for it through
//! [`Component::as_focusable`] instead of probing at runtime.

use std::borrow::Borrow;
use std::fmt;

use crate::command::Cmd;
use crate::event::message::Message;

// ---------------------------------------------------------------------------
// ComponentId
// ---------------------------------------------------------------------------

/// Identity of a component instance, used to address targeted messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentId(String);

impl ComponentId {
    /// Create an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a child id: `"<self>.<suffix>"`.
    pub fn child(&self, suffix: &str) -> Self {
        Self(format!("{}.{}", self.0, suffix))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ComponentId> for ComponentId {
    fn from(id: &ComponentId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Outcome of offering one message to a component.
///
/// `Handled` stops propagation within the current dispatch cycle; `Ignored`
/// lets the caller route the message elsewhere (e.g. cycle focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Handled,
    Ignored,
}

impl Response {
    /// Whether the message was consumed.
    pub fn is_handled(self) -> bool {
        self == Response::Handled
    }
}

impl From<bool> for Response {
    fn from(handled: bool) -> Self {
        if handled {
            Response::Handled
        } else {
            Response::Ignored
        }
    }
}

// ---------------------------------------------------------------------------
// Focusable
// ---------------------------------------------------------------------------

/// Capability: the component tracks whether it has keyboard focus.
pub trait Focusable {
    /// Give or take focus.
    fn set_focused(&mut self, focused: bool);

    /// Whether the component currently has focus.
    fn has_focus(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Contract every widget satisfies.
///
/// `update` mutates the component in place and returns the follow-up command
/// plus whether the message was consumed. A component that ignores a message
/// must leave its state untouched.
pub trait Component {
    /// Identity used for targeted messages.
    fn id(&self) -> &ComponentId;

    /// Plain-text view of the current state.
    fn view(&self) -> String;

    /// Process one message.
    fn update(&mut self, msg: Message) -> (Cmd, Response);

    /// Command to run once when the component is mounted.
    fn init(&mut self) -> Cmd {
        Cmd::None
    }

    /// The focus capability, if this component has one.
    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }

    /// Mutable access to the focus capability.
    fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        None
    }

    /// Give or take focus. No-op for components without the capability.
    fn set_focus(&mut self, focused: bool) {
        if let Some(f) = self.as_focusable_mut() {
            f.set_focused(focused);
        }
    }

    /// Whether this component has focus. `false` without the capability.
    fn is_focused(&self) -> bool {
        self.as_focusable().is_some_and(|f| f.has_focus())
    }
}

/// `true` if `msg` is not addressed to anyone but `id`.
///
/// Untargeted messages are for everyone; targeted ones only for their target.
pub fn addressed_to(id: &ComponentId, msg: &Message) -> bool {
    match msg {
        Message::Targeted { target, .. } => target == id,
        _ => true,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Label {
        id: ComponentId,
        text: String,
    }

    impl Component for Label {
        fn id(&self) -> &ComponentId {
            &self.id
        }

        fn view(&self) -> String {
            self.text.clone()
        }

        fn update(&mut self, _msg: Message) -> (Cmd, Response) {
            (Cmd::None, Response::Ignored)
        }
    }

    struct Toggle {
        id: ComponentId,
        focused: bool,
    }

    impl Focusable for Toggle {
        fn set_focused(&mut self, focused: bool) {
            self.focused = focused;
        }

        fn has_focus(&self) -> bool {
            self.focused
        }
    }

    impl Component for Toggle {
        fn id(&self) -> &ComponentId {
            &self.id
        }

        fn view(&self) -> String {
            String::new()
        }

        fn update(&mut self, _msg: Message) -> (Cmd, Response) {
            (Cmd::None, Response::Handled)
        }

        fn as_focusable(&self) -> Option<&dyn Focusable> {
            Some(self)
        }

        fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
            Some(self)
        }
    }

    #[test]
    fn component_id_helpers() {
        let id = ComponentId::new("crud");
        assert_eq!(id.as_str(), "crud");
        assert_eq!(id.to_string(), "crud");
        assert_eq!(id.child("table"), ComponentId::new("crud.table"));
        assert!(id == "crud");
    }

    #[test]
    fn focus_is_noop_without_capability() {
        let mut label = Label {
            id: "label".into(),
            text: "hi".into(),
        };
        label.set_focus(true);
        assert!(!label.is_focused());
        assert!(label.as_focusable().is_none());
        assert_eq!(label.view(), "hi");
    }

    #[test]
    fn focus_routes_through_capability() {
        let mut toggle = Toggle {
            id: "toggle".into(),
            focused: false,
        };
        toggle.set_focus(true);
        assert!(toggle.is_focused());
        toggle.set_focus(false);
        assert!(!toggle.is_focused());
    }

    #[test]
    fn response_from_bool() {
        assert_eq!(Response::from(true), Response::Handled);
        assert_eq!(Response::from(false), Response::Ignored);
        assert!(Response::Handled.is_handled());
    }

    #[test]
    fn addressed_to_checks_targets() {
        let id = ComponentId::new("a");
        assert!(addressed_to(&id, &Message::action("x")));
        assert!(addressed_to(&id, &Message::targeted("a", Message::action("x"))));
        assert!(!addressed_to(&id, &Message::targeted("b", Message::action("x"))));
    }
}
