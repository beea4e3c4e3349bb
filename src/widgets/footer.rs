//! Footer widget: one line of left-aligned status text.
//!
//! A footer can also be built from a binding list, in which case it shows the
//! enabled key hints (`enter select · ctrl+n new`).

use crate::command::Cmd;
use crate::event::binding::Bindings;
use crate::event::message::Message;
use crate::widget::traits::{Component, ComponentId, Response};

/// A status footer.
#[derive(Debug, Clone)]
pub struct Footer {
    id: ComponentId,
    content: String,
    width: Option<u16>,
}

impl Footer {
    /// Create a new footer with the given content.
    pub fn new(id: impl Into<ComponentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            width: None,
        }
    }

    /// A footer listing the enabled bindings as key hints.
    pub fn from_bindings(id: impl Into<ComponentId>, bindings: &Bindings) -> Self {
        let hints: Vec<String> = bindings.enabled().map(ToString::to_string).collect();
        Self::new(id, hints.join(" · "))
    }

    /// Pad or truncate to a fixed width (builder pattern).
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Return the footer content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
}

impl Component for Footer {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn view(&self) -> String {
        match self.width {
            Some(w) => {
                let w = w as usize;
                let truncated: String = self.content.chars().take(w).collect();
                format!("{truncated:<w$}")
            }
            None => self.content.clone(),
        }
    }

    fn update(&mut self, _msg: Message) -> (Cmd, Response) {
        (Cmd::None, Response::Ignored)
    }
}
