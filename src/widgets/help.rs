//! Help widget: lists the enabled key bindings.
//!
//! Short mode packs the hints onto one line; full mode shows one binding per
//! line with aligned descriptions. `?` toggles between them.

use crate::command::Cmd;
use crate::event::binding::Bindings;
use crate::event::input::{Key, Modifiers};
use crate::event::message::Message;
use crate::widget::dispatch::unwrap_targeted;
use crate::widget::traits::{Component, ComponentId, Response};

/// Key-binding help.
#[derive(Debug, Clone)]
pub struct Help {
    id: ComponentId,
    bindings: Bindings,
    expanded: bool,
}

impl Help {
    /// Create a short-mode help listing `bindings`.
    pub fn new(id: impl Into<ComponentId>, bindings: Bindings) -> Self {
        Self {
            id: id.into(),
            bindings,
            expanded: false,
        }
    }

    /// Replace the listed bindings.
    pub fn set_bindings(&mut self, bindings: Bindings) {
        self.bindings = bindings;
    }

    /// Whether the full listing is shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Switch between short and full mode.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

impl Component for Help {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn view(&self) -> String {
        if !self.expanded {
            let hints: Vec<String> = self.bindings.enabled().map(ToString::to_string).collect();
            return hints.join(" · ");
        }
        let keys: Vec<(String, &str)> = self
            .bindings
            .enabled()
            .map(|b| (b.key.to_string(), b.description.as_str()))
            .collect();
        let width = keys.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        keys.iter()
            .map(|(key, desc)| format!("{key:<width$}  {desc}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn update(&mut self, msg: Message) -> (Cmd, Response) {
        let Ok(Some(msg)) = unwrap_targeted(&self.id, msg) else {
            return (Cmd::None, Response::Ignored);
        };
        match msg.as_key() {
            Some(key) if key.code == Key::Char('?') && !key.modifiers.contains(Modifiers::CTRL) => {
                self.toggle();
                (Cmd::None, Response::Handled)
            }
            _ => (Cmd::None, Response::Ignored),
        }
    }
}
