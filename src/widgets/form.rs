//! Form widget: an ordered list of labelled text inputs.
//!
//! One field is active at a time. Tab and BackTab cycle through fields; other
//! editing keys go to the active field's [`Input`].

use serde_json::Value;

use crate::command::Cmd;
use crate::config::{FieldKind, FieldSpec};
use crate::event::binding::Bindings;
use crate::event::bus::EventBus;
use crate::event::input::{InputEvent, Key};
use crate::event::message::{Message, Payload};
use crate::widget::dispatch::{dispatch, Interactive};
use crate::widget::traits::{Component, ComponentId, Focusable, Response};
use crate::widgets::input::Input;
use crate::widgets::table::cell_text;

/// One field: its description plus the editor holding its value.
#[derive(Debug, Clone)]
struct Field {
    spec: FieldSpec,
    input: Input,
}

/// A data-entry form.
#[derive(Debug, Clone)]
pub struct Form {
    id: ComponentId,
    title: String,
    fields: Vec<Field>,
    active: usize,
    focused: bool,
    bindings: Bindings,
    bus: Option<EventBus>,
}

impl Form {
    /// Create a form with one input per field spec.
    pub fn new(id: impl Into<ComponentId>, specs: Vec<FieldSpec>) -> Self {
        let fields = specs
            .into_iter()
            .map(|spec| Field {
                input: Input::for_field(&spec),
                spec,
            })
            .collect();
        Self {
            id: id.into(),
            title: String::new(),
            fields,
            active: 0,
            focused: false,
            bindings: Bindings::new(),
            bus: None,
        }
    }

    /// Set a title line (builder pattern).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the bindings (builder pattern).
    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Publish binding events on `bus` (builder pattern).
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    // ── Values ───────────────────────────────────────────────────────

    /// Current values keyed by field name.
    ///
    /// Number fields holding a valid number are emitted as JSON numbers.
    pub fn values(&self) -> Payload {
        self.fields
            .iter()
            .map(|f| (f.spec.name.clone(), field_value(f)))
            .collect()
    }

    /// The current text of one field.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.spec.name == name)
            .map(|f| f.input.value())
    }

    /// Fill every field from `data`; fields missing from it get their default.
    pub fn load(&mut self, data: &Payload) {
        for field in &mut self.fields {
            match data.get(&field.spec.name) {
                Some(value) => field.input.set_value(cell_text(value)),
                None => field.input.set_value(field.spec.default.clone()),
            }
        }
        self.active = 0;
    }

    /// Restore every field to its default and activate the first one.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input = Input::for_field(&field.spec);
        }
        self.active = 0;
    }

    /// Names of required fields that are still empty.
    pub fn missing_required(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.spec.required && f.input.value().trim().is_empty())
            .map(|f| f.spec.name.as_str())
            .collect()
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Name of the active field.
    pub fn active_field(&self) -> Option<&str> {
        self.fields.get(self.active).map(|f| f.spec.name.as_str())
    }

    /// Activate the next field, wrapping around.
    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    /// Activate the previous field, wrapping around.
    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn field_value(field: &Field) -> Value {
    let text = field.input.value();
    if field.spec.kind == FieldKind::Number {
        if let Ok(n) = text.parse::<i64>() {
            return Value::from(n);
        }
        if let Some(n) = text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_owned())
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

impl Focusable for Form {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

impl Component for Form {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn view(&self) -> String {
        let label_width = self
            .fields
            .iter()
            .map(|f| f.spec.display_label().chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(self.fields.len() + 1);
        if !self.title.is_empty() {
            lines.push(self.title.clone());
        }
        for (i, field) in self.fields.iter().enumerate() {
            let marker = if i == self.active { "> " } else { "  " };
            let required = if field.spec.required { "*" } else { " " };
            lines.push(format!(
                "{marker}{label:<label_width$}{required}: {text}",
                label = field.spec.display_label(),
                text = field.input.display_text(),
            ));
        }
        lines.join("\n")
    }

    fn update(&mut self, msg: Message) -> (Cmd, Response) {
        dispatch(self, msg)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }

    fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Interactive for Form {
    fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    fn bus(&self) -> Option<&EventBus> {
        self.bus.as_ref()
    }

    /// Field navigation and text editing. Everything is consumed.
    fn delegate(&mut self, msg: Message) -> (Cmd, Response) {
        match msg {
            Message::Input(InputEvent::Key(key)) => match key.code {
                Key::Tab => self.next_field(),
                Key::BackTab => self.prev_field(),
                _ => {
                    if let Some(field) = self.fields.get_mut(self.active) {
                        field.input.handle_key(&key);
                    }
                }
            },
            Message::Input(InputEvent::Paste(text)) => {
                if let Some(field) = self.fields.get_mut(self.active) {
                    field.input.insert_str(&text);
                }
            }
            _ => {}
        }
        (Cmd::None, Response::Handled)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
