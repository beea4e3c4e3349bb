//! Record editor: a table and a form driven by a state machine.
//!
//! [`Crud`] owns an optional [`Table`] and an optional [`Form`]. The current
//! [`CrudState`] decides which of them is active; every message the editor
//! does not intercept goes to that child alone.
//!
//! Messages pass through the shared dispatch template. Key bindings that mean
//! something in the current state (select, new, delete, save, cancel) are
//! handled here; the transition table in [`state`] covers named actions, and
//! the `DATA_*_COMPLETED` actions close the loop on data requests issued
//! through [`data`].

pub mod data;
pub mod state;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::command::Cmd;
use crate::config::{ActionSpec, Props, WidgetConfig};
use crate::error::ConfigError;
use crate::event::binding::{Binding, Bindings};
use crate::event::bus::{Event, EventBus, Subscription};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers};
use crate::event::message::{payload, Action, Message, Payload};
use crate::event::names;
use crate::widget::dispatch::{dispatch, Interactive, KeyOutcome};
use crate::widget::traits::{Component, ComponentId, Response};
use crate::widgets::form::Form;
use crate::widgets::table::Table;

pub use data::{DataBackend, DataOp, StaticBackend};
pub use state::{ActiveChild, CrudState};

// ---------------------------------------------------------------------------
// Crud
// ---------------------------------------------------------------------------

/// Composite record editor.
pub struct Crud {
    id: ComponentId,
    config: WidgetConfig,
    state: CrudState,
    table: Option<Table>,
    form: Option<Form>,
    /// Whether focus was last given to the editor; survives child switches.
    focus_requested: bool,
    /// Query being typed while in `Filtering`.
    filter_draft: String,
    bus: EventBus,
    backend: Arc<dyn DataBackend>,
    subscriptions: Vec<Subscription>,
}

impl Crud {
    /// Build from a property map, publishing on `bus`.
    pub fn new(id: impl Into<ComponentId>, props: &Props, bus: &EventBus) -> Self {
        Self::from_config(id, WidgetConfig::from_props(props), bus)
    }

    /// Build from an already extracted configuration.
    pub fn from_config(id: impl Into<ComponentId>, config: WidgetConfig, bus: &EventBus) -> Self {
        let id = id.into();
        let (table, form) = build_children(&id, &config, bus);
        let focused = config.focused;
        let mut crud = Self {
            id,
            config,
            state: CrudState::List,
            table,
            form,
            focus_requested: false,
            filter_draft: String::new(),
            bus: bus.clone(),
            backend: Arc::new(StaticBackend),
            subscriptions: Vec::new(),
        };
        if focused {
            crud.set_focus(true);
        }
        crud
    }

    /// Use `backend` for data requests (builder pattern).
    pub fn with_backend(mut self, backend: Arc<dyn DataBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Replace the table child (builder pattern).
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    /// Replace the form child (builder pattern).
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Current state.
    pub fn state(&self) -> CrudState {
        self.state
    }

    /// The table child, if any.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The form child, if any.
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    /// Mutable table child.
    pub fn table_mut(&mut self) -> Option<&mut Table> {
        self.table.as_mut()
    }

    /// Mutable form child.
    pub fn form_mut(&mut self) -> Option<&mut Form> {
        self.form.as_mut()
    }

    /// Query typed so far while filtering.
    pub fn filter_draft(&self) -> &str {
        &self.filter_draft
    }

    /// The committed configuration.
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// The bus events are published on.
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    fn selected_row(&self) -> Option<&Payload> {
        self.table.as_ref().and_then(Table::selected_row)
    }

    fn active_child(&self) -> Option<&dyn Component> {
        match self.state.active_child() {
            ActiveChild::Table => self.table.as_ref().map(|t| t as &dyn Component),
            ActiveChild::Form => self.form.as_ref().map(|f| f as &dyn Component),
        }
    }

    fn active_child_mut(&mut self) -> Option<&mut dyn Component> {
        match self.state.active_child() {
            ActiveChild::Table => self.table.as_mut().map(|t| t as &mut dyn Component),
            ActiveChild::Form => self.form.as_mut().map(|f| f as &mut dyn Component),
        }
    }

    // ── Configuration and subscriptions ──────────────────────────────

    /// Replace the configuration, rebuilding both children and returning to
    /// `List`. On error the current children and state are kept.
    pub fn apply_config(&mut self, value: &Value) -> Result<(), ConfigError> {
        let config = WidgetConfig::from_value(value).inspect_err(|err| {
            tracing::warn!(crud = %self.id, error = %err, "configuration rejected; keeping current");
        })?;
        let (table, form) = build_children(&self.id, &config, &self.bus);
        self.config = config;
        self.table = table;
        self.form = form;
        self.state = CrudState::List;
        let focused = self.focus_requested || self.config.focused;
        self.set_focus(focused);
        tracing::debug!(crud = %self.id, "configuration applied");
        Ok(())
    }

    /// Subscribe to `event` on the editor's bus. Released by [`cleanup`](Self::cleanup).
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let subscription = self.bus.subscribe(event, handler);
        self.subscriptions.push(subscription.clone());
        subscription
    }

    /// Unsubscribe every handler and clear the bus.
    pub fn cleanup(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.bus.cleanup();
        tracing::debug!(crud = %self.id, "subscriptions released");
    }

    // ── Data operations ──────────────────────────────────────────────

    /// Request the record list. `Cmd::None` without a `load` descriptor.
    pub fn load_data(&self) -> Cmd {
        data::request(&self.backend, DataOp::Load, self.config.data_api.load.as_ref(), None)
    }

    /// Request a save of `values`. `Cmd::None` without a `save` descriptor.
    pub fn save_data(&self, values: Payload) -> Cmd {
        data::request(
            &self.backend,
            DataOp::Save,
            self.config.data_api.save.as_ref(),
            Some(Value::Object(values)),
        )
    }

    /// Request deletion of `row`. `Cmd::None` without a `delete` descriptor.
    pub fn delete_data(&self, row: Payload) -> Cmd {
        data::request(
            &self.backend,
            DataOp::Delete,
            self.config.data_api.delete.as_ref(),
            Some(Value::Object(row)),
        )
    }

    // ── State machine ────────────────────────────────────────────────

    fn emit(&self, event: &str, payload: Payload) -> Cmd {
        self.bus.publish(&self.id, event, payload)
    }

    /// Move to `to`, handing focus from the old active child to the new one.
    fn enter(&mut self, to: CrudState) {
        if self.state == to {
            return;
        }
        tracing::debug!(crud = %self.id, from = %self.state, to = %to, "state change");
        if let Some(child) = self.active_child_mut() {
            child.set_focus(false);
        }
        self.state = to;
        if self.focus_requested {
            if let Some(child) = self.active_child_mut() {
                child.set_focus(true);
            }
        }
    }

    /// Apply `event` through the transition table.
    ///
    /// Returns `None`, touching nothing, when the event does not apply in the
    /// current state.
    fn transition(&mut self, event: &str, input: &Payload) -> Option<Cmd> {
        let Some(step) = state::next(self.state, event) else {
            tracing::debug!(crud = %self.id, state = %self.state, event, "event does not apply; ignoring");
            return None;
        };
        let from = self.state;
        let mut out = payload([step.stamp.entry()]);
        let mut follow_up = Cmd::None;

        match event {
            names::ROW_SELECTED => {
                let row = input
                    .get("row")
                    .and_then(Value::as_object)
                    .or_else(|| self.selected_row())
                    .cloned();
                if let (Some(form), Some(row)) = (self.form.as_mut(), row) {
                    form.load(&row);
                }
            }
            names::NEW_ITEM_REQUESTED => {
                if let Some(form) = self.form.as_mut() {
                    form.reset();
                }
            }
            names::FILTER_REQUESTED => {
                self.filter_draft = self
                    .table
                    .as_ref()
                    .map(|t| t.filter_query().to_owned())
                    .unwrap_or_default();
            }
            names::FILTER_APPLIED => {
                let query = match input.get("query").and_then(Value::as_str) {
                    Some(query) => query.to_owned(),
                    None => std::mem::take(&mut self.filter_draft),
                };
                self.filter_draft.clear();
                if let Some(table) = self.table.as_mut() {
                    table.filter(&query);
                }
                out.insert("query".into(), Value::from(query));
            }
            names::FORM_CANCEL if from == CrudState::Filtering => {
                self.filter_draft.clear();
                if let Some(table) = self.table.as_mut() {
                    table.clear_filter();
                }
            }
            names::DELETE_CONFIRMED => {
                if let Some(row) = self.selected_row().cloned() {
                    follow_up = self.delete_data(row);
                }
            }
            _ => {}
        }

        self.enter(step.to);
        Some(self.emit(step.emit, out).and(follow_up))
    }

    /// Edit the filter query with a typed key, narrowing the table live.
    ///
    /// Returns `false` for keys that are not query edits.
    fn edit_filter(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.contains(Modifiers::CTRL) || key.modifiers.contains(Modifiers::ALT) {
            return false;
        }
        match key.code {
            Key::Char(ch) => self.filter_draft.push(ch),
            Key::Backspace => {
                self.filter_draft.pop();
            }
            _ => return false,
        }
        if let Some(table) = self.table.as_mut() {
            table.filter(&self.filter_draft);
        }
        true
    }

    /// Publish `FormSubmit` with the form values and request a save.
    ///
    /// Nothing happens while a required field is empty.
    fn submit(&self) -> Cmd {
        let Some(form) = self.form.as_ref() else {
            return self.emit(names::FORM_SUBMIT, Payload::new());
        };
        let missing = form.missing_required();
        if !missing.is_empty() {
            tracing::debug!(crud = %self.id, ?missing, "submit blocked by empty required fields");
            return Cmd::None;
        }
        let values = form.values();
        self.emit(names::FORM_SUBMIT, values.clone())
            .and(self.save_data(values))
    }

    fn handle_action(&mut self, action: Action) -> Result<(Cmd, Response), Action> {
        let name = action.name.as_str();

        if state::is_transition_event(name) {
            return Ok(match self.transition(name, &action.payload) {
                Some(cmd) => (cmd, Response::Handled),
                None => (Cmd::None, Response::Ignored),
            });
        }

        match name {
            names::FORM_SUBMIT if self.state.is_editing() => {
                let values = self.form.as_ref().map(Form::values).unwrap_or_default();
                Ok((self.save_data(values), Response::Handled))
            }
            names::FORM_SUBMIT => Ok((Cmd::None, Response::Ignored)),
            names::DATA_LOAD_COMPLETED => Ok(self.on_load_completed(action.payload)),
            names::DATA_SAVE_COMPLETED => Ok(self.on_save_completed(action.payload)),
            names::DATA_DELETE_COMPLETED => Ok(self.on_delete_completed(action.payload)),
            _ => match self.config.actions.get(name).cloned() {
                Some(spec) => Ok((self.run_action(&spec, action.payload), Response::Handled)),
                None => Err(action),
            },
        }
    }

    fn on_load_completed(&mut self, completion: Payload) -> (Cmd, Response) {
        if let Some(Value::Array(items)) = completion.get("result") {
            let rows: Vec<Payload> = items.iter().filter_map(|v| v.as_object().cloned()).collect();
            tracing::debug!(crud = %self.id, rows = rows.len(), "records loaded");
            if let Some(table) = self.table.as_mut() {
                table.set_rows(rows);
            }
        }
        (self.emit(names::DATA_LOADED, completion), Response::Handled)
    }

    fn on_save_completed(&mut self, completion: Payload) -> (Cmd, Response) {
        let reload = if data::succeeded(&completion) {
            self.load_data()
        } else {
            Cmd::None
        };
        self.enter(CrudState::List);
        let cmd = self.emit(names::FORM_SUBMIT_SUCCESS, completion).and(reload);
        (cmd, Response::Handled)
    }

    fn on_delete_completed(&mut self, completion: Payload) -> (Cmd, Response) {
        let reload = if data::succeeded(&completion) {
            self.load_data()
        } else {
            Cmd::None
        };
        let cmd = self.emit(names::ITEM_DELETED, completion).and(reload);
        (cmd, Response::Handled)
    }

    /// Publish a configured action's event, its payload over the message's.
    fn run_action(&self, spec: &ActionSpec, mut input: Payload) -> Cmd {
        input.extend(spec.payload.clone());
        self.emit(&spec.event, input)
    }

    /// Publish `FocusChanged` after the terminal gained or lost focus.
    fn focus_event(&mut self, focused: bool) -> (Cmd, Response) {
        self.set_focus(focused);
        let cmd = self.emit(names::FOCUS_CHANGED, payload([("focused", focused)]));
        (cmd, Response::Handled)
    }
}

/// Build the children a configuration asks for.
///
/// A table exists when there are columns, rows or a `load` descriptor to fill
/// it; a form exists when there are fields.
fn build_children(id: &ComponentId, config: &WidgetConfig, bus: &EventBus) -> (Option<Table>, Option<Form>) {
    let table_props = &config.table_props;
    let wants_table =
        !table_props.columns.is_empty() || !table_props.rows.is_empty() || config.data_api.load.is_some();
    let table = wants_table.then(|| {
        let mut props = table_props.clone();
        props.height = props.height.or(config.height);
        Table::from_config(id.child("table"), &props).with_bus(bus.clone())
    });
    let form = (!config.form_fields.is_empty())
        .then(|| Form::new(id.child("form"), config.form_fields.clone()).with_bus(bus.clone()));
    (table, form)
}

/// Focus of a child, for a child that may lack the capability.
///
/// Without it the child counts as focused in `List` and `Editing`.
fn child_focus(child: &dyn Component, state: CrudState) -> bool {
    match child.as_focusable() {
        Some(focusable) => focusable.has_focus(),
        None => matches!(state, CrudState::List | CrudState::Editing),
    }
}

impl fmt::Debug for Crud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crud")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("table", &self.table.is_some())
            .field("form", &self.form.is_some())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

impl Component for Crud {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn view(&self) -> String {
        let mut lines = Vec::new();
        if !self.config.title.is_empty() {
            lines.push(self.config.title.clone());
        }
        match self.state {
            CrudState::Filtering => lines.push(format!("filter: {}", self.filter_draft)),
            CrudState::Deleting => lines.push("delete selected row? enter confirms, esc cancels".to_owned()),
            CrudState::Creating => lines.push("new record".to_owned()),
            CrudState::Editing => lines.push("edit record".to_owned()),
            CrudState::List => {}
        }
        lines.push(match self.active_child() {
            Some(child) => child.view(),
            None => format!("(no {})", match self.state.active_child() {
                ActiveChild::Table => "table",
                ActiveChild::Form => "form",
            }),
        });
        lines.join("\n")
    }

    fn update(&mut self, msg: Message) -> (Cmd, Response) {
        dispatch(self, msg)
    }

    fn init(&mut self) -> Cmd {
        self.load_data()
    }

    /// Routes to the active child; a no-op if that child is absent.
    fn set_focus(&mut self, focused: bool) {
        self.focus_requested = focused;
        if let Some(child) = self.active_child_mut() {
            child.set_focus(focused);
        }
    }

    fn is_focused(&self) -> bool {
        self.active_child()
            .is_some_and(|child| child_focus(child, self.state))
    }
}

impl Interactive for Crud {
    fn bindings(&self) -> &Bindings {
        &self.config.bindings
    }

    fn bus(&self) -> Option<&EventBus> {
        Some(&self.bus)
    }

    fn handle_special_key(&mut self, _key: &KeyEvent, binding: &Binding) -> KeyOutcome {
        use CrudState::*;

        match (self.state, binding.event.as_str()) {
            (List, names::ROW_SELECTED) => {
                if self.table.is_none() {
                    return KeyOutcome::Pass;
                }
                let Some(row) = self.selected_row().cloned() else {
                    tracing::debug!(crud = %self.id, "nothing selected");
                    return KeyOutcome::Handled(Cmd::None);
                };
                let input = payload([("row", Value::Object(row))]);
                let selected = self.emit(names::ROW_SELECTED, input.clone());
                let step = self.transition(names::ROW_SELECTED, &input).unwrap_or_default();
                KeyOutcome::Handled(selected.and(step))
            }
            (List, names::NEW_ITEM_REQUESTED) => {
                KeyOutcome::Handled(self.transition(names::NEW_ITEM_REQUESTED, &Payload::new()).unwrap_or_default())
            }
            // Only announces the intent; deletion itself waits for
            // DeleteRequested and a confirmation in Deleting.
            (List, names::ITEM_DELETED) => {
                if self.table.is_none() {
                    return KeyOutcome::Pass;
                }
                KeyOutcome::Handled(self.emit(names::ITEM_DELETED, payload([("state", "deleting")])))
            }
            (List, names::FORM_CANCEL) => KeyOutcome::Ignored,
            (Editing | Creating, names::FORM_SUBMIT | names::ROW_SELECTED) => KeyOutcome::Handled(self.submit()),
            (Filtering, names::ROW_SELECTED) => {
                KeyOutcome::Handled(self.transition(names::FILTER_APPLIED, &Payload::new()).unwrap_or_default())
            }
            (Deleting, names::ROW_SELECTED) => {
                KeyOutcome::Handled(self.transition(names::DELETE_CONFIRMED, &Payload::new()).unwrap_or_default())
            }
            (Editing | Creating | Deleting | Filtering, names::FORM_CANCEL) => {
                KeyOutcome::Handled(self.transition(names::FORM_CANCEL, &Payload::new()).unwrap_or_default())
            }
            _ => KeyOutcome::Pass,
        }
    }

    /// Intercept editor actions; forward the rest to the active child and
    /// report whatever it reports.
    fn delegate(&mut self, msg: Message) -> (Cmd, Response) {
        let msg = match msg {
            Message::Action(action) => match self.handle_action(action) {
                Ok(outcome) => return outcome,
                Err(action) => Message::Action(action),
            },
            Message::Input(InputEvent::FocusGained) => return self.focus_event(true),
            Message::Input(InputEvent::FocusLost) => return self.focus_event(false),
            Message::Input(InputEvent::Key(key)) if self.state == CrudState::Filtering && self.edit_filter(&key) => {
                return (Cmd::None, Response::Handled);
            }
            other => other,
        };
        match self.active_child_mut() {
            Some(child) => child.update(msg),
            None => (Cmd::None, Response::Ignored),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
