//! Integration tests for weft-tui.
//!
//! These tests exercise the public API from outside the crate: the record
//! editor driven directly and through the headless `Pilot`, the event bus,
//! binding resolution, and timers running on the app's runtime.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use weft_tui::command::Cmd;
use weft_tui::config::{ApiDescriptor, ColumnSpec, Props};
use weft_tui::error::DataError;
use weft_tui::event::{payload, Binding, Bindings, EventBus, Key, KeyEvent, Message, Modifiers, Payload};
use weft_tui::testing::Pilot;
use weft_tui::widget::{Component, Response, Widget};
use weft_tui::widgets::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn props(value: Value) -> Props {
    match value {
        Value::Object(map) => map,
        _ => panic!("test props must be an object"),
    }
}

fn users_config() -> Value {
    json!({
        "title": "Users",
        "data_api": {
            "load": {"endpoint": "/users", "data": [
                {"id": 1, "name": "Ada"},
                {"id": 2, "name": "Grace"},
            ]},
            "save": {"endpoint": "/users", "method": "POST"},
            "delete": {"endpoint": "/users/{id}", "method": "DELETE"},
        },
        "table_props": {"columns": ["id", "name"]},
        "form_fields": [{"name": "name", "label": "Name", "required": true}],
    })
}

fn emitted(cmd: &Cmd) -> Vec<(String, Payload)> {
    cmd.published()
        .into_iter()
        .map(|e| (e.name.clone(), e.payload.clone()))
        .collect()
}

/// Record the names of `events` as the bus delivers them.
fn record(crud: &mut Crud, events: &[&str]) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for event in events {
        let log = Arc::clone(&log);
        crud.on(*event, move |e| log.lock().unwrap().push(e.name.clone()));
    }
    log
}

fn crud_state(pilot: &Pilot) -> CrudState {
    pilot.app().root().as_crud().unwrap().state()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_row_selected_opens_editor() {
    let table = Table::new("users.table", vec![ColumnSpec::new("id")])
        .with_rows(vec![payload([("id", 1)])]);
    let mut crud = Crud::new("users", &Props::new(), &EventBus::new()).with_table(table);
    assert_eq!(crud.state(), CrudState::List);

    let (cmd, resp) = crud.update(Message::action("RowSelected"));
    assert_eq!(resp, Response::Handled);
    assert_eq!(crud.state(), CrudState::Editing);
    assert_eq!(
        emitted(&cmd),
        vec![("DataLoaded".into(), payload([("transition", "StateList_to_StateEditing")]))]
    );
}

#[test]
fn scenario_b_cancel_while_creating() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let _ = crud.update(Message::action("NewItemRequested"));
    assert_eq!(crud.state(), CrudState::Creating);

    let (cmd, _) = crud.update(Message::action("FormCancel"));
    assert_eq!(crud.state(), CrudState::List);
    assert_eq!(
        emitted(&cmd),
        vec![(
            "FormCancel".into(),
            payload([("transition", "StateEditing_Creating_to_StateList")])
        )]
    );
}

#[test]
fn scenario_c_ctrl_d_marks_deleting() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let _ = crud.update(Message::action_with(
        "DATA_LOAD_COMPLETED",
        payload([("result", json!([{"id": 1, "name": "Ada"}]))]),
    ));
    assert!(crud.table().unwrap().selected_row().is_some());

    let (cmd, resp) = crud.update(Message::key(KeyEvent::ctrl('d')));
    assert_eq!(resp, Response::Handled);
    assert_eq!(crud.state(), CrudState::List);
    assert_eq!(
        emitted(&cmd),
        vec![("ItemDeleted".into(), payload([("state", "deleting")]))]
    );
    assert_eq!(cmd.pending_operations(), 0);
}

#[test]
fn scenario_d_load_needs_a_descriptor() {
    let with_api = Crud::new(
        "users",
        &props(json!({"data_api": {"load": {"endpoint": "/users"}}})),
        &EventBus::new(),
    );
    assert_eq!(with_api.load_data().pending_operations(), 1);

    let without = Crud::new("users", &Props::new(), &EventBus::new());
    assert!(without.load_data().is_none());
}

#[test]
fn scenario_e_unbound_keys_reach_the_child() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let _ = crud.update(Message::action("NewItemRequested"));

    let (cmd, resp) = crud.update(Message::key(Key::Char('Z')));
    assert!(cmd.is_none());
    assert_eq!(resp, Response::Handled);
    assert_eq!(crud.form().unwrap().value("name"), Some("Z"));
    assert_eq!(crud.state(), CrudState::Creating);
}

// ---------------------------------------------------------------------------
// Event bus and bindings
// ---------------------------------------------------------------------------

#[test]
fn targeted_elsewhere_changes_nothing() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let (cmd, resp) = crud.update(Message::targeted("orders", Message::action("NewItemRequested")));
    assert!(cmd.is_none());
    assert_eq!(resp, Response::Ignored);
    assert_eq!(crud.state(), CrudState::List);

    let (_, resp) = crud.update(Message::targeted("users", Message::action("NewItemRequested")));
    assert_eq!(resp, Response::Handled);
    assert_eq!(crud.state(), CrudState::Creating);
}

#[test]
fn cleanup_silences_handlers() {
    let bus = EventBus::new();
    let mut crud = Crud::new("users", &props(users_config()), &bus);
    let log = record(&mut crud, &["NewItemRequested"]);

    let (cmd, _) = crud.update(Message::action("NewItemRequested"));
    crud.cleanup();
    if let Cmd::Publish(publication) = cmd {
        assert_eq!(publication.deliver(), 0);
    } else {
        panic!("expected a single publication");
    }
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn earlier_binding_wins() {
    let mut bindings = Bindings::crud_defaults();
    bindings.prepend(Binding::new(Key::Enter, "NewItemRequested", "new"));
    let config = json!({
        "table_props": {"columns": ["id"], "rows": [{"id": 1}]},
        "form_fields": [{"name": "id"}],
        "bindings": bindings
            .iter()
            .map(|b| json!({"key": b.key.to_string(), "event": b.event, "description": b.description}))
            .collect::<Vec<_>>(),
    });
    let mut crud = Crud::new("users", &props(config), &EventBus::new());

    let _ = crud.update(Message::key(Key::Enter));
    assert_eq!(crud.state(), CrudState::Creating);
}

#[test]
fn rejected_config_keeps_editor() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let _ = crud.update(Message::action("NewItemRequested"));
    assert!(crud.apply_config(&json!(["not", "a", "mapping"])).is_err());
    assert_eq!(crud.state(), CrudState::Creating);
    assert!(crud.table().is_some());

    crud.apply_config(&json!({"title": "Orders"})).unwrap();
    assert_eq!(crud.state(), CrudState::List);
    assert!(crud.table().is_none());
    assert!(crud.form().is_none());
}

// ---------------------------------------------------------------------------
// Through the Pilot
// ---------------------------------------------------------------------------

#[test]
fn pilot_edit_and_save_round_trip() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let log = record(
        &mut crud,
        &["DataLoaded", "RowSelected", "FormSubmit", "FormSubmitSuccess"],
    );
    let submitted = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&submitted);
    crud.on("FormSubmit", move |e| *seen.lock().unwrap() = Some(e.payload.clone()));

    let mut pilot = Pilot::new(crud).unwrap();
    pilot.process();
    assert_eq!(pilot.view(), "Users\n  id | name\n> 1  | Ada\n  2  | Grace");

    pilot.press_key(Key::Enter);
    pilot.process();
    assert_eq!(crud_state(&pilot), CrudState::Editing);

    pilot.type_text(" L");
    pilot.press_key_with(Key::Char('s'), Modifiers::CTRL);
    pilot.process();

    assert_eq!(crud_state(&pilot), CrudState::List);
    assert_eq!(
        *submitted.lock().unwrap(),
        Some(payload([("name", "Ada L")]))
    );
    assert_eq!(
        *log.lock().unwrap(),
        [
            "DataLoaded",
            "RowSelected",
            "DataLoaded",
            "FormSubmit",
            "FormSubmitSuccess",
            "DataLoaded",
        ]
    );
    assert!(pilot.is_running());
}

#[test]
fn pilot_create_blocked_until_required_field_filled() {
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let log = record(&mut crud, &["FormSubmit"]);
    let mut pilot = Pilot::new(crud).unwrap();
    pilot.process();

    pilot.press_key_with(Key::Char('n'), Modifiers::CTRL);
    pilot.press_key_with(Key::Char('s'), Modifiers::CTRL);
    pilot.process();
    assert_eq!(crud_state(&pilot), CrudState::Creating);
    assert!(log.lock().unwrap().is_empty());

    pilot.type_text("Linus");
    pilot.press_key_with(Key::Char('s'), Modifiers::CTRL);
    pilot.process();
    assert_eq!(crud_state(&pilot), CrudState::List);
    assert_eq!(*log.lock().unwrap(), ["FormSubmit"]);
}

#[test]
fn pilot_failed_delete_reports_error() {
    let failing = |op: DataOp, api: &ApiDescriptor, data: Option<Value>| -> Result<Value, DataError> {
        match op {
            DataOp::Load => Ok(json!([{"id": 1, "name": "Ada"}])),
            _ => Err(DataError::Rejected {
                operation: op.as_str(),
                endpoint: api.endpoint.clone(),
                reason: format!("refused {}", data.unwrap_or_default()),
            }),
        }
    };
    let mut crud = Crud::new("users", &props(users_config()), &EventBus::new())
        .with_backend(Arc::new(failing));
    let results = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&results);
    crud.on("ItemDeleted", move |e| seen.lock().unwrap().push(e.payload.clone()));

    let mut pilot = Pilot::new(crud).unwrap();
    pilot.process();

    // Ctrl+D only announces the intent.
    pilot.press_key_with(Key::Char('d'), Modifiers::CTRL);
    pilot.process();
    assert_eq!(results.lock().unwrap().len(), 1);

    pilot.send(Message::action("DeleteRequested"));
    pilot.process();
    assert_eq!(crud_state(&pilot), CrudState::Deleting);
    assert!(pilot.view().contains("delete selected row?"));

    pilot.press_key(Key::Enter);
    pilot.process();

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], payload([("state", "deleting")]));
    assert_eq!(results[1]["failed"], true);
    assert_eq!(
        results[1]["result"]["error"],
        r#"delete via `/users/{id}` failed: refused {"id":1,"name":"Ada"}"#
    );
    assert_eq!(crud_state(&pilot), CrudState::List);
}

#[test]
fn pilot_filter_by_typing() {
    let crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let mut pilot = Pilot::new(crud).unwrap();
    pilot.process();

    pilot.send(Message::action("FilterRequested"));
    pilot.type_text("gra");
    pilot.process();
    assert_eq!(pilot.view(), "Users\nfilter: gra\n  id | name\n> 2  | Grace");

    pilot.press_key(Key::Enter);
    pilot.process();
    assert_eq!(crud_state(&pilot), CrudState::List);
    assert_eq!(pilot.view(), "Users\n  id | name\n> 2  | Grace");
}

#[test]
fn pilot_quits_on_ctrl_c() {
    let crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let mut pilot = Pilot::new(Widget::from(crud)).unwrap();
    pilot.press_key_with(Key::Char('c'), Modifiers::CTRL);
    assert!(!pilot.is_running());
    assert_eq!(pilot.process(), 0);
}

#[test]
fn timer_expires_through_the_app() {
    let bus = EventBus::new();
    let expired = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&expired);
    let _sub = bus.subscribe("TimerExpired", move |e| seen.lock().unwrap().push(e.payload.clone()));

    let timer = Timer::new("countdown", Duration::from_millis(30))
        .with_interval(Duration::from_millis(10))
        .with_bus(bus);
    let mut pilot = Pilot::new(timer).unwrap();
    assert_eq!(pilot.view(), "00:01");

    pilot.press_key(Key::Char(' '));
    pilot.process();
    assert_eq!(pilot.view(), "00:00");
    assert_eq!(*expired.lock().unwrap(), vec![payload([("duration_ms", 30)])]);
}

#[test]
fn help_lists_editor_bindings() {
    let crud = Crud::new("users", &props(users_config()), &EventBus::new());
    let help = Help::new("help", crud.config().bindings.clone());
    let footer = Footer::from_bindings("footer", &crud.config().bindings);
    assert_eq!(help.view(), footer.content());
}
