//! Record-editor states and the transition table.
//!
//! [`next`] is a pure lookup: given the current state and an incoming event
//! name it returns where to go and which event to emit, or `None` when the
//! event does not apply in that state.

use std::fmt;

use crate::event::names;

/// Which child a state routes messages and focus to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveChild {
    Table,
    Form,
}

/// State of a record editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrudState {
    #[default]
    List,
    Editing,
    Creating,
    Deleting,
    Filtering,
}

impl CrudState {
    /// The child that is active in this state.
    pub fn active_child(self) -> ActiveChild {
        match self {
            CrudState::List | CrudState::Filtering | CrudState::Deleting => ActiveChild::Table,
            CrudState::Editing | CrudState::Creating => ActiveChild::Form,
        }
    }

    /// Whether the form is open.
    pub fn is_editing(self) -> bool {
        matches!(self, CrudState::Editing | CrudState::Creating)
    }
}

impl fmt::Display for CrudState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrudState::List => "list",
            CrudState::Editing => "editing",
            CrudState::Creating => "creating",
            CrudState::Deleting => "deleting",
            CrudState::Filtering => "filtering",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

pub const LIST_TO_EDITING: &str = "StateList_to_StateEditing";
pub const LIST_TO_CREATING: &str = "StateList_to_StateCreating";
/// Shared label for leaving either form state.
pub const EDITING_CREATING_TO_LIST: &str = "StateEditing_Creating_to_StateList";
pub const LIST_TO_FILTERING: &str = "StateList_to_StateFiltering";
pub const FILTERING_TO_LIST: &str = "StateFiltering_to_StateList";
pub const LIST_TO_DELETING: &str = "StateList_to_StateDeleting";
pub const DELETING_TO_LIST: &str = "StateDeleting_to_StateList";

/// One payload entry stamped on the emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// `{"transition": <label>}`
    Transition(&'static str),
    /// `{"state": <value>}`
    State(&'static str),
}

impl Stamp {
    /// The `(key, value)` pair to put in the payload.
    pub fn entry(self) -> (&'static str, &'static str) {
        match self {
            Stamp::Transition(label) => ("transition", label),
            Stamp::State(value) => ("state", value),
        }
    }
}

/// Result of a successful table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: CrudState,
    pub emit: &'static str,
    pub stamp: Stamp,
}

/// Look up `(state, event)` in the transition table.
pub fn next(state: CrudState, event: &str) -> Option<Transition> {
    use CrudState::*;

    let (to, emit, stamp) = match (state, event) {
        (List, names::ROW_SELECTED) => (Editing, names::DATA_LOADED, Stamp::Transition(LIST_TO_EDITING)),
        (List, names::NEW_ITEM_REQUESTED) => (
            Creating,
            names::NEW_ITEM_REQUESTED,
            Stamp::Transition(LIST_TO_CREATING),
        ),
        (List, names::ITEM_DELETED) => (List, names::ITEM_DELETED, Stamp::State("deleted")),
        (Editing | Creating, names::FORM_SUBMIT_SUCCESS) => (
            List,
            names::FORM_SUBMIT_SUCCESS,
            Stamp::Transition(EDITING_CREATING_TO_LIST),
        ),
        (Editing | Creating, names::FORM_CANCEL) => (
            List,
            names::FORM_CANCEL,
            Stamp::Transition(EDITING_CREATING_TO_LIST),
        ),
        (List, names::FILTER_REQUESTED) => (Filtering, names::FILTER_REQUESTED, Stamp::Transition(LIST_TO_FILTERING)),
        (Filtering, names::FILTER_APPLIED) => (List, names::FILTER_APPLIED, Stamp::Transition(FILTERING_TO_LIST)),
        (Filtering, names::FORM_CANCEL) => (List, names::FORM_CANCEL, Stamp::Transition(FILTERING_TO_LIST)),
        (List, names::DELETE_REQUESTED) => (Deleting, names::DELETE_REQUESTED, Stamp::Transition(LIST_TO_DELETING)),
        (Deleting, names::DELETE_CONFIRMED) => (List, names::DELETE_CONFIRMED, Stamp::Transition(DELETING_TO_LIST)),
        (Deleting, names::FORM_CANCEL) => (List, names::FORM_CANCEL, Stamp::Transition(DELETING_TO_LIST)),
        _ => return None,
    };
    Some(Transition { to, emit, stamp })
}

/// Whether `event` appears anywhere in the transition table.
pub fn is_transition_event(event: &str) -> bool {
    [
        CrudState::List,
        CrudState::Editing,
        CrudState::Creating,
        CrudState::Deleting,
        CrudState::Filtering,
    ]
    .into_iter()
    .any(|state| next(state, event).is_some())
}

// ===========================================================================
// Tests
// ===========================================================================
