//! Event names shared between widgets and the layouts that listen to them.

pub const ROW_SELECTED: &str = "RowSelected";
pub const NEW_ITEM_REQUESTED: &str = "NewItemRequested";
pub const ITEM_DELETED: &str = "ItemDeleted";
pub const FORM_SUBMIT: &str = "FormSubmit";
pub const FORM_SUBMIT_SUCCESS: &str = "FormSubmitSuccess";
pub const FORM_CANCEL: &str = "FormCancel";
pub const DATA_LOADED: &str = "DataLoaded";
pub const FOCUS_CHANGED: &str = "FocusChanged";

pub const FILTER_REQUESTED: &str = "FilterRequested";
pub const FILTER_APPLIED: &str = "FilterApplied";
pub const DELETE_REQUESTED: &str = "DeleteRequested";
pub const DELETE_CONFIRMED: &str = "DeleteConfirmed";

pub const TIMER_TICK: &str = "TimerTick";
pub const TIMER_EXPIRED: &str = "TimerExpired";

pub const QUIT: &str = "Quit";

pub const DATA_LOAD_COMPLETED: &str = "DATA_LOAD_COMPLETED";
pub const DATA_SAVE_COMPLETED: &str = "DATA_SAVE_COMPLETED";
pub const DATA_DELETE_COMPLETED: &str = "DATA_DELETE_COMPLETED";
