//! Component contract, dispatch template and the widget enumeration.

pub mod dispatch;
pub mod kind;
pub mod traits;

pub use dispatch::{dispatch, Interactive, KeyOutcome, MAX_UNWRAP_DEPTH};
pub use kind::Widget;
pub use traits::{addressed_to, Component, ComponentId, Focusable, Response};
