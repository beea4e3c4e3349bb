//! Headless testing harness.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a terminal
//! and assert on the text its root widget renders.

pub mod pilot;

pub use pilot::Pilot;
