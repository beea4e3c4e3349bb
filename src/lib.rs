//! # weft-tui
//!
//! Composable terminal widgets driven by an Elm-style update loop.
//!
//! Every widget implements [`Component`](widget::Component): `update` takes a
//! [`Message`](event::Message) and returns a [`Cmd`](command::Cmd) for the
//! runtime to execute along with whether the message was handled. Widgets
//! never perform side effects inline; they describe them as commands.
//!
//! ## Core Systems
//!
//! - **[`event`]**: Input events, messages, key bindings, the event bus
//! - **[`command`]**: Deferred commands returned from `update`
//! - **[`widget`]**: Component trait, focus capability, the key dispatch template
//! - **[`widgets`]**: Header, Footer, Help, Timer, Table, Form, and the `Crud` record editor
//! - **[`config`]**: Lenient parsing of widget configuration from JSON values
//! - **[`app`]**: Headless runtime executing commands on a tokio runtime
//! - **[`testing`]**: `Pilot` for driving an app from tests
//! - **[`logging`]**: `tracing` subscriber setup

// Foundation
pub mod command;
pub mod config;
pub mod error;

// Events
pub mod event;

// Widget system
pub mod widget;
pub mod widgets;

// Application
pub mod app;
pub mod logging;
pub mod testing;
