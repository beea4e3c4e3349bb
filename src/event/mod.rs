//! Event system: input, messages, key bindings, the event bus.

pub mod binding;
pub mod bus;
pub mod input;
pub mod message;
pub mod names;
pub mod queue;

pub use binding::{Binding, Bindings};
pub use bus::{Event, EventBus, Publication, Subscription};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, ParseKeyError};
pub use message::{payload, Action, Message, Payload};
pub use queue::MessageQueue;
