//! Per-component publish/subscribe event bus.
//!
//! [`EventBus`] is a cheap cloneable handle; clones share one subscriber
//! registry. Publishing never calls handlers inline: [`EventBus::publish`]
//! returns a [`Cmd::Publish`] and the runtime delivers it after the current
//! update step. Handlers for one event name run in subscription order.
//!
//! Subscribers live in a slotmap so the key doubles as the unsubscribe
//! handle: removing a key twice is a harmless miss.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use slotmap::{new_key_type, SlotMap};

use super::message::Payload;
use crate::command::Cmd;
use crate::widget::ComponentId;

new_key_type! {
    /// Identifies one subscription inside a bus.
    pub struct SubscriberKey;
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A published event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub source: ComponentId,
    pub name: String,
    pub payload: Payload,
}

impl Event {
    /// Create a new event.
    pub fn new(source: impl Into<ComponentId>, name: impl Into<String>, payload: Payload) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            payload,
        }
    }

    /// Payload value under `key`, if it is a string.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

/// Subscriber callback.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

struct Subscriber {
    event: String,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    subscribers: SlotMap<SubscriberKey, Subscriber>,
    /// Subscription order; slotmap iteration order reuses freed slots.
    order: Vec<SubscriberKey>,
}

impl Registry {
    fn remove(&mut self, key: SubscriberKey) -> bool {
        if self.subscribers.remove(key).is_some() {
            self.order.retain(|k| *k != key);
            true
        } else {
            false
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Shared handle to a subscriber registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events named `event`.
    pub fn subscribe<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let event = event.into();
        let mut registry = lock(&self.registry);
        let key = registry.subscribers.insert(Subscriber {
            event: event.clone(),
            handler: Arc::new(handler),
        });
        registry.order.push(key);
        tracing::trace!(event = %event, "subscribed");
        Subscription {
            registry: Arc::downgrade(&self.registry),
            key,
        }
    }

    /// Build a command that will deliver an event when the runtime runs it.
    pub fn publish(
        &self,
        source: impl Into<ComponentId>,
        name: impl Into<String>,
        payload: Payload,
    ) -> Cmd {
        Cmd::Publish(Publication {
            bus: self.clone(),
            event: Event::new(source, name, payload),
        })
    }

    /// Call every handler subscribed to `event.name`, in subscription order.
    ///
    /// Returns how many handlers ran. The registry lock is released before
    /// any handler is invoked, so handlers may subscribe or unsubscribe.
    pub fn deliver(&self, event: &Event) -> usize {
        let handlers: Vec<Handler> = {
            let registry = lock(&self.registry);
            registry
                .order
                .iter()
                .filter_map(|key| registry.subscribers.get(*key))
                .filter(|sub| sub.event == event.name)
                .map(|sub| Arc::clone(&sub.handler))
                .collect()
        };
        for handler in &handlers {
            handler(event);
        }
        tracing::debug!(
            event = %event.name,
            source = %event.source,
            handlers = handlers.len(),
            "event delivered"
        );
        handlers.len()
    }

    /// Drop every subscription.
    pub fn cleanup(&self) {
        let mut registry = lock(&self.registry);
        registry.subscribers.clear();
        registry.order.clear();
    }

    /// Total number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }

    /// Whether anything is subscribed to `event`.
    pub fn has_subscribers(&self, event: &str) -> bool {
        lock(&self.registry)
            .subscribers
            .values()
            .any(|sub| sub.event == event)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping it does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
#[derive(Debug, Clone)]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    key: SubscriberKey,
}

impl Subscription {
    /// Remove the handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => lock(&registry).remove(self.key),
            None => false,
        }
    }

    /// The registry key of this subscription.
    pub fn key(&self) -> SubscriberKey {
        self.key
    }
}

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

/// A pending delivery: an event bound to the bus it will be delivered on.
pub struct Publication {
    bus: EventBus,
    event: Event,
}

impl Publication {
    /// The event to be delivered.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Deliver now. Returns how many handlers ran.
    pub fn deliver(self) -> usize {
        self.bus.deliver(&self.event)
    }

    /// Split into the event, discarding the bus binding.
    pub fn into_event(self) -> Event {
        self.event
    }
}

// ===========================================================================
// Tests
// ===========================================================================
