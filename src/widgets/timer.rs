//! Countdown timer.
//!
//! A running timer asks the runtime for a [`Cmd::Tick`] that delivers a
//! `TimerTick` action addressed to the timer itself. Each tick carries the
//! generation it was scheduled in; stopping or resetting bumps the
//! generation, so ticks already in flight are ignored when they arrive.

use std::time::Duration;

use serde_json::Value;

use crate::command::Cmd;
use crate::event::bus::EventBus;
use crate::event::input::Key;
use crate::event::message::{payload, Message};
use crate::event::names;
use crate::widget::dispatch::unwrap_targeted;
use crate::widget::traits::{Component, ComponentId, Response};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// A countdown timer.
#[derive(Debug, Clone)]
pub struct Timer {
    id: ComponentId,
    duration: Duration,
    remaining: Duration,
    interval: Duration,
    running: bool,
    generation: u64,
    bus: Option<EventBus>,
}

impl Timer {
    /// Create a stopped timer counting down from `duration`.
    pub fn new(id: impl Into<ComponentId>, duration: Duration) -> Self {
        Self {
            id: id.into(),
            duration,
            remaining: duration,
            interval: DEFAULT_INTERVAL,
            running: false,
            generation: 0,
            bus: None,
        }
    }

    /// Set the tick interval (builder pattern). Zero is treated as one second.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };
        self
    }

    /// Publish `TimerExpired` on `bus` (builder pattern).
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Time left.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Whether the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start counting down. Does nothing if running or already at zero.
    pub fn start(&mut self) -> Cmd {
        if self.running || self.remaining.is_zero() {
            return Cmd::None;
        }
        self.running = true;
        self.generation += 1;
        tracing::debug!(timer = %self.id, remaining = ?self.remaining, "timer started");
        self.schedule()
    }

    /// Pause, keeping the remaining time.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    /// Start if stopped, stop if running.
    pub fn toggle(&mut self) -> Cmd {
        if self.running {
            self.stop();
            Cmd::None
        } else {
            self.start()
        }
    }

    /// Stop and restore the full duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.generation += 1;
        self.remaining = self.duration;
    }

    fn schedule(&self) -> Cmd {
        Cmd::Tick {
            after: self.interval,
            message: Message::targeted(
                &self.id,
                Message::action_with(
                    names::TIMER_TICK,
                    payload([("generation", self.generation)]),
                ),
            ),
        }
    }

    fn on_tick(&mut self, generation: Option<u64>) -> (Cmd, Response) {
        if !self.running || generation != Some(self.generation) {
            tracing::trace!(timer = %self.id, "stale tick");
            return (Cmd::None, Response::Ignored);
        }
        self.remaining = self.remaining.saturating_sub(self.interval);
        if !self.remaining.is_zero() {
            return (self.schedule(), Response::Handled);
        }

        self.running = false;
        tracing::debug!(timer = %self.id, "timer expired");
        let cmd = match &self.bus {
            Some(bus) => bus.publish(
                &self.id,
                names::TIMER_EXPIRED,
                payload([("duration_ms", duration_ms(self.duration))]),
            ),
            None => Cmd::None,
        };
        (cmd, Response::Handled)
    }
}

fn duration_ms(d: Duration) -> Value {
    Value::from(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl Component for Timer {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    /// `MM:SS`, rounding partial seconds up.
    fn view(&self) -> String {
        let millis = self.remaining.as_millis();
        let secs = millis.div_ceil(1000);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    fn update(&mut self, msg: Message) -> (Cmd, Response) {
        let Ok(Some(msg)) = unwrap_targeted(&self.id, msg) else {
            return (Cmd::None, Response::Ignored);
        };
        if let Some(action) = msg.as_action() {
            if action.name == names::TIMER_TICK {
                let generation = action.payload.get("generation").and_then(Value::as_u64);
                return self.on_tick(generation);
            }
            return (Cmd::None, Response::Ignored);
        }
        match msg.as_key().map(|k| k.code) {
            Some(Key::Char(' ')) => (self.toggle(), Response::Handled),
            Some(Key::Char('r')) => {
                self.reset();
                (Cmd::None, Response::Handled)
            }
            _ => (Cmd::None, Response::Ignored),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
