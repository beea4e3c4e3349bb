//! FIFO queue of messages waiting for the root component.

use std::collections::VecDeque;

use super::message::Message;

/// Messages in delivery order.
#[derive(Debug, Default)]
pub struct MessageQueue {
    queue: VecDeque<Message>,
}

impl MessageQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message behind everything already waiting.
    pub fn push(&mut self, msg: Message) {
        self.queue.push_back(msg);
    }

    /// Take the oldest message.
    pub fn pop(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    /// Drain all pending messages in order.
    pub fn drain(&mut self) -> Vec<Message> {
        self.queue.drain(..).collect()
    }

    /// Number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
