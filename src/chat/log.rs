//! In-memory chat message log.
//!
//! Events live for the lifetime of the process only.

use std::collections::VecDeque;

use super::event::ChatEvent;

/// Append-only sequence of chat events in delivery order.
#[derive(Debug, Default)]
pub struct MessageLog {
    events: VecDeque<ChatEvent>,
    /// Maximum number of retained events (0 = unbounded).
    limit: usize,
}

impl MessageLog {
    /// Create an unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that retains at most `limit` events (0 = unbounded).
    ///
    /// When full, the oldest event is evicted on append.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit,
        }
    }

    /// Append an event to the tail.
    pub fn append(&mut self, event: ChatEvent) {
        if self.limit > 0 && self.events.len() >= self.limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Snapshot of all retained events in insertion order.
    pub fn all(&self) -> Vec<ChatEvent> {
        self.events.iter().cloned().collect()
    }

    /// Number of retained events.
    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Generator for chat event IDs.
///
/// IDs are wall-clock milliseconds, bumped past the previous ID when the
/// clock stalls or goes backwards, so they strictly increase.
#[derive(Debug, Default)]
pub struct EventIdGenerator {
    last: Option<i64>,
}

impl EventIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ID for an event created at `now_millis`.
    pub fn next_at(&mut self, now_millis: i64) -> i64 {
        let id = match self.last {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last = Some(id);
        id
    }
}
