use std::collections::VecDeque;

/// An event stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub frame_index: u64,
    pub event: E,
}

/// Append-only trace of component events.
///
/// Components record what happened (selection fired, transition started,
/// drag ended, ...) and the host drains the log once per frame, typically to
/// forward it to `tracing`.
#[derive(Debug)]
pub struct EventBus<E> {
    events: VecDeque<Stamped<E>>,
    capacity: usize,
    dropped: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that keeps at most `capacity` undrained events; the oldest are
    /// discarded first.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn emit(&mut self, frame_index: u64, event: E) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Stamped { frame_index, event });
    }

    /// Undrained events, oldest first.
    pub fn events(&self) -> &VecDeque<Stamped<E>> {
        &self.events
    }

    /// Number of events discarded because nobody drained the bus in time.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events).into()
    }
}
