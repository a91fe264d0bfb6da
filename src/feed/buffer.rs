use std::collections::VecDeque;

use crate::model::tick::Tick;

/// Sliding window length kept for charts and the recent-ticks table.
pub const WINDOW_TICKS: usize = 180;

/// Bounded history of the most recent ticks, insertion-ordered (newest last).
/// At capacity the oldest tick is evicted before the new one is appended.
/// Consumers wanting display order reverse their own copy.
#[derive(Debug)]
pub struct TickBuffer {
    ticks: VecDeque<Tick>,
    capacity: usize,
}

impl TickBuffer {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, tick: Tick) {
        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
    }

    /// Most recently appended tick, if any.
    pub fn latest(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    /// Full window in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Tick> {
        self.ticks.iter()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TickBuffer {
    fn default() -> Self {
        Self::new(WINDOW_TICKS)
    }
}
