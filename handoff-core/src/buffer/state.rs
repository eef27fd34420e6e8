//! Shared state of one queue run
//!
//! [`BufferState`] is the plain data half of the queue: the FIFO of items,
//! the bound, the end-of-production and abort flags, and the accounting
//! counters. It has no notion of waiting. Runtime adapters wrap it in a mutex
//! next to a notifier and only ever touch it with the lock held.

use std::collections::VecDeque;

use super::{QueueCfg, QueueStats};

/// Result of an attempt to take an item out of the buffer
#[derive(Debug, PartialEq, Eq)]
pub enum Popped<T> {
    /// The head of the buffer
    Item(T),
    /// Nothing buffered yet, production still running
    Empty,
    /// Nothing buffered and the producer has signalled end of stream
    Drained,
    /// The run was stopped after a failure
    Aborted,
}

/// Result of an attempt to append an item to the buffer
#[derive(Debug, PartialEq, Eq)]
pub enum Pushed<T> {
    /// The item is now at the tail
    Accepted,
    /// The buffer is at capacity; the item is handed back
    Full(T),
    /// The run was stopped after a failure; the item is dropped
    Aborted,
}

/// Bounded FIFO with end-of-stream and abort flags
#[derive(Debug)]
pub struct BufferState<T> {
    items: VecDeque<T>,
    capacity: usize,
    ended: bool,
    aborted: bool,
    pushed: u64,
    popped: u64,
    consumed: u64,
    high_water_mark: usize,
}

impl<T> BufferState<T> {
    /// Creates an empty buffer bounded by `cfg.capacity`
    ///
    /// Call `cfg.validate()` first; a zero capacity never accepts an item.
    pub fn new(cfg: &QueueCfg) -> Self {
        Self {
            items: VecDeque::with_capacity(cfg.capacity),
            capacity: cfg.capacity,
            ended: false,
            aborted: false,
            pushed: 0,
            popped: 0,
            consumed: 0,
            high_water_mark: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// The producer has signalled end of stream
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Production ended and nothing is left to pop
    pub fn is_drained(&self) -> bool {
        self.ended && self.items.is_empty()
    }

    /// Appends `item` unless the buffer is full or aborted
    pub fn push(&mut self, item: T) -> Pushed<T> {
        if self.aborted {
            return Pushed::Aborted;
        }
        if self.is_full() {
            return Pushed::Full(item);
        }
        self.items.push_back(item);
        self.pushed += 1;
        self.high_water_mark = self.high_water_mark.max(self.items.len());
        Pushed::Accepted
    }

    /// Removes the head of the buffer
    ///
    /// Items still buffered after end of stream are returned before
    /// `Drained`. Nothing is returned once the run is aborted.
    pub fn pop(&mut self) -> Popped<T> {
        if self.aborted {
            return Popped::Aborted;
        }
        match self.items.pop_front() {
            Some(item) => {
                self.popped += 1;
                Popped::Item(item)
            }
            None if self.ended => Popped::Drained,
            None => Popped::Empty,
        }
    }

    /// Sets the end-of-production flag. Setting it twice has no further effect.
    pub fn mark_end_of_production(&mut self) {
        self.ended = true;
    }

    /// Stops the run; every later push or pop reports `Aborted`
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    /// Records that the consumer finished handling one popped item
    pub fn record_consumed(&mut self) {
        debug_assert!(self.consumed < self.popped, "consumed more than popped");
        self.consumed += 1;
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            capacity: self.capacity,
            len: self.items.len(),
            pushed: self.pushed,
            popped: self.popped,
            consumed: self.consumed,
            high_water_mark: self.high_water_mark,
            ended: self.ended,
            aborted: self.aborted,
        }
    }
}
