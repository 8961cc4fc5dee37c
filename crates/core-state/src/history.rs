use std::collections::VecDeque;
use tracing::trace;

/// Default number of prior values retained.
pub const HISTORY_SIZE: usize = 20;

/// Chronological stack of prior canonical values, most recent last.
///
/// Eviction is FIFO: once `capacity` is exceeded the oldest entry goes. While
/// frozen, pushes are ignored so an undo's own value change is never recorded.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<String>,
    capacity: usize,
    frozen: bool,
    evicted: u64,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(HISTORY_SIZE)),
            capacity,
            frozen: false,
            evicted: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
    /// Entries dropped off the old end so far.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }

    /// Record a prior value. `None` means there was no prior value (first
    /// assignment) and is never recorded. Returns whether an entry was added.
    pub fn push(&mut self, prev: Option<&str>) -> bool {
        let Some(value) = prev else {
            trace!(target: "state.history", "push_skip_initial");
            return false;
        };
        if self.frozen {
            trace!(target: "state.history", depth = self.entries.len(), "push_skip_frozen");
            return false;
        }
        self.entries.push_back(value.to_owned());
        trace!(target: "state.history", depth = self.entries.len(), len = value.len(), "push");
        while self.entries.len() > self.capacity {
            let _ = self.entries.pop_front();
            self.evicted += 1;
            trace!(target: "state.history", evicted = self.evicted, "history_trimmed");
        }
        true
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<String> {
        let popped = self.entries.pop_back();
        trace!(target: "state.history", depth = self.entries.len(), hit = popped.is_some(), "pop");
        popped
    }

    /// Suspend recording; returns the previous freeze state for `restore_freeze`.
    pub fn freeze(&mut self) -> bool {
        std::mem::replace(&mut self.frozen, true)
    }

    pub fn restore_freeze(&mut self, prev: bool) {
        self.frozen = prev;
    }
}
