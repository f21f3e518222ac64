//! Fixed-capacity sliding window
//!
//! Keeps the most recent N values in chronological order. Pushing into a
//! full window evicts the oldest value.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct SlidingWindow<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    /// A capacity of 0 is bumped to 1 so the window always holds the latest value.
    ///
    /// Storage grows on push; nothing is reserved up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, value: T) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl SlidingWindow<f32> {
    /// Arithmetic mean, `None` while empty
    pub fn mean(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f32>() / self.values.len() as f32)
    }
}
