//! Min-priority queue of pixel indices keyed by grey level.
//!
//! Pixels with equal level pop in insertion order, which makes flooding and
//! reconstruction deterministic on plateaus.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
struct Entry {
    level: f32,
    age: u64,
    index: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap, we want lowest level, then oldest.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .level
            .total_cmp(&self.level)
            .then_with(|| other.age.cmp(&self.age))
    }
}

#[derive(Debug, Default)]
pub(crate) struct LevelQueue {
    heap: BinaryHeap<Entry>,
    next_age: u64,
}

impl LevelQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_age: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, level: f32, index: usize) {
        let age = self.next_age;
        self.next_age += 1;
        self.heap.push(Entry { level, age, index });
    }

    /// Pop the lowest-level pixel as `(level, index)`.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<(f32, usize)> {
        self.heap.pop().map(|e| (e.level, e.index))
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
