// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bounded top-k container.

use crate::types::{sort_best_first, Candidate};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Keeps the `capacity` best candidates seen so far.
///
/// A min-heap on `Candidate` order: the root is the current worst kept
/// candidate, so an offer is one comparison against it when full.
#[derive(Clone, Debug)]
pub struct TopKHeap {
    capacity: usize,
    heap: BinaryHeap<Reverse<Candidate>>,
}

impl TopKHeap {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, heap: BinaryHeap::with_capacity(capacity + 1) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Worst kept candidate.
    pub fn min(&self) -> Option<Candidate> {
        self.heap.peek().map(|r| r.0)
    }

    /// Inserts if not full, else replaces the minimum when `candidate` ranks above it.
    /// Returns whether the candidate was kept.
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut root) if candidate > root.0 => {
                *root = Reverse(candidate);
                true
            }
            _ => false,
        }
    }

    /// True once the heap is full and its minimum score reaches `threshold`.
    pub fn can_stop(&self, threshold: f32) -> bool {
        self.is_full() && self.min().is_some_and(|m| m.score >= threshold)
    }

    /// Kept candidates, best-first.
    pub fn into_sorted(self) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self.heap.into_iter().map(|r| r.0).collect();
        sort_best_first(&mut out);
        out
    }
}
