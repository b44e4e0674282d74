// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::types::id::TupleId;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// A scored tuple.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Candidate {
    // Order: score ascending, then ID descending, so the "largest" candidate
    // has the highest score and, among equal scores, the smallest id.
    pub id: TupleId,
    pub score: f32,
}

impl Candidate {
    /// Ranks below every candidate with a real score. Used to pad merge networks.
    pub const SENTINEL: Candidate = Candidate { id: TupleId(u32::MAX), score: f32::NEG_INFINITY };

    pub fn new(id: TupleId, score: f32) -> Self {
        Self { id, score }
    }

    pub fn is_sentinel(&self) -> bool {
        self.score == f32::NEG_INFINITY
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Sorts best-first: score descending, ties by ascending id.
pub fn sort_best_first(candidates: &mut [Candidate]) {
    candidates.sort_unstable_by(|a, b| b.cmp(a));
}

/// Final answer of a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopKResult {
    /// Best-first, length min(k, n).
    pub candidates: Vec<Candidate>,
    /// Score of the k-th (last) candidate.
    pub threshold: f32,
}

impl TopKResult {
    /// Wraps an already best-first list.
    pub fn from_sorted(candidates: Vec<Candidate>) -> Self {
        let threshold = candidates.last().map(|c| c.score).unwrap_or(f32::NEG_INFINITY);
        Self { candidates, threshold }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn ids(&self) -> Vec<TupleId> {
        self.candidates.iter().map(|c| c.id).collect()
    }

    pub fn scores(&self) -> Vec<f32> {
        self.candidates.iter().map(|c| c.score).collect()
    }
}
