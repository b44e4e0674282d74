// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Full scan reference.

use crate::scan::TopKHeap;
use crate::types::{Candidate, Dataset, Query, TupleId};

/// Scores every tuple and keeps the best `query.k`, best-first.
pub fn brute_force_topk(dataset: &Dataset, query: &Query) -> Vec<Candidate> {
    let mut heap = TopKHeap::new(query.k);
    for i in 0..dataset.len() {
        let id = TupleId(i as u32);
        let score = query.score_with(|attr| dataset.value(id, attr));
        heap.offer(Candidate::new(id, score));
    }
    heap.into_sorted()
}

/// Scores of every tuple, indexed by tuple id.
pub fn score_all(dataset: &Dataset, query: &Query) -> Vec<f32> {
    (0..dataset.len())
        .map(|i| query.score_with(|attr| dataset.value(TupleId(i as u32), attr)))
        .collect()
}
