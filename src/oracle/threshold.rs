// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Classic single-list Threshold Algorithm.
//!
//! One descending list per selected attribute, read in lockstep. Every newly
//! met tuple is scored with random access; after each depth the threshold is
//! the weighted sum of the values at that depth.

use crate::scan::TopKHeap;
use crate::types::{Candidate, Dataset, Query, TupleId};
use rustc_hash::FxHashSet;

#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdOutcome {
    pub candidates: Vec<Candidate>,
    /// Sorted-access depth reached (rows of the lists read).
    pub depth: usize,
    /// Distinct tuples scored.
    pub seen: usize,
}

/// Per-attribute sorted lists: ids descending by value, ties by ascending id.
pub fn sorted_lists(dataset: &Dataset, query: &Query) -> Vec<Vec<TupleId>> {
    query
        .attributes
        .iter()
        .map(|&attr| {
            let col = dataset.column(attr);
            let mut ids: Vec<TupleId> = (0..dataset.len() as u32).map(TupleId).collect();
            ids.sort_unstable_by(|a, b| col[b.index()].total_cmp(&col[a.index()]).then_with(|| a.cmp(b)));
            ids
        })
        .collect()
}

pub fn threshold_topk(dataset: &Dataset, query: &Query) -> ThresholdOutcome {
    let lists = sorted_lists(dataset, query);
    let mut heap = TopKHeap::new(query.k);
    let mut seen: FxHashSet<TupleId> = FxHashSet::default();
    let mut depth = 0;

    while depth < dataset.len() {
        for list in &lists {
            let id = list[depth];
            if seen.insert(id) {
                heap.offer(Candidate::new(id, query.score_with(|attr| dataset.value(id, attr))));
            }
        }
        let mut threshold = 0.0f32;
        for ((list, &attr), &w) in lists.iter().zip(&query.attributes).zip(&query.weights) {
            threshold += w * dataset.value(list[depth], attr);
        }
        depth += 1;
        if heap.can_stop(threshold) {
            break;
        }
    }

    ThresholdOutcome { candidates: heap.into_sorted(), depth, seen: seen.len() }
}
