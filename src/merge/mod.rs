// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reduction of per-partition candidate lists into the global top-k.
//!
//! "Keep the k best" is associative and commutative, so neither the pairing
//! nor the order of rounds changes the result.

pub mod network;

pub use network::merge_pair;

use crate::config::MergeStrategy;
use crate::metrics::ScanMetrics;
use crate::scan::TopKHeap;
use crate::types::Candidate;
use rayon::prelude::*;

/// Merges best-first lists into one best-first list of at most `k` candidates.
pub fn merge_topk(
    lists: Vec<Vec<Candidate>>,
    k: usize,
    strategy: MergeStrategy,
    metrics: &ScanMetrics,
) -> Vec<Candidate> {
    metrics.record_merge(lists.iter().map(Vec::len).sum());
    match strategy {
        MergeStrategy::Tournament => tournament(lists, k),
        MergeStrategy::SharedHeap => shared_heap(lists, k),
    }
}

/// Pairwise rounds, pairs merged in parallel, until one list remains.
pub fn tournament(lists: Vec<Vec<Candidate>>, k: usize) -> Vec<Candidate> {
    let mut round: Vec<Vec<Candidate>> = lists.into_iter().filter(|l| !l.is_empty()).collect();
    if round.len() == 1 {
        let mut only = round.remove(0);
        only.truncate(k);
        return only;
    }
    while round.len() > 1 {
        round = round
            .par_chunks(2)
            .map(|pair| match pair {
                [a, b] => merge_pair(a, b, k),
                [a] => a.clone(),
                _ => Vec::new(),
            })
            .collect();
    }
    round.pop().unwrap_or_default()
}

/// One heap fed with every candidate.
pub fn shared_heap(lists: Vec<Vec<Candidate>>, k: usize) -> Vec<Candidate> {
    let mut heap = TopKHeap::new(k);
    for c in lists.into_iter().flatten() {
        heap.offer(c);
    }
    heap.into_sorted()
}
