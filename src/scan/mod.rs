// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-partition threshold scan.

pub mod heap;
pub mod kernel;

pub use heap::TopKHeap;
pub use kernel::{ScalarKernel, ScoreKernel, SimdKernel};

use crate::layout::PartitionView;
use crate::metrics::ScanMetrics;
use crate::types::{Candidate, Query};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub blocks_scanned: usize,
    pub tuples_scanned: usize,
    /// Stopped before the last block of the partition.
    pub terminated_early: bool,
}

/// Upper bound on the score of any tuple behind a bound vector.
#[inline]
pub fn block_threshold(query: &Query, bound: &[f32]) -> f32 {
    query.score_with(|attr| bound[attr])
}

/// Scans `partition` block by block into `heap`.
///
/// After each block, stops once the heap is full and its minimum reaches the
/// weighted bound of the tuples that follow. `heap` may already hold
/// candidates from other partitions; the stop rule stays sound because its
/// minimum only grows.
pub fn scan_partition(
    partition: &PartitionView<'_>,
    query: &Query,
    heap: &mut TopKHeap,
    kernel: &dyn ScoreKernel,
    metrics: &ScanMetrics,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    if partition.is_empty() {
        return outcome;
    }

    let mut scores: Vec<f32> = Vec::new();
    let block_count = partition.block_count();
    for (b, block) in partition.blocks().enumerate() {
        scores.clear();
        scores.resize(block.stride(), 0.0);
        kernel.score_block(&block, query, &mut scores);

        let mut inserts = 0;
        for (&id, &score) in block.ids().iter().zip(&scores[..block.len()]) {
            if heap.offer(Candidate::new(id, score)) {
                inserts += 1;
            }
        }
        metrics.record_block(block.len(), inserts);
        outcome.blocks_scanned += 1;
        outcome.tuples_scanned += block.len();

        if heap.can_stop(block_threshold(query, block.bound())) {
            outcome.terminated_early = b + 1 < block_count;
            break;
        }
    }

    metrics.record_partition(outcome.terminated_early);
    outcome
}
