// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Execution strategies sharing one scan + merge contract.

use crate::config::{EngineConfig, ExecutionKind, MergeStrategy};
use crate::error::{Result, TopkError};
use crate::layout::BlockArena;
use crate::merge::merge_topk;
use crate::metrics::ScanMetrics;
use crate::scan::{scan_partition, ScalarKernel, ScoreKernel, SimdKernel, TopKHeap};
use crate::types::{Candidate, PartitionId, Query};
use rayon::prelude::*;

pub trait Execution {
    fn kind(&self) -> ExecutionKind;

    /// Best-first top-`query.k` over every partition of `arena`.
    /// The query must already be validated against the arena's dimensions.
    fn execute(&self, arena: &BlockArena, query: &Query, metrics: &ScanMetrics) -> Vec<Candidate>;
}

/// Builds the execution for `kind` using the worker count and merge strategy of `config`.
pub fn execution_for(kind: ExecutionKind, config: &EngineConfig) -> Result<Box<dyn Execution + Send + Sync>> {
    Ok(match kind {
        ExecutionKind::Scalar => Box::new(ScalarExecution::new(config.merge)),
        ExecutionKind::Simd => Box::new(SimdExecution::new(config.merge)),
        ExecutionKind::Threaded => Box::new(ThreadedExecution::new(config.effective_threads(), config.merge)?),
    })
}

/// One heap per partition, partitions in order, then merge.
fn per_partition(
    arena: &BlockArena,
    query: &Query,
    kernel: &dyn ScoreKernel,
    merge: MergeStrategy,
    metrics: &ScanMetrics,
) -> Vec<Candidate> {
    let lists: Vec<Vec<Candidate>> = arena
        .partitions()
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut heap = TopKHeap::new(query.k);
            scan_partition(&p, query, &mut heap, kernel, metrics);
            heap.into_sorted()
        })
        .collect();
    merge_topk(lists, query.k, merge, metrics)
}

#[derive(Clone, Copy, Debug)]
pub struct ScalarExecution {
    merge: MergeStrategy,
}

impl ScalarExecution {
    pub fn new(merge: MergeStrategy) -> Self {
        Self { merge }
    }
}

impl Execution for ScalarExecution {
    fn kind(&self) -> ExecutionKind {
        ExecutionKind::Scalar
    }

    fn execute(&self, arena: &BlockArena, query: &Query, metrics: &ScanMetrics) -> Vec<Candidate> {
        per_partition(arena, query, &ScalarKernel, self.merge, metrics)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SimdExecution {
    merge: MergeStrategy,
}

impl SimdExecution {
    pub fn new(merge: MergeStrategy) -> Self {
        Self { merge }
    }
}

impl Execution for SimdExecution {
    fn kind(&self) -> ExecutionKind {
        ExecutionKind::Simd
    }

    fn execute(&self, arena: &BlockArena, query: &Query, metrics: &ScanMetrics) -> Vec<Candidate> {
        per_partition(arena, query, &SimdKernel, self.merge, metrics)
    }
}

/// Partitions dealt round-robin to `threads` workers on a dedicated pool.
///
/// Each worker keeps one heap across all of its partitions; the join of the
/// parallel map is the barrier before the final merge of the worker lists.
pub struct ThreadedExecution {
    threads: usize,
    merge: MergeStrategy,
    pool: rayon::ThreadPool,
}

impl ThreadedExecution {
    pub fn new(threads: usize, merge: MergeStrategy) -> Result<Self> {
        let threads = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pta-worker-{}", i))
            .build()
            .map_err(|e| TopkError::InvalidConfig(format!("failed to start {} workers: {}", threads, e)))?;
        Ok(Self { threads, merge, pool })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl Execution for ThreadedExecution {
    fn kind(&self) -> ExecutionKind {
        ExecutionKind::Threaded
    }

    fn execute(&self, arena: &BlockArena, query: &Query, metrics: &ScanMetrics) -> Vec<Candidate> {
        let partitions = arena.partition_count();
        let lists: Vec<Vec<Candidate>> = self.pool.install(|| {
            (0..self.threads)
                .into_par_iter()
                .map(|worker| {
                    let mut heap = TopKHeap::new(query.k);
                    for p in (worker..partitions).step_by(self.threads) {
                        let partition = arena.partition(PartitionId(p as u32));
                        if !partition.is_empty() {
                            scan_partition(&partition, query, &mut heap, &SimdKernel, metrics);
                        }
                    }
                    heap.into_sorted()
                })
                .collect()
        });
        merge_topk(lists, query.k, self.merge, metrics)
    }
}
