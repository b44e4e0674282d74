// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Build-once, query-many top-k engine.

use crate::config::{EngineConfig, ExecutionKind};
use crate::error::Result;
use crate::exec::{execution_for, Execution};
use crate::layout::{BlockArena, BlockBuilder, LayoutStats};
use crate::metrics::ScanMetrics;
use crate::oracle::brute_force_topk;
use crate::partition::partitioner_for;
use crate::types::{Dataset, Query, TopKResult};
use crate::verify::cross_validate;
use std::time::Instant;

/// A dataset laid out for partitioned threshold scans.
///
/// The layout is read-only after `build`, so any number of threads may call
/// `query` concurrently. `rebuild` needs exclusive access.
pub struct TopkEngine {
    config: EngineConfig,
    dataset: Dataset,
    arena: BlockArena,
    executions: Vec<Box<dyn Execution + Send + Sync>>,
}

impl std::fmt::Debug for TopkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopkEngine")
            .field("config", &self.config)
            .field("tuples", &self.dataset.len())
            .field("dims", &self.dataset.dims())
            .field("layout", &self.arena.stats())
            .finish()
    }
}

impl TopkEngine {
    /// Partitions and lays out `dataset`. Fails on configuration errors or build defects.
    pub fn build(dataset: Dataset, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let partitioner = partitioner_for(config.partitioning);
        let assignment = partitioner.assign(&dataset)?;
        let sizes = assignment.sizes();
        tracing::info!(
            "{} partitioning: {} partitions, sizes {}..={}, {:?}",
            partitioner.name(),
            assignment.partition_count(),
            sizes.iter().min().copied().unwrap_or(0),
            sizes.iter().max().copied().unwrap_or(0),
            start.elapsed()
        );

        let arena = BlockBuilder::new(config.block_capacity)?.build(&dataset, &assignment)?;

        let executions = ExecutionKind::ALL
            .iter()
            .map(|&kind| execution_for(kind, &config))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Engine ready: {} tuples x {} attributes in {:?}",
            dataset.len(),
            dataset.dims(),
            start.elapsed()
        );
        Ok(Self { config, dataset, arena, executions })
    }

    /// Replaces the dataset with the same configuration. On failure the engine is unchanged.
    pub fn rebuild(&mut self, dataset: Dataset) -> Result<()> {
        *self = Self::build(dataset, self.config.clone())?;
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn arena(&self) -> &BlockArena {
        &self.arena
    }

    pub fn layout_stats(&self) -> LayoutStats {
        self.arena.stats()
    }

    pub fn fingerprint(&self) -> [u8; 32] {
        self.arena.fingerprint()
    }

    /// Runs `query` with the configured execution.
    pub fn query(&self, query: &Query) -> Result<TopKResult> {
        self.query_with(self.config.execution, query)
    }

    /// Runs `query` with a specific execution.
    pub fn query_with(&self, kind: ExecutionKind, query: &Query) -> Result<TopKResult> {
        self.query_with_metrics(kind, query, &ScanMetrics::new())
    }

    /// Runs `query` with a specific execution, accumulating counters into `metrics`.
    pub fn query_with_metrics(
        &self,
        kind: ExecutionKind,
        query: &Query,
        metrics: &ScanMetrics,
    ) -> Result<TopKResult> {
        query.validate(self.dataset.dims())?;

        let mut candidates = self.execution(kind).execute(&self.arena, query, metrics);
        candidates.truncate(query.k);

        if self.config.validate {
            let expected = brute_force_topk(&self.dataset, query);
            cross_validate(kind.name(), &expected, &candidates, self.config.validation_tolerance)?;
        }

        let snapshot = metrics.snapshot();
        tracing::debug!(
            "{} query k={} qq={}: {} tuples in {} blocks, {}/{} partitions stopped early",
            kind.name(),
            query.k,
            query.qq(),
            snapshot.tuples_scanned,
            snapshot.blocks_scanned,
            snapshot.partitions_terminated_early,
            snapshot.partitions_scanned
        );
        Ok(TopKResult::from_sorted(candidates))
    }

    fn execution(&self, kind: ExecutionKind) -> &dyn Execution {
        let idx = ExecutionKind::ALL.iter().position(|&k| k == kind).unwrap_or(0);
        self.executions[idx].as_ref()
    }
}
