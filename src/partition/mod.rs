// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Attribute-space partitioning.
//!
//! A partitioner maps every tuple to a partition id. The choice only affects
//! how early scans can stop, never which tuples are returned.

pub mod polar;
pub mod random;

use crate::config::PartitionStrategy;
use crate::error::{Result, TopkError};
use crate::types::{Dataset, PartitionId, TupleId};

pub use polar::PolarPartitioner;
pub use random::RandomPartitioner;

pub trait Partitioner {
    fn name(&self) -> &'static str;
    fn assign(&self, dataset: &Dataset) -> Result<PartitionAssignment>;
}

/// Returns the partitioner for a configured strategy.
pub fn partitioner_for(strategy: PartitionStrategy) -> Box<dyn Partitioner + Send + Sync> {
    match strategy {
        PartitionStrategy::Polar { splits } => Box::new(PolarPartitioner::new(splits)),
        PartitionStrategy::Random { partitions } => Box::new(RandomPartitioner::new(partitions)),
    }
}

/// Partition id per tuple, validated against the partition count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionAssignment {
    partitions: usize,
    ids: Vec<PartitionId>,
}

impl PartitionAssignment {
    /// Fails with `PartitionOutOfRange` if any id is not below `partitions`.
    pub fn new(partitions: usize, ids: Vec<PartitionId>) -> Result<Self> {
        if partitions == 0 || partitions > u32::MAX as usize {
            return Err(TopkError::InvalidConfig(format!(
                "partition count {} out of range",
                partitions
            )));
        }
        if let Some((tuple, pid)) = ids
            .iter()
            .enumerate()
            .find(|(_, pid)| pid.index() >= partitions)
        {
            tracing::error!(
                "Partition id {} of tuple {} is outside [0, {})",
                pid.0,
                tuple,
                partitions
            );
            return Err(TopkError::PartitionOutOfRange {
                tuple: tuple as u32,
                partition: pid.0,
                partitions: partitions as u32,
            });
        }
        Ok(Self { partitions, ids })
    }

    pub fn partition_count(&self) -> usize {
        self.partitions
    }

    pub fn ids(&self) -> &[PartitionId] {
        &self.ids
    }

    pub fn of(&self, tuple: TupleId) -> PartitionId {
        self.ids[tuple.index()]
    }

    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.partitions];
        for pid in &self.ids {
            sizes[pid.index()] += 1;
        }
        sizes
    }

    /// Tuple ids grouped per partition, ascending within each group.
    pub fn members(&self) -> Vec<Vec<TupleId>> {
        let sizes = self.sizes();
        let mut groups: Vec<Vec<TupleId>> = sizes.iter().map(|&s| Vec::with_capacity(s)).collect();
        for (i, pid) in self.ids.iter().enumerate() {
            groups[pid.index()].push(TupleId(i as u32));
        }
        groups
    }
}
