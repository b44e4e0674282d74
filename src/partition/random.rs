// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Index-range partitioning: no angle computation, `id = index / (n / P)`.

use super::{PartitionAssignment, Partitioner};
use crate::error::{Result, TopkError};
use crate::types::{Dataset, PartitionId};

#[derive(Clone, Copy, Debug)]
pub struct RandomPartitioner {
    partitions: usize,
}

impl RandomPartitioner {
    pub fn new(partitions: usize) -> Self {
        Self { partitions }
    }
}

impl Partitioner for RandomPartitioner {
    fn name(&self) -> &'static str {
        "random"
    }

    fn assign(&self, dataset: &Dataset) -> Result<PartitionAssignment> {
        if self.partitions == 0 {
            return Err(TopkError::InvalidConfig("random partition count must be at least 1".into()));
        }
        let n = dataset.len();
        let chunk = (n / self.partitions).max(1);
        let last = (self.partitions - 1) as u32;
        // The tail left over by the integer division belongs to the last partition.
        let ids = (0..n)
            .map(|i| PartitionId(((i / chunk) as u32).min(last)))
            .collect();
        PartitionAssignment::new(self.partitions, ids)
    }
}
