// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and engine configuration.

use crate::error::{Result, TopkError};
use serde::{Deserialize, Serialize};

/// Largest k a query may request. Bounded heaps and merge networks are sized for it.
pub const MAX_K: usize = 256;

/// Number of f32 lanes scored per vector operation.
pub const LANES: usize = 8;

/// Default number of tuples per block.
pub const DEFAULT_BLOCK_CAPACITY: usize = 1024;

/// Default number of equal-frequency bins per polar angle.
pub const DEFAULT_POLAR_SPLITS: usize = 2;

/// Default relative tolerance when comparing a fast path against brute force.
pub const DEFAULT_VALIDATION_TOLERANCE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionStrategy {
    /// Hyperspherical angles around the ideal corner, `splits` bins per angle.
    Polar { splits: usize },
    /// Contiguous index ranges, `partitions` of them.
    Random { partitions: usize },
}

impl Default for PartitionStrategy {
    fn default() -> Self {
        PartitionStrategy::Polar { splits: DEFAULT_POLAR_SPLITS }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionKind {
    Scalar,
    #[default]
    Simd,
    Threaded,
}

impl ExecutionKind {
    pub const ALL: [ExecutionKind; 3] = [ExecutionKind::Scalar, ExecutionKind::Simd, ExecutionKind::Threaded];

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionKind::Scalar => "scalar",
            ExecutionKind::Simd => "simd",
            ExecutionKind::Threaded => "threaded",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Pairwise reduction with sorting / bitonic merge networks.
    #[default]
    Tournament,
    /// One heap fed with every partition candidate.
    SharedHeap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub block_capacity: usize,
    pub partitioning: PartitionStrategy,
    pub execution: ExecutionKind,
    pub merge: MergeStrategy,
    /// Worker count for the threaded execution. 0 means available parallelism.
    pub threads: usize,
    /// Cross-check every query against a brute-force scan.
    pub validate: bool,
    pub validation_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_capacity: DEFAULT_BLOCK_CAPACITY,
            partitioning: PartitionStrategy::default(),
            execution: ExecutionKind::default(),
            merge: MergeStrategy::default(),
            threads: 0,
            validate: cfg!(feature = "validation"),
            validation_tolerance: DEFAULT_VALIDATION_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Rejects configurations the build cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.block_capacity == 0 || self.block_capacity % LANES != 0 {
            return Err(TopkError::InvalidConfig(format!(
                "block capacity {} must be a positive multiple of {}",
                self.block_capacity, LANES
            )));
        }
        match self.partitioning {
            PartitionStrategy::Polar { splits } if splits == 0 => {
                return Err(TopkError::InvalidConfig("polar splits must be at least 1".into()));
            }
            PartitionStrategy::Random { partitions } if partitions == 0 => {
                return Err(TopkError::InvalidConfig("random partition count must be at least 1".into()));
            }
            _ => {}
        }
        if !(self.validation_tolerance.is_finite() && self.validation_tolerance >= 0.0) {
            return Err(TopkError::InvalidConfig(format!(
                "validation tolerance {} must be finite and non-negative",
                self.validation_tolerance
            )));
        }
        Ok(())
    }

    /// Worker count actually used by the threaded execution.
    pub fn effective_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        }
    }
}
