// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopkError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("k = {k} exceeds the maximum supported heap capacity {max}")]
    KTooLarge { k: usize, max: usize },

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Build defect: the partitioner produced an id outside its own range.
    #[error("Tuple {tuple} assigned to partition {partition}, but only {partitions} partitions exist")]
    PartitionOutOfRange { tuple: u32, partition: u32, partitions: u32 },

    /// Build defect: a bound vector grew between consecutive blocks or fails to dominate later tuples.
    #[error("Bound vector of partition {partition} block {block} violated on attribute {attribute}")]
    BoundViolation { partition: u32, block: usize, attribute: usize },

    #[error("{execution} result disagrees with brute force at rank {rank}: expected score {expected}, found {found} (tolerance {tolerance})")]
    ValidationMismatch { execution: String, rank: usize, expected: f32, found: f32, tolerance: f64 },
}

impl TopkError {
    /// True for defects in the build logic rather than in caller input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, TopkError::PartitionOutOfRange { .. } | TopkError::BoundViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, TopkError>;
