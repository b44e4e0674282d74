// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! pta-kernel: partitioned threshold top-k aggregation over in-memory
//! multi-attribute data.
//!
//! Tuples are split into partitions, laid out in bounded blocks, and scanned
//! with early termination by scalar, SIMD or multi-threaded executions that
//! all return the same top-k.

pub mod config;
pub mod error;
pub mod types;
pub mod partition;
pub mod layout;
pub mod scan;
pub mod merge;
pub mod exec;
pub mod metrics;
pub mod oracle;
pub mod verify;
pub mod engine;

pub use config::{EngineConfig, ExecutionKind, MergeStrategy, PartitionStrategy, MAX_K};
pub use engine::TopkEngine;
pub use error::{Result, TopkError};
pub use metrics::{MetricsSnapshot, ScanMetrics};
pub use types::{Candidate, Dataset, Query, TopKResult, TupleId};

#[cfg(test)]
pub mod tests;
