// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reference implementations used to check the partitioned engine.

pub mod brute_force;
pub mod threshold;

pub use brute_force::{brute_force_topk, score_all};
pub use threshold::{threshold_topk, ThresholdOutcome};
