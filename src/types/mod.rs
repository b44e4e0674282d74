// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod dataset;
pub mod query;
pub mod candidate;

pub use candidate::{sort_best_first, Candidate, TopKResult};
pub use dataset::Dataset;
pub use id::{BlockId, PartitionId, TupleId};
pub use query::Query;
