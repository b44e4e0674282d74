// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use serde::{Deserialize, Serialize};

/// Position of a tuple in the input dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TupleId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PartitionId(pub u32);

/// Index of a block descriptor in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u32);

impl TupleId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl PartitionId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl BlockId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
