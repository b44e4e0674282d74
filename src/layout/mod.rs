// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Block layout arena.
//!
//! Every partition is a run of fixed-capacity blocks. All blocks live in one
//! arena: a single buffer of structure-of-arrays columns, a single buffer of
//! tuple ids, and a single buffer of bound vectors. Blocks and partitions are
//! plain descriptors holding offsets into those buffers.

pub mod builder;

pub use builder::BlockBuilder;

use crate::config::LANES;
use crate::types::{BlockId, PartitionId, TupleId};
use serde::Serialize;

/// Rounds a block length up to a whole number of SIMD lanes.
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(LANES) * LANES
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub partition: PartitionId,
    /// Number of real tuples.
    pub len: usize,
    /// Column length including zero padding.
    pub stride: usize,
    slot_offset: usize,
    value_offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub id: PartitionId,
    pub tuple_count: usize,
    pub first_block: BlockId,
    pub block_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub tuples: usize,
    pub partitions: usize,
    pub empty_partitions: usize,
    pub blocks: usize,
    pub min_partition: usize,
    pub max_partition: usize,
    pub block_capacity: usize,
}

/// Owner of every block buffer of a built dataset. Read-only after the build.
#[derive(Clone, Debug, Default)]
pub struct BlockArena {
    dims: usize,
    block_capacity: usize,
    values: Vec<f32>,
    ids: Vec<TupleId>,
    bounds: Vec<f32>,
    blocks: Vec<Block>,
    partitions: Vec<Partition>,
}

impl BlockArena {
    pub(crate) fn new(dims: usize, block_capacity: usize) -> Self {
        Self { dims, block_capacity, ..Default::default() }
    }

    /// Appends one block. `columns` holds `dims` columns of `padded_len(ids.len())` values.
    pub(crate) fn push_block(
        &mut self,
        partition: PartitionId,
        ids: &[TupleId],
        columns: &[f32],
        bound: &[f32],
    ) -> BlockId {
        let stride = padded_len(ids.len());
        debug_assert_eq!(columns.len(), stride * self.dims);
        debug_assert_eq!(bound.len(), self.dims);

        let block = Block {
            partition,
            len: ids.len(),
            stride,
            slot_offset: self.ids.len(),
            value_offset: self.values.len(),
        };
        self.ids.extend_from_slice(ids);
        self.values.extend_from_slice(columns);
        self.bounds.extend_from_slice(bound);
        self.blocks.push(block);
        BlockId((self.blocks.len() - 1) as u32)
    }

    pub(crate) fn push_partition(&mut self, partition: Partition) {
        debug_assert_eq!(partition.id.index(), self.partitions.len());
        self.partitions.push(partition);
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    pub fn tuple_count(&self) -> usize {
        self.ids.len()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, id: BlockId) -> BlockView<'_> {
        let block = &self.blocks[id.index()];
        BlockView {
            id,
            block,
            ids: &self.ids[block.slot_offset..block.slot_offset + block.len],
            values: &self.values[block.value_offset..block.value_offset + block.stride * self.dims],
            bound: &self.bounds[id.index() * self.dims..(id.index() + 1) * self.dims],
        }
    }

    pub fn partition(&self, id: PartitionId) -> PartitionView<'_> {
        PartitionView { arena: self, partition: &self.partitions[id.index()] }
    }

    pub fn partitions(&self) -> impl Iterator<Item = PartitionView<'_>> + '_ {
        self.partitions.iter().map(move |p| PartitionView { arena: self, partition: p })
    }

    pub fn stats(&self) -> LayoutStats {
        let sizes = self.partitions.iter().map(|p| p.tuple_count);
        LayoutStats {
            tuples: self.tuple_count(),
            partitions: self.partitions.len(),
            empty_partitions: self.partitions.iter().filter(|p| p.tuple_count == 0).count(),
            blocks: self.blocks.len(),
            min_partition: sizes.clone().min().unwrap_or(0),
            max_partition: sizes.max().unwrap_or(0),
            block_capacity: self.block_capacity,
        }
    }

    /// BLAKE3 hash of the whole layout: shape, tuple order, values and bounds.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.dims as u64).to_le_bytes());
        hasher.update(&(self.block_capacity as u64).to_le_bytes());

        for p in &self.partitions {
            hasher.update(&p.id.0.to_le_bytes());
            hasher.update(&(p.tuple_count as u64).to_le_bytes());
            hasher.update(&(p.block_count as u64).to_le_bytes());
        }
        for id in &self.ids {
            hasher.update(&id.0.to_le_bytes());
        }
        for v in &self.values {
            hasher.update(&v.to_bits().to_le_bytes());
        }
        for b in &self.bounds {
            hasher.update(&b.to_bits().to_le_bytes());
        }
        *hasher.finalize().as_bytes()
    }
}

/// Borrowed view of one block.
#[derive(Clone, Copy, Debug)]
pub struct BlockView<'a> {
    pub id: BlockId,
    block: &'a Block,
    ids: &'a [TupleId],
    values: &'a [f32],
    bound: &'a [f32],
}

impl<'a> BlockView<'a> {
    pub fn len(&self) -> usize {
        self.block.len
    }

    pub fn is_empty(&self) -> bool {
        self.block.len == 0
    }

    pub fn stride(&self) -> usize {
        self.block.stride
    }

    pub fn partition(&self) -> PartitionId {
        self.block.partition
    }

    pub fn ids(&self) -> &'a [TupleId] {
        self.ids
    }

    /// Attribute `attr` of every slot, `stride` long; slots past `len` are 0.
    pub fn column(&self, attr: usize) -> &'a [f32] {
        &self.values[attr * self.block.stride..(attr + 1) * self.block.stride]
    }

    /// Per-attribute maximum over every tuple stored after this block.
    pub fn bound(&self) -> &'a [f32] {
        self.bound
    }
}

/// Borrowed view of one partition and its blocks.
#[derive(Clone, Copy, Debug)]
pub struct PartitionView<'a> {
    arena: &'a BlockArena,
    partition: &'a Partition,
}

impl<'a> PartitionView<'a> {
    pub fn id(&self) -> PartitionId {
        self.partition.id
    }

    pub fn tuple_count(&self) -> usize {
        self.partition.tuple_count
    }

    pub fn block_count(&self) -> usize {
        self.partition.block_count
    }

    pub fn is_empty(&self) -> bool {
        self.partition.tuple_count == 0
    }

    pub fn block(&self, i: usize) -> BlockView<'a> {
        assert!(i < self.partition.block_count, "block {} out of range", i);
        self.arena.block(BlockId(self.partition.first_block.0 + i as u32))
    }

    /// Blocks in scan order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockView<'a>> + 'a {
        let arena = self.arena;
        let first = self.partition.first_block.0;
        (0..self.partition.block_count as u32).map(move |i| arena.block(BlockId(first + i)))
    }
}
