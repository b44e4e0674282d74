// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! One-time construction of the block layout.
//!
//! Within a partition tuples are ordered by their first-seen position: the
//! smallest rank a tuple reaches in any per-attribute descending order. A
//! sorted-access scan over all attributes would meet tuples in roughly this
//! order, so strong tuples land in the first blocks and the bounds of later
//! blocks shrink quickly.

use super::{padded_len, BlockArena, Partition};
use crate::config::LANES;
use crate::error::{Result, TopkError};
use crate::partition::PartitionAssignment;
use crate::types::{BlockId, Dataset, PartitionId, TupleId};
use rayon::prelude::*;
use std::time::Instant;

#[derive(Clone, Copy, Debug)]
pub struct BlockBuilder {
    capacity: usize,
}

/// Blocks of one partition before they are appended to the arena.
struct PackedPartition {
    /// Slot order, `capacity` ids per block except the last.
    order: Vec<TupleId>,
    /// Per block, `dims` padded columns back to back.
    columns: Vec<Vec<f32>>,
    /// Per block, `dims` bound values.
    bounds: Vec<Vec<f32>>,
}

impl BlockBuilder {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity % LANES != 0 {
            return Err(TopkError::InvalidConfig(format!(
                "block capacity {} must be a positive multiple of {}",
                capacity, LANES
            )));
        }
        Ok(Self { capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Orders, packs and bounds every partition, then checks the bounds.
    pub fn build(&self, dataset: &Dataset, assignment: &PartitionAssignment) -> Result<BlockArena> {
        let start = Instant::now();
        let members = assignment.members();
        let empty = members.iter().filter(|m| m.is_empty()).count();
        if empty > 0 {
            tracing::warn!("{} of {} partitions are empty", empty, members.len());
        }

        let packed: Vec<PackedPartition> = members
            .par_iter()
            .map(|tuples| {
                let order = first_seen_order(dataset, tuples);
                self.pack(dataset, order)
            })
            .collect();

        let mut arena = BlockArena::new(dataset.dims(), self.capacity);
        for (pid, part) in packed.into_iter().enumerate() {
            let partition = PartitionId(pid as u32);
            let first_block = BlockId(arena.block_count() as u32);
            for (b, ids) in part.order.chunks(self.capacity).enumerate() {
                arena.push_block(partition, ids, &part.columns[b], &part.bounds[b]);
            }
            arena.push_partition(Partition {
                id: partition,
                tuple_count: part.order.len(),
                first_block,
                block_count: part.columns.len(),
            });
        }

        validate_bounds(&arena)?;

        let stats = arena.stats();
        tracing::info!(
            "Built {} blocks over {} partitions (sizes {}..={}) in {:?}",
            stats.blocks,
            stats.partitions,
            stats.min_partition,
            stats.max_partition,
            start.elapsed()
        );
        Ok(arena)
    }

    fn pack(&self, dataset: &Dataset, order: Vec<TupleId>) -> PackedPartition {
        let dims = dataset.dims();
        let mut columns = Vec::with_capacity(order.len().div_ceil(self.capacity));
        let mut maxima = Vec::with_capacity(columns.capacity());

        for chunk in order.chunks(self.capacity) {
            let stride = padded_len(chunk.len());
            let mut block = vec![0.0f32; dims * stride];
            let mut max = vec![0.0f32; dims];
            for attr in 0..dims {
                let src = dataset.column(attr);
                let dst = &mut block[attr * stride..attr * stride + chunk.len()];
                for (slot, id) in dst.iter_mut().zip(chunk) {
                    *slot = src[id.index()];
                    max[attr] = max[attr].max(*slot);
                }
            }
            columns.push(block);
            maxima.push(max);
        }

        let bounds = trailing_bounds(&maxima, dims);
        PackedPartition { order, columns, bounds }
    }
}

/// Sorts a partition's tuples by ascending first-seen position, ties by id.
///
/// `tuples` must be ascending; it is the tie-break order of every attribute sort.
pub fn first_seen_order(dataset: &Dataset, tuples: &[TupleId]) -> Vec<TupleId> {
    let m = tuples.len();
    if m == 0 {
        return Vec::new();
    }

    let first_seen = (0..dataset.dims())
        .into_par_iter()
        .map(|attr| {
            let col = dataset.column(attr);
            let mut local: Vec<u32> = (0..m as u32).collect();
            local.sort_unstable_by(|&a, &b| {
                col[tuples[b as usize].index()]
                    .total_cmp(&col[tuples[a as usize].index()])
                    .then_with(|| a.cmp(&b))
            });
            let mut rank = vec![0u32; m];
            for (r, &l) in local.iter().enumerate() {
                rank[l as usize] = r as u32;
            }
            rank
        })
        .reduce(
            || vec![u32::MAX; m],
            |mut acc, rank| {
                for (a, r) in acc.iter_mut().zip(rank) {
                    *a = (*a).min(r);
                }
                acc
            },
        );

    let mut local: Vec<u32> = (0..m as u32).collect();
    local.sort_unstable_by(|&a, &b| {
        first_seen[a as usize]
            .cmp(&first_seen[b as usize])
            .then_with(|| a.cmp(&b))
    });
    local.into_iter().map(|l| tuples[l as usize]).collect()
}

/// Bound of block `b` = running max of block maxima over `b+1..`; the last bound is zero.
pub fn trailing_bounds(block_maxima: &[Vec<f32>], dims: usize) -> Vec<Vec<f32>> {
    let mut bounds = vec![vec![0.0f32; dims]; block_maxima.len()];
    let mut running = vec![0.0f32; dims];
    for b in (1..block_maxima.len()).rev() {
        for (r, &x) in running.iter_mut().zip(&block_maxima[b]) {
            *r = r.max(x);
        }
        bounds[b - 1].copy_from_slice(&running);
    }
    bounds
}

/// Checks one partition's bounds: non-increasing, and each bound dominates every later block.
///
/// `bounds` and `block_maxima` hold one `dims`-wide vector per block, back to back.
pub fn check_partition_bounds(
    partition: u32,
    bounds: &[f32],
    block_maxima: &[f32],
    dims: usize,
) -> Result<()> {
    let blocks = bounds.len() / dims;
    for b in 0..blocks.saturating_sub(1) {
        let cur = &bounds[b * dims..(b + 1) * dims];
        let next = &bounds[(b + 1) * dims..(b + 2) * dims];
        let next_max = &block_maxima[(b + 1) * dims..(b + 2) * dims];
        for attr in 0..dims {
            if cur[attr] < next[attr] || cur[attr] < next_max[attr] {
                tracing::error!(
                    "Bound violation in partition {} block {} attribute {}: bound {} next bound {} next max {}",
                    partition,
                    b,
                    attr,
                    cur[attr],
                    next[attr],
                    next_max[attr]
                );
                return Err(TopkError::BoundViolation { partition, block: b, attribute: attr });
            }
        }
    }
    if let Some(last) = bounds.get(bounds.len().saturating_sub(dims)..) {
        if let Some(attr) = last.iter().position(|&v| v != 0.0) {
            tracing::error!("Last block of partition {} has a non-zero bound", partition);
            return Err(TopkError::BoundViolation {
                partition,
                block: blocks.saturating_sub(1),
                attribute: attr,
            });
        }
    }
    Ok(())
}

/// Re-derives block maxima from the arena and checks every partition.
pub fn validate_bounds(arena: &BlockArena) -> Result<()> {
    let dims = arena.dims();
    (0..arena.partition_count()).into_par_iter().try_for_each(|p| {
        let partition = arena.partition(PartitionId(p as u32));
        let mut bounds = Vec::with_capacity(partition.block_count() * dims);
        let mut maxima = Vec::with_capacity(partition.block_count() * dims);
        for block in partition.blocks() {
            bounds.extend_from_slice(block.bound());
            for attr in 0..dims {
                let col = &block.column(attr)[..block.len()];
                maxima.push(col.iter().copied().fold(0.0f32, f32::max));
            }
        }
        check_partition_bounds(partition.id().0, &bounds, &maxima, dims)
    })
}
