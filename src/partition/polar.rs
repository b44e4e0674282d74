// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Polar (hyperspherical) partitioning around the ideal corner.
//!
//! Every attribute is reflected about 1.0 so the ideal tuple sits at the
//! origin, then the tuple is described by `d - 1` angles. Tuples pointing in
//! the same direction from the ideal corner land in the same partition, which
//! keeps per-block bounds tight for any weighting.
//!
//! For each angle the tuples are ranked and cut into `splits` equal-frequency
//! bins; the bin indices are the base-`splits` digits of the partition id.

use super::{PartitionAssignment, Partitioner};
use crate::error::{Result, TopkError};
use crate::types::{Dataset, PartitionId};
use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct PolarPartitioner {
    splits: usize,
}

impl PolarPartitioner {
    pub fn new(splits: usize) -> Self {
        Self { splits }
    }

    /// `splits^(dims - 1)`, or a configuration error if it does not fit in u32.
    pub fn partition_count(&self, dims: usize) -> Result<usize> {
        if self.splits == 0 {
            return Err(TopkError::InvalidConfig("polar splits must be at least 1".into()));
        }
        let exp = u32::try_from(dims.saturating_sub(1))
            .map_err(|_| TopkError::InvalidConfig(format!("{} dimensions is too many", dims)))?;
        u32::try_from(self.splits)
            .ok()
            .and_then(|s| s.checked_pow(exp))
            .map(|p| p as usize)
            .ok_or_else(|| {
                TopkError::InvalidConfig(format!(
                    "{} splits over {} angles overflows the partition id space",
                    self.splits, exp
                ))
            })
    }
}

impl Partitioner for PolarPartitioner {
    fn name(&self) -> &'static str {
        "polar"
    }

    fn assign(&self, dataset: &Dataset) -> Result<PartitionAssignment> {
        let partitions = self.partition_count(dataset.dims())?;
        let n = dataset.len();
        let angles = hyperspherical_angles(dataset);
        let bin_width = (n - 1) / self.splits + 1;

        let mut ids = vec![0u32; n];
        let mut order: Vec<u32> = Vec::with_capacity(n);
        let mut mul = 1u32;
        // Digits in the order the angles are produced: last angle first.
        for angle_idx in (0..dataset.dims().saturating_sub(1)).rev() {
            let column = &angles[angle_idx * n..(angle_idx + 1) * n];
            order.clear();
            order.extend(0..n as u32);
            order.par_sort_unstable_by(|&a, &b| {
                column[a as usize]
                    .total_cmp(&column[b as usize])
                    .then_with(|| a.cmp(&b))
            });
            for (rank, &tid) in order.iter().enumerate() {
                let bin = (rank / bin_width) as u32;
                ids[tid as usize] += bin * mul;
            }
            mul = mul.saturating_mul(self.splits as u32);
        }

        PartitionAssignment::new(partitions, ids.into_iter().map(PartitionId).collect())
    }
}

/// Angles in degrees, column-major: angle `j` of tuple `i` at `j * n + i`.
///
/// With `r_m = 1 - x_m` and `acc` starting at `r_{d-1}^2`, for `m = d-1 .. 1`:
/// `angle_{m-1} = |atan2(sqrt(acc), r_{m-1})|`, then `acc += r_{m-1}^2`.
pub fn hyperspherical_angles(dataset: &Dataset) -> Vec<f32> {
    let n = dataset.len();
    let d = dataset.dims();
    if d < 2 {
        return Vec::new();
    }

    let mut angles = vec![0.0f32; (d - 1) * n];
    let mut acc: Vec<f32> = dataset
        .column(d - 1)
        .iter()
        .map(|&x| {
            let r = 1.0 - x;
            r * r
        })
        .collect();

    for m in (1..d).rev() {
        let col = dataset.column(m - 1);
        let out = &mut angles[(m - 1) * n..m * n];
        out.par_iter_mut()
            .zip(acc.par_iter_mut())
            .zip(col.par_iter())
            .for_each(|((angle, acc), &x)| {
                let r = 1.0 - x;
                *angle = acc.sqrt().atan2(r).abs().to_degrees();
                *acc += r * r;
            });
    }
    angles
}
