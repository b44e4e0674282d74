// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Block score kernels.
//!
//! Both kernels accumulate attribute by attribute in query order with a
//! separate multiply and add, so they produce bit-identical scores.

use crate::config::LANES;
use crate::layout::BlockView;
use crate::types::Query;
use wide::f32x8;

pub trait ScoreKernel {
    fn name(&self) -> &'static str;

    /// Writes the score of every slot of `block` into `out[..block.stride()]`.
    /// Padded slots receive scores too; callers read only `..block.len()`.
    fn score_block(&self, block: &BlockView<'_>, query: &Query, out: &mut [f32]);
}

/// One tuple at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarKernel;

impl ScoreKernel for ScalarKernel {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn score_block(&self, block: &BlockView<'_>, query: &Query, out: &mut [f32]) {
        for (slot, score) in out[..block.len()].iter_mut().enumerate() {
            *score = query.score_with(|attr| block.column(attr)[slot]);
        }
    }
}

/// `LANES` tuples per vector operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimdKernel;

impl ScoreKernel for SimdKernel {
    fn name(&self) -> &'static str {
        "simd"
    }

    fn score_block(&self, block: &BlockView<'_>, query: &Query, out: &mut [f32]) {
        let out = &mut out[..block.stride()];
        for (chunk_idx, dst) in out.chunks_exact_mut(LANES).enumerate() {
            let base = chunk_idx * LANES;
            let mut acc = f32x8::ZERO;
            for (&attr, &w) in query.attributes.iter().zip(query.weights.iter()) {
                let mut lanes = [0.0f32; LANES];
                lanes.copy_from_slice(&block.column(attr)[base..base + LANES]);
                let product = f32x8::splat(w) * f32x8::from(lanes);
                acc = acc + product;
            }
            dst.copy_from_slice(&acc.to_array());
        }
    }
}
