// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cross-validation and result hashing.

use crate::error::{Result, TopkError};
use crate::types::Candidate;

/// True when `found` is within `tolerance` of `expected`, relative to max(1, |expected|).
pub fn within_tolerance(expected: f32, found: f32, tolerance: f64) -> bool {
    let scale = (expected.abs() as f64).max(1.0);
    ((expected as f64) - (found as f64)).abs() <= tolerance * scale
}

/// Compares a fast-path answer against the brute-force answer.
///
/// Both lists are best-first. The lengths must agree and the score at every
/// rank must match within `tolerance`; ids may differ where scores tie.
pub fn cross_validate(
    execution: &str,
    expected: &[Candidate],
    found: &[Candidate],
    tolerance: f64,
) -> Result<()> {
    let mismatch = |rank: usize, e: f32, f: f32| {
        tracing::error!(
            "{} result disagrees with brute force at rank {}: expected {}, found {}",
            execution,
            rank,
            e,
            f
        );
        TopkError::ValidationMismatch {
            execution: execution.to_string(),
            rank,
            expected: e,
            found: f,
            tolerance,
        }
    };

    if expected.len() != found.len() {
        let rank = expected.len().min(found.len());
        let score = |list: &[Candidate]| list.get(rank).map(|c| c.score).unwrap_or(f32::NEG_INFINITY);
        return Err(mismatch(rank, score(expected), score(found)));
    }
    for (rank, (e, f)) in expected.iter().zip(found).enumerate() {
        if !within_tolerance(e.score, f.score, tolerance) {
            return Err(mismatch(rank, e.score, f.score));
        }
    }
    Ok(())
}

/// BLAKE3 hash of a result list: ids and score bits in rank order.
pub fn result_hash(candidates: &[Candidate]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(candidates.len() as u64).to_le_bytes());
    for c in candidates {
        hasher.update(&c.id.0.to_le_bytes());
        hasher.update(&c.score.to_bits().to_le_bytes());
    }
    *hasher.finalize().as_bytes()
}

/// Lowercase hex rendering of a 32-byte hash.
pub fn to_hex(hash: &[u8; 32]) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
