// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bitonic compare-exchange networks over candidates.
//!
//! Every network sorts best-first using `Candidate` order. Unused slots hold
//! `Candidate::SENTINEL`, which ranks below any real candidate and is dropped
//! from the output.

use crate::types::Candidate;

/// Slots of the small sorting network.
pub const SMALL_NETWORK: usize = 32;

/// Largest k merged by the small sorting network.
pub const SMALL_K: usize = SMALL_NETWORK / 2;

#[inline]
fn compare_exchange(buf: &mut [Candidate], i: usize, j: usize, best_first: bool) {
    if (buf[i] < buf[j]) == best_first {
        buf.swap(i, j);
    }
}

/// Full bitonic sort of a power-of-two sized buffer, best-first.
pub fn bitonic_sort(buf: &mut [Candidate]) {
    let n = buf.len();
    debug_assert!(n.is_power_of_two());
    let mut size = 2;
    while size <= n {
        let mut stride = size / 2;
        while stride > 0 {
            for i in 0..n {
                let j = i ^ stride;
                if j > i {
                    compare_exchange(buf, i, j, i & size == 0);
                }
            }
            stride /= 2;
        }
        size *= 2;
    }
}

/// Half-cleaner cascade: sorts a bitonic, power-of-two sized buffer best-first.
pub fn bitonic_merge(buf: &mut [Candidate]) {
    let n = buf.len();
    debug_assert!(n.is_power_of_two());
    let mut stride = n / 2;
    while stride > 0 {
        for i in 0..n {
            let j = i ^ stride;
            if j > i {
                compare_exchange(buf, i, j, true);
            }
        }
        stride /= 2;
    }
}

fn take_best(buf: &[Candidate], k: usize) -> Vec<Candidate> {
    buf.iter()
        .take(k)
        .copied()
        .filter(|c| !c.is_sentinel())
        .collect()
}

/// Merges two lists of at most `SMALL_K` candidates through one 32-slot sorting network.
pub fn merge_small(a: &[Candidate], b: &[Candidate], k: usize) -> Vec<Candidate> {
    debug_assert!(a.len() + b.len() <= SMALL_NETWORK);
    let mut buf = [Candidate::SENTINEL; SMALL_NETWORK];
    buf[..a.len()].copy_from_slice(a);
    buf[a.len()..a.len() + b.len()].copy_from_slice(b);
    bitonic_sort(&mut buf);
    take_best(&buf, k)
}

/// Merges two best-first lists by bitonic merging.
///
/// Both lists are padded to the same power of two, the second is reversed so
/// the concatenation rises then falls, and one half-cleaner cascade sorts it.
pub fn merge_bitonic(a: &[Candidate], b: &[Candidate], k: usize) -> Vec<Candidate> {
    let width = k.max(a.len()).max(b.len()).max(1).next_power_of_two();
    let mut buf = vec![Candidate::SENTINEL; 2 * width];
    buf[..a.len()].copy_from_slice(a);
    for (slot, c) in buf[width..].iter_mut().rev().zip(b) {
        *slot = *c;
    }
    bitonic_merge(&mut buf);
    take_best(&buf, k)
}

/// Keeps the `k` best of two best-first lists, choosing the network by size.
pub fn merge_pair(a: &[Candidate], b: &[Candidate], k: usize) -> Vec<Candidate> {
    if k <= SMALL_K && a.len() + b.len() <= SMALL_NETWORK {
        merge_small(a, b, k)
    } else {
        merge_bitonic(a, b, k)
    }
}
