// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Scan counters.
//!
//! A `ScanMetrics` is passed by reference into every scan call, so one
//! collector can be shared across worker threads. Counters are telemetry
//! only and never influence a result.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ScanMetrics {
    tuples_scanned: AtomicU64,
    blocks_scanned: AtomicU64,
    partitions_scanned: AtomicU64,
    partitions_terminated_early: AtomicU64,
    heap_inserts: AtomicU64,
    candidates_merged: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub tuples_scanned: u64,
    pub blocks_scanned: u64,
    pub partitions_scanned: u64,
    pub partitions_terminated_early: u64,
    pub heap_inserts: u64,
    pub candidates_merged: u64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_block(&self, tuples: usize, inserts: usize) {
        self.blocks_scanned.fetch_add(1, Ordering::Relaxed);
        self.tuples_scanned.fetch_add(tuples as u64, Ordering::Relaxed);
        self.heap_inserts.fetch_add(inserts as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_partition(&self, terminated_early: bool) {
        self.partitions_scanned.fetch_add(1, Ordering::Relaxed);
        if terminated_early {
            self.partitions_terminated_early.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_merge(&self, candidates: usize) {
        self.candidates_merged.fetch_add(candidates as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tuples_scanned: self.tuples_scanned.load(Ordering::Relaxed),
            blocks_scanned: self.blocks_scanned.load(Ordering::Relaxed),
            partitions_scanned: self.partitions_scanned.load(Ordering::Relaxed),
            partitions_terminated_early: self.partitions_terminated_early.load(Ordering::Relaxed),
            heap_inserts: self.heap_inserts.load(Ordering::Relaxed),
            candidates_merged: self.candidates_merged.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.tuples_scanned,
            &self.blocks_scanned,
            &self.partitions_scanned,
            &self.partitions_terminated_early,
            &self.heap_inserts,
            &self.candidates_merged,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl MetricsSnapshot {
    /// Fraction of `total` tuples that were scored.
    pub fn scan_ratio(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.tuples_scanned as f64 / total as f64
        }
    }
}
