// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::layout::{BlockArena, BlockBuilder};
use crate::metrics::ScanMetrics;
use crate::partition::{Partitioner, PolarPartitioner, RandomPartitioner};
use crate::scan::{block_threshold, scan_partition, ScalarKernel, ScoreKernel, SimdKernel, TopKHeap};
use crate::tests::{random_dataset, skewed_dataset};
use crate::types::{Candidate, Dataset, PartitionId, Query, TupleId};

fn build(data: &Dataset, partitions: usize, capacity: usize) -> BlockArena {
    let assignment = RandomPartitioner::new(partitions).assign(data).unwrap();
    BlockBuilder::new(capacity).unwrap().build(data, &assignment).unwrap()
}

#[test]
fn test_heap_keeps_best() {
    let mut heap = TopKHeap::new(3);
    for (i, s) in [0.1, 0.5, 0.3, 0.9, 0.2].iter().enumerate() {
        heap.offer(Candidate::new(TupleId(i as u32), *s));
    }

    assert!(heap.is_full());
    assert_eq!(heap.min().unwrap().score, 0.3);
    assert!(!heap.offer(Candidate::new(TupleId(9), 0.25)));

    let sorted = heap.into_sorted();
    let scores: Vec<f32> = sorted.iter().map(|c| c.score).collect();
    assert_eq!(scores, vec![0.9, 0.5, 0.3]);
}

#[test]
fn test_heap_prefers_smaller_id_on_tie() {
    let mut heap = TopKHeap::new(1);
    assert!(heap.offer(Candidate::new(TupleId(5), 1.0)));
    assert!(heap.offer(Candidate::new(TupleId(2), 1.0)));
    assert!(!heap.offer(Candidate::new(TupleId(7), 1.0)));

    assert_eq!(heap.into_sorted()[0].id, TupleId(2));
}

#[test]
fn test_heap_stop_rule() {
    let mut heap = TopKHeap::new(2);
    heap.offer(Candidate::new(TupleId(0), 0.8));
    assert!(!heap.can_stop(0.0));

    heap.offer(Candidate::new(TupleId(1), 0.6));
    assert!(heap.can_stop(0.6));
    assert!(!heap.can_stop(0.61));
}

#[test]
fn test_heap_zero_capacity() {
    let mut heap = TopKHeap::new(0);
    assert!(!heap.offer(Candidate::new(TupleId(0), 1.0)));
    assert!(heap.is_empty());
}

#[test]
fn test_kernels_are_bit_identical() {
    let data = random_dataset(203, 5, 21);
    let arena = build(&data, 3, 32);
    let query = Query::new(10, vec![4, 0, 2], vec![0.7, 1.3, 0.25]);

    let mut scalar = vec![0.0f32; 32];
    let mut simd = vec![0.0f32; 32];
    for partition in arena.partitions() {
        for block in partition.blocks() {
            ScalarKernel.score_block(&block, &query, &mut scalar);
            SimdKernel.score_block(&block, &query, &mut simd);
            for (slot, id) in block.ids().iter().enumerate() {
                let reference = query.score_with(|attr| data.value(*id, attr));
                assert_eq!(scalar[slot].to_bits(), reference.to_bits());
                assert_eq!(simd[slot].to_bits(), reference.to_bits());
            }
        }
    }
}

#[test]
fn test_block_threshold() {
    let query = Query::new(1, vec![2, 0], vec![2.0, 1.0]);
    assert_eq!(block_threshold(&query, &[0.5, 0.9, 0.25]), 1.0);
}

#[test]
fn test_scan_stops_after_strong_block() {
    let data = skewed_dataset();
    let arena = build(&data, 1, 8);
    let query = Query::uniform(2, 2);
    let metrics = ScanMetrics::new();

    let mut heap = TopKHeap::new(2);
    let outcome = scan_partition(&arena.partition(PartitionId(0)), &query, &mut heap, &SimdKernel, &metrics);

    assert_eq!(outcome.blocks_scanned, 1);
    assert_eq!(outcome.tuples_scanned, 8);
    assert!(outcome.terminated_early);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.blocks_scanned, 1);
    assert_eq!(snapshot.tuples_scanned, 8);
    assert_eq!(snapshot.partitions_terminated_early, 1);

    let top = heap.into_sorted();
    assert_eq!(top[0].id, TupleId(0));
    assert_eq!(top[1].id, TupleId(1));
}

#[test]
fn test_scan_without_stop_reads_everything() {
    let data = random_dataset(40, 2, 22);
    let arena = build(&data, 1, 8);
    let query = Query::uniform(40, 2);
    let metrics = ScanMetrics::new();

    let mut heap = TopKHeap::new(40);
    let outcome = scan_partition(&arena.partition(PartitionId(0)), &query, &mut heap, &ScalarKernel, &metrics);

    assert_eq!(outcome.blocks_scanned, 5);
    assert_eq!(outcome.tuples_scanned, 40);
    assert!(!outcome.terminated_early);
    assert_eq!(heap.len(), 40);
}

#[test]
fn test_early_termination_is_sound() {
    let data = random_dataset(4000, 3, 23);
    let assignment = PolarPartitioner::new(2).assign(&data).unwrap();
    let arena = BlockBuilder::new(64).unwrap().build(&data, &assignment).unwrap();
    let query = Query::new(5, vec![0, 1, 2], vec![1.0, 0.5, 2.0]);
    let metrics = ScanMetrics::new();

    for partition in arena.partitions() {
        let mut heap = TopKHeap::new(query.k);
        let outcome = scan_partition(&partition, &query, &mut heap, &SimdKernel, &metrics);
        if !outcome.terminated_early {
            continue;
        }
        let min = heap.min().unwrap().score;
        for b in outcome.blocks_scanned..partition.block_count() {
            let block = partition.block(b);
            for id in block.ids() {
                assert!(query.score_with(|attr| data.value(*id, attr)) <= min);
            }
        }
    }
}
