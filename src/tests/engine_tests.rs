// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{EngineConfig, ExecutionKind, MergeStrategy, PartitionStrategy, MAX_K};
use crate::engine::TopkEngine;
use crate::error::TopkError;
use crate::metrics::ScanMetrics;
use crate::oracle::brute_force_topk;
use crate::tests::{fixture, random_dataset, skewed_dataset};
use crate::types::{Query, TupleId};
use crate::verify::{cross_validate, result_hash};

fn small_config(partitioning: PartitionStrategy) -> EngineConfig {
    EngineConfig { block_capacity: 8, partitioning, threads: 3, ..Default::default() }
}

#[test]
fn test_fixture_top_two() {
    for partitioning in [
        PartitionStrategy::Polar { splits: 2 },
        PartitionStrategy::Random { partitions: 1 },
        PartitionStrategy::Random { partitions: 3 },
    ] {
        let engine = TopkEngine::build(fixture(), small_config(partitioning)).unwrap();
        for kind in ExecutionKind::ALL {
            let result = engine.query_with(kind, &Query::uniform(2, 2)).unwrap();

            assert_eq!(result.ids(), vec![TupleId(3), TupleId(7)]);
            assert!((result.candidates[0].score - 1.6).abs() < 1e-6);
            assert!((result.candidates[1].score - 1.4).abs() < 1e-6);
            assert_eq!(result.threshold, result.candidates[1].score);
        }
    }
}

#[test]
fn test_k_one_is_global_max() {
    let data = random_dataset(3000, 3, 51);
    let expected = brute_force_topk(&data, &Query::uniform(1, 3));
    let engine = TopkEngine::build(data, EngineConfig::default()).unwrap();

    let result = engine.query(&Query::uniform(1, 3)).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.candidates[0].score, expected[0].score);
}

#[test]
fn test_k_at_least_n_returns_everything_sorted() {
    let engine = TopkEngine::build(fixture(), small_config(PartitionStrategy::default())).unwrap();

    for kind in ExecutionKind::ALL {
        let result = engine.query_with(kind, &Query::uniform(20, 2)).unwrap();
        assert_eq!(result.len(), 8);
        assert!(result.candidates.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_query_validation() {
    let engine = TopkEngine::build(fixture(), small_config(PartitionStrategy::default())).unwrap();

    let invalid = [
        Query::new(0, vec![0], vec![1.0]),
        Query::new(1, vec![], vec![]),
        Query::new(1, vec![0, 1, 0], vec![1.0, 1.0, 1.0]),
        Query::new(1, vec![2], vec![1.0]),
        Query::new(1, vec![1, 1], vec![1.0, 1.0]),
        Query::new(1, vec![0, 1], vec![1.0]),
        Query::new(1, vec![0], vec![-1.0]),
        Query::new(1, vec![0], vec![f32::NAN]),
    ];
    for query in invalid {
        assert!(matches!(engine.query(&query), Err(TopkError::InvalidQuery(_))), "{:?}", query);
    }

    let too_wide = Query::trailing(1, 2, 3);
    assert_eq!(too_wide.qq(), 3);
    assert!(matches!(engine.query(&too_wide), Err(TopkError::InvalidQuery(_))));

    let err = engine.query(&Query::uniform(MAX_K + 1, 2)).unwrap_err();
    assert_eq!(err, TopkError::KTooLarge { k: MAX_K + 1, max: MAX_K });
    assert!(engine.query(&Query::uniform(MAX_K, 2)).is_ok());
}

#[test]
fn test_config_validation() {
    let bad_capacity = EngineConfig { block_capacity: 12, ..Default::default() };
    assert!(matches!(TopkEngine::build(fixture(), bad_capacity), Err(TopkError::InvalidConfig(_))));

    let bad_random = small_config(PartitionStrategy::Random { partitions: 0 });
    assert!(matches!(TopkEngine::build(fixture(), bad_random), Err(TopkError::InvalidConfig(_))));

    let bad_tolerance = EngineConfig { validation_tolerance: f64::NAN, ..Default::default() };
    assert!(bad_tolerance.validate().is_err());
}

#[test]
fn test_multi_block_early_termination() {
    let config = small_config(PartitionStrategy::Random { partitions: 1 });
    let engine = TopkEngine::build(skewed_dataset(), config).unwrap();
    assert_eq!(engine.layout_stats().blocks, 8);

    for kind in [ExecutionKind::Scalar, ExecutionKind::Simd] {
        let metrics = ScanMetrics::new();
        let result = engine.query_with_metrics(kind, &Query::uniform(2, 2), &metrics).unwrap();
        assert_eq!(result.ids(), vec![TupleId(0), TupleId(1)]);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.blocks_scanned, 1);
        assert_eq!(snapshot.tuples_scanned, 8);
        assert_eq!(snapshot.partitions_terminated_early, 1);
    }
}

#[test]
fn test_validation_mode_passes() {
    let config = EngineConfig { validate: true, block_capacity: 64, ..Default::default() };
    let engine = TopkEngine::build(random_dataset(2000, 4, 52), config).unwrap();

    for kind in ExecutionKind::ALL {
        for k in [1, 16, 17, 200] {
            let query = Query::new(k, vec![0, 2, 3], vec![0.3, 1.0, 0.6]);
            assert!(engine.query_with(kind, &query).is_ok());
        }
    }
}

#[test]
fn test_validation_hook_reports_mismatch() {
    let config = EngineConfig { validate: true, validation_tolerance: 0.0, block_capacity: 64, ..Default::default() };
    let engine = TopkEngine::build(random_dataset(1200, 3, 58), config).unwrap();
    let query = Query::uniform(10, 3);

    // Zero tolerance still passes: every execution scores bit-identically to brute force.
    for kind in ExecutionKind::ALL {
        let metrics = ScanMetrics::new();
        let result = engine.query_with_metrics(kind, &query, &metrics).unwrap();
        assert_eq!(result.len(), 10);
        assert!(metrics.snapshot().tuples_scanned > 0);
    }

    let expected = brute_force_topk(engine.dataset(), &query);
    let mut found = engine.query_with(ExecutionKind::Threaded, &query).unwrap().candidates;
    found[4].score -= 0.01;

    let err = cross_validate("threaded", &expected, &found, engine.config().validation_tolerance).unwrap_err();
    match err {
        TopkError::ValidationMismatch { execution, rank, expected: want, found: got, .. } => {
            assert_eq!(execution, "threaded");
            assert_eq!(rank, 4);
            assert!(want > got);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_shared_heap_merge_agrees() {
    let data = random_dataset(1500, 3, 53);
    let tournament = TopkEngine::build(data.clone(), EngineConfig::default()).unwrap();
    let shared = TopkEngine::build(
        data,
        EngineConfig { merge: MergeStrategy::SharedHeap, ..Default::default() },
    )
    .unwrap();

    let query = Query::uniform(30, 3);
    assert_eq!(
        tournament.query(&query).unwrap().scores(),
        shared.query(&query).unwrap().scores()
    );
}

#[test]
fn test_repeated_queries_are_identical() {
    let engine = TopkEngine::build(random_dataset(2500, 3, 54), EngineConfig::default()).unwrap();
    let query = Query::trailing(25, 3, 2);

    let first = engine.query(&query).unwrap();
    for _ in 0..3 {
        let again = engine.query(&query).unwrap();
        assert_eq!(result_hash(&first.candidates), result_hash(&again.candidates));
    }
}

#[test]
fn test_build_is_deterministic() {
    let a = TopkEngine::build(random_dataset(1000, 3, 55), EngineConfig::default()).unwrap();
    let b = TopkEngine::build(random_dataset(1000, 3, 55), EngineConfig::default()).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_rebuild() {
    let mut engine = TopkEngine::build(fixture(), small_config(PartitionStrategy::default())).unwrap();
    engine.rebuild(random_dataset(100, 3, 56)).unwrap();
    assert_eq!(engine.dataset().len(), 100);
    assert_eq!(engine.dataset().dims(), 3);

    // 2^39 partitions do not fit; the old layout stays.
    let err = engine.rebuild(random_dataset(1, 40, 57)).unwrap_err();
    assert!(matches!(err, TopkError::InvalidConfig(_)));
    assert_eq!(engine.dataset().dims(), 3);
}

#[test]
fn test_engine_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TopkEngine>();
}
