use pta_kernel::oracle::brute_force_topk;
use pta_kernel::{Dataset, EngineConfig, ExecutionKind, PartitionStrategy, Query, ScanMetrics, TopkEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn dataset(n: usize, d: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<f32> = (0..n * d).map(|_| rng.gen::<f32>()).collect();
    Dataset::from_rows(d, &rows).unwrap()
}

/// Tuples clustered along the diagonal, so a few tuples dominate most others.
fn correlated(n: usize, d: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n * d);
    for _ in 0..n {
        let base: f32 = rng.gen();
        for _ in 0..d {
            let jitter: f32 = rng.gen();
            rows.push(0.9 * base + 0.1 * jitter);
        }
    }
    Dataset::from_rows(d, &rows).unwrap()
}

fn scores(result: &[pta_kernel::Candidate]) -> Vec<f32> {
    result.iter().map(|c| c.score).collect()
}

#[test]
fn test_all_variants_match_brute_force() {
    let data = dataset(5000, 4, 101);
    let queries = [
        Query::uniform(1, 4),
        Query::new(10, vec![1, 3], vec![0.5, 2.0]),
        Query::trailing(64, 4, 3),
        Query::new(256, vec![0, 1, 2, 3], vec![0.1, 0.2, 0.3, 0.4]),
    ];

    for partitioning in [
        PartitionStrategy::Polar { splits: 2 },
        PartitionStrategy::Polar { splits: 3 },
        PartitionStrategy::Random { partitions: 1 },
        PartitionStrategy::Random { partitions: 13 },
    ] {
        let config = EngineConfig { block_capacity: 128, partitioning, threads: 4, ..Default::default() };
        let engine = TopkEngine::build(data.clone(), config).unwrap();

        for query in &queries {
            let expected = brute_force_topk(&data, query);
            for kind in ExecutionKind::ALL {
                let result = engine.query_with(kind, query).unwrap();
                assert_eq!(
                    scores(&result.candidates),
                    scores(&expected),
                    "{:?} {:?} k={}",
                    partitioning,
                    kind,
                    query.k
                );
            }
        }
    }
}

#[test]
fn test_partition_count_does_not_change_results() {
    let data = dataset(3000, 3, 102);
    let query = Query::new(40, vec![0, 2], vec![1.0, 0.7]);

    let single = TopkEngine::build(
        data.clone(),
        EngineConfig { partitioning: PartitionStrategy::Random { partitions: 1 }, ..Default::default() },
    )
    .unwrap();
    let reference = single.query(&query).unwrap();

    for partitioning in [
        PartitionStrategy::Random { partitions: 8 },
        PartitionStrategy::Polar { splits: 2 },
        PartitionStrategy::Polar { splits: 4 },
    ] {
        let engine = TopkEngine::build(data.clone(), EngineConfig { partitioning, ..Default::default() }).unwrap();
        assert_eq!(engine.query(&query).unwrap().scores(), reference.scores());
    }
}

#[test]
fn test_concurrent_queries_share_one_engine() {
    let data = dataset(4000, 3, 103);
    let engine = TopkEngine::build(data.clone(), EngineConfig::default()).unwrap();
    let metrics = ScanMetrics::new();

    std::thread::scope(|s| {
        for t in 0..4usize {
            let engine = &engine;
            let data = &data;
            let metrics = &metrics;
            s.spawn(move || {
                let query = Query::trailing(5 + t, 3, 1 + t % 3);
                let kind = ExecutionKind::ALL[t % 3];
                let result = engine.query_with_metrics(kind, &query, metrics).unwrap();
                assert_eq!(result.scores(), scores(&brute_force_topk(data, &query)));
            });
        }
    });

    assert!(metrics.snapshot().partitions_scanned > 0);
}

#[test]
fn test_correlated_data_terminates_early() {
    let data = correlated(20000, 3, 104);
    let config = EngineConfig { block_capacity: 256, ..Default::default() };
    let engine = TopkEngine::build(data.clone(), config).unwrap();
    let query = Query::uniform(10, 3);

    let metrics = ScanMetrics::new();
    let result = engine.query_with_metrics(ExecutionKind::Simd, &query, &metrics).unwrap();
    assert_eq!(result.scores(), scores(&brute_force_topk(&data, &query)));

    let snapshot = metrics.snapshot();
    assert!(snapshot.partitions_terminated_early > 0);
    assert!(snapshot.tuples_scanned < data.len() as u64);
    assert!(snapshot.scan_ratio(data.len()) < 1.0);
}

#[test]
fn test_k_larger_than_n_returns_all() {
    let data = dataset(37, 5, 105);
    let engine = TopkEngine::build(data, EngineConfig { block_capacity: 8, ..Default::default() }).unwrap();

    for kind in ExecutionKind::ALL {
        let result = engine.query_with(kind, &Query::uniform(100, 5)).unwrap();
        assert_eq!(result.len(), 37);
        let mut ids: Vec<u32> = result.ids().iter().map(|id| id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..37).collect::<Vec<u32>>());
    }
}
