// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::MergeStrategy;
use crate::merge::network::{bitonic_sort, merge_bitonic, merge_pair, merge_small};
use crate::merge::{merge_topk, shared_heap, tournament};
use crate::metrics::ScanMetrics;
use crate::types::{sort_best_first, Candidate, TupleId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `len` distinct ids starting at `first`, scores drawn from a small set so ties occur.
fn random_list(rng: &mut StdRng, first: u32, len: usize) -> Vec<Candidate> {
    let mut list: Vec<Candidate> = (0..len)
        .map(|i| Candidate::new(TupleId(first + i as u32), rng.gen_range(0..20) as f32 / 4.0))
        .collect();
    sort_best_first(&mut list);
    list
}

fn reference(lists: &[Vec<Candidate>], k: usize) -> Vec<Candidate> {
    let mut all: Vec<Candidate> = lists.iter().flatten().copied().collect();
    sort_best_first(&mut all);
    all.truncate(k);
    all
}

fn ids(list: &[Candidate]) -> Vec<u32> {
    list.iter().map(|c| c.id.0).collect()
}

#[test]
fn test_bitonic_sort_matches_sort() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut buf = [Candidate::SENTINEL; 32];
    let list = random_list(&mut rng, 0, 27);
    buf[..27].copy_from_slice(&list);
    buf.reverse();

    bitonic_sort(&mut buf);
    assert_eq!(ids(&buf[..27]), ids(&list));
    assert!(buf[27..].iter().all(|c| c.is_sentinel()));
}

#[test]
fn test_small_network_merge() {
    let mut rng = StdRng::seed_from_u64(32);
    for k in [1, 2, 7, 16] {
        let a = random_list(&mut rng, 0, k);
        let b = random_list(&mut rng, 100, k.saturating_sub(1));
        let merged = merge_small(&a, &b, k);
        assert_eq!(ids(&merged), ids(&reference(&[a, b], k)));
    }
}

#[test]
fn test_bitonic_merge_sizes() {
    let mut rng = StdRng::seed_from_u64(33);
    for k in [17, 31, 64, 100, 256] {
        let a = random_list(&mut rng, 0, k);
        let b = random_list(&mut rng, 1000, k / 3);
        let merged = merge_bitonic(&a, &b, k);
        assert_eq!(merged.len(), k);
        assert_eq!(ids(&merged), ids(&reference(&[a, b], k)));
    }
}

#[test]
fn test_merge_pair_short_lists() {
    let a = vec![Candidate::new(TupleId(4), 2.0)];
    let b: Vec<Candidate> = Vec::new();

    assert_eq!(ids(&merge_pair(&a, &b, 10)), vec![4]);
    assert_eq!(ids(&merge_pair(&a, &b, 100)), vec![4]);
    assert!(merge_pair(&b, &b, 5).is_empty());
}

#[test]
fn test_merge_prefers_smaller_id_on_tie() {
    let a = vec![Candidate::new(TupleId(9), 1.0), Candidate::new(TupleId(10), 1.0)];
    let b = vec![Candidate::new(TupleId(3), 1.0)];

    assert_eq!(ids(&merge_pair(&a, &b, 2)), vec![3, 9]);
    assert_eq!(ids(&merge_pair(&a, &b, 40)), vec![3, 9, 10]);
}

#[test]
fn test_tournament_matches_shared_heap() {
    let mut rng = StdRng::seed_from_u64(34);
    for k in [1, 5, 16, 40, 256] {
        let lists: Vec<Vec<Candidate>> = (0..7u32)
            .map(|p| {
                let len = rng.gen_range(0..=k);
                random_list(&mut rng, p * 1000, len)
            })
            .collect();
        let expected = reference(&lists, k);

        assert_eq!(ids(&tournament(lists.clone(), k)), ids(&expected));
        assert_eq!(ids(&shared_heap(lists.clone(), k)), ids(&expected));

        let mut reversed = lists.clone();
        reversed.reverse();
        assert_eq!(ids(&tournament(reversed, k)), ids(&expected));
    }
}

#[test]
fn test_tournament_single_and_empty() {
    assert!(tournament(Vec::new(), 3).is_empty());
    assert!(tournament(vec![Vec::new(), Vec::new()], 3).is_empty());

    let only = vec![Candidate::new(TupleId(1), 3.0), Candidate::new(TupleId(2), 2.0)];
    assert_eq!(ids(&tournament(vec![Vec::new(), only], 1)), vec![1]);
}

#[test]
fn test_merge_topk_counts_candidates() {
    let metrics = ScanMetrics::new();
    let lists = vec![
        vec![Candidate::new(TupleId(0), 1.0)],
        vec![Candidate::new(TupleId(1), 2.0), Candidate::new(TupleId(2), 0.5)],
    ];

    let merged = merge_topk(lists, 2, MergeStrategy::Tournament, &metrics);
    assert_eq!(ids(&merged), vec![1, 0]);
    assert_eq!(metrics.snapshot().candidates_merged, 3);
}
