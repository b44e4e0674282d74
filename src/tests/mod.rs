pub mod scan_tests;
pub mod merge_tests;
pub mod engine_tests;

use crate::types::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The eight two-attribute tuples used across the tests.
pub const FIXTURE_ROWS: [f32; 16] = [
    0.9, 0.1, //
    0.1, 0.9, //
    0.5, 0.5, //
    0.8, 0.8, //
    0.2, 0.3, //
    0.95, 0.05, //
    0.4, 0.6, //
    0.7, 0.7, //
];

pub fn fixture() -> Dataset {
    Dataset::from_rows(2, &FIXTURE_ROWS).unwrap()
}

/// Uniform values in [0, 1), reproducible from `seed`.
pub fn random_dataset(n: usize, d: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns: Vec<f32> = (0..n * d).map(|_| rng.gen::<f32>()).collect();
    Dataset::from_columns(n, d, columns).unwrap()
}

/// Eight strong tuples followed by 56 weak ones, two attributes.
///
/// With a block capacity of 8 the strong tuples fill the first block and
/// every later block is bounded far below them.
pub fn skewed_dataset() -> Dataset {
    let mut rows = Vec::with_capacity(128);
    for i in 0..8 {
        let v = 0.95 - 0.01 * i as f32;
        rows.extend_from_slice(&[v, v]);
    }
    for j in 0..56 {
        let v = 0.05 + 0.001 * j as f32;
        rows.extend_from_slice(&[v, v]);
    }
    Dataset::from_rows(2, &rows).unwrap()
}
