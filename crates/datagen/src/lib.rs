// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Synthetic datasets for the top-k engine.
//!
//! Three classic distributions: independent attributes, attributes clustered
//! around the main diagonal (correlated), and attributes spread along the
//! hyperplane `sum = d / 2` (anti-correlated). Raw values are min-max
//! normalized per attribute before they become a `Dataset`.

use pta_kernel::{Dataset, TopkError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatagenError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Non-finite value {value} at tuple {tuple} attribute {attribute}")]
    NonFinite { tuple: usize, attribute: usize, value: f32 },

    #[error("Dataset rejected: {0}")]
    Dataset(#[from] TopkError),
}

pub type Result<T> = std::result::Result<T, DatagenError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Distribution {
    Correlated,
    #[default]
    Independent,
    Anticorrelated,
}

impl Distribution {
    pub const ALL: [Distribution; 3] =
        [Distribution::Correlated, Distribution::Independent, Distribution::Anticorrelated];

    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Correlated => "correlated",
            Distribution::Independent => "independent",
            Distribution::Anticorrelated => "anticorrelated",
        }
    }
}

impl std::str::FromStr for Distribution {
    type Err = DatagenError;

    fn from_str(s: &str) -> Result<Self> {
        Distribution::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DatagenError::InvalidShape(format!("unknown distribution '{}'", s)))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub n: usize,
    pub d: usize,
    pub distribution: Distribution,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { n: 1 << 16, d: 4, distribution: Distribution::default(), seed: 0 }
    }
}

/// Mean of `terms` uniforms: a bell-shaped value in [0, 1) centred on 0.5.
fn peaked(rng: &mut StdRng, terms: usize) -> f32 {
    (0..terms).map(|_| rng.gen::<f32>()).sum::<f32>() / terms as f32
}

/// Raw column-major values, before normalization.
pub fn generate_raw(config: &GeneratorConfig) -> Result<Vec<f32>> {
    let GeneratorConfig { n, d, distribution, seed } = *config;
    if n == 0 || d == 0 {
        return Err(DatagenError::InvalidShape(format!("n={} d={} must both be positive", n, d)));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns = vec![0.0f32; n * d];
    let mut row = vec![0.0f32; d];

    for i in 0..n {
        match distribution {
            Distribution::Independent => {
                for v in row.iter_mut() {
                    *v = rng.gen();
                }
            }
            Distribution::Correlated => {
                let base: f32 = rng.gen();
                for v in row.iter_mut() {
                    *v = base + 0.25 * (peaked(&mut rng, 4) - 0.5);
                }
            }
            Distribution::Anticorrelated => {
                let plane = peaked(&mut rng, 12);
                for v in row.iter_mut() {
                    *v = rng.gen();
                }
                let mean = row.iter().sum::<f32>() / d as f32;
                for v in row.iter_mut() {
                    *v = plane + (*v - mean);
                }
            }
        }
        for (m, &v) in row.iter().enumerate() {
            columns[m * n + i] = v;
        }
    }
    Ok(columns)
}

/// Min-max normalizes every column of a column-major matrix to [0, 1] in place.
///
/// A constant column becomes all zeros.
pub fn normalize_columns(n: usize, d: usize, columns: &mut [f32]) -> Result<()> {
    if n == 0 || d == 0 || columns.len() != n * d {
        return Err(DatagenError::InvalidShape(format!(
            "{} values cannot form {} columns of {}",
            columns.len(),
            d,
            n
        )));
    }
    if let Some(pos) = columns.iter().position(|v| !v.is_finite()) {
        return Err(DatagenError::NonFinite { tuple: pos % n, attribute: pos / n, value: columns[pos] });
    }

    for column in columns.chunks_exact_mut(n) {
        let (min, max) = column
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = max - min;
        for v in column.iter_mut() {
            *v = if range > 0.0 { ((*v - min) / range).clamp(0.0, 1.0) } else { 0.0 };
        }
    }
    Ok(())
}

/// Generates and normalizes a dataset.
pub fn generate(config: &GeneratorConfig) -> Result<Dataset> {
    let mut columns = generate_raw(config)?;
    normalize_columns(config.n, config.d, &mut columns)?;
    Ok(Dataset::from_columns(config.n, config.d, columns)?)
}

/// Pearson correlation of two attributes; used to check the generators.
pub fn attribute_correlation(dataset: &Dataset, a: usize, b: usize) -> f64 {
    let (x, y) = (dataset.column(a), dataset.column(b));
    let n = x.len() as f64;
    let mx = x.iter().map(|&v| v as f64).sum::<f64>() / n;
    let my = y.iter().map(|&v| v as f64).sum::<f64>() / n;
    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let (dx, dy) = (xi as f64 - mx, yi as f64 - my);
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        0.0
    } else {
        cov / (vx.sqrt() * vy.sqrt())
    }
}
