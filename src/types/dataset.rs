// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Column-major tuple matrix with values normalized to [0, 1].

use crate::error::{Result, TopkError};
use crate::types::id::TupleId;

/// An immutable corpus of `n` tuples over `d` attributes.
///
/// Attribute `m` of every tuple lives in one contiguous column, columns stored
/// back to back: value `(i, m)` is at `m * n + i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    n: usize,
    d: usize,
    columns: Vec<f32>,
}

impl Dataset {
    /// Builds a dataset from column-major values (`d` columns of `n` values each).
    pub fn from_columns(n: usize, d: usize, columns: Vec<f32>) -> Result<Self> {
        if n == 0 || d == 0 {
            return Err(TopkError::InvalidDataset(format!(
                "dataset must have at least one tuple and one attribute (n={}, d={})",
                n, d
            )));
        }
        if n > u32::MAX as usize {
            return Err(TopkError::InvalidDataset(format!("{} tuples exceed the u32 id space", n)));
        }
        let expected = n.checked_mul(d).ok_or_else(|| {
            TopkError::InvalidDataset(format!("n={} x d={} overflows", n, d))
        })?;
        if columns.len() != expected {
            return Err(TopkError::InvalidDataset(format!(
                "expected {} values for {} tuples x {} attributes, found {}",
                expected,
                n,
                d,
                columns.len()
            )));
        }
        if let Some(pos) = columns.iter().position(|v| !(0.0..=1.0).contains(v)) {
            return Err(TopkError::InvalidDataset(format!(
                "value {} of tuple {} attribute {} is outside [0, 1]",
                columns[pos],
                pos % n,
                pos / n
            )));
        }
        Ok(Self { n, d, columns })
    }

    /// Builds a dataset from row-major tuples of width `d`.
    pub fn from_rows(d: usize, rows: &[f32]) -> Result<Self> {
        if d == 0 || rows.len() % d != 0 {
            return Err(TopkError::InvalidDataset(format!(
                "{} row-major values cannot be split into tuples of width {}",
                rows.len(),
                d
            )));
        }
        let n = rows.len() / d;
        let mut columns = vec![0.0f32; rows.len()];
        for (i, row) in rows.chunks_exact(d).enumerate() {
            for (m, &v) in row.iter().enumerate() {
                columns[m * n + i] = v;
            }
        }
        Self::from_columns(n, d, columns)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn dims(&self) -> usize {
        self.d
    }

    /// All values of attribute `attr`, indexed by tuple id.
    pub fn column(&self, attr: usize) -> &[f32] {
        &self.columns[attr * self.n..(attr + 1) * self.n]
    }

    pub fn value(&self, id: TupleId, attr: usize) -> f32 {
        self.columns[attr * self.n + id.index()]
    }

    /// Copies the attributes of one tuple out of the columns.
    pub fn row(&self, id: TupleId) -> Vec<f32> {
        (0..self.d).map(|m| self.value(id, m)).collect()
    }
}
