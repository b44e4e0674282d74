// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Top-k query over a weighted subset of attributes.

use crate::config::MAX_K;
use crate::error::{Result, TopkError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub k: usize,
    /// Selected attribute indices, scored in this order.
    pub attributes: Vec<usize>,
    /// `weights[i]` applies to `attributes[i]`.
    pub weights: Vec<f32>,
}

impl Query {
    pub fn new(k: usize, attributes: Vec<usize>, weights: Vec<f32>) -> Self {
        Self { k, attributes, weights }
    }

    /// All `dims` attributes with weight 1.
    pub fn uniform(k: usize, dims: usize) -> Self {
        Self::new(k, (0..dims).collect(), vec![1.0; dims])
    }

    /// The last `qq` of `dims` attributes with weight 1.
    ///
    /// The query always selects `qq` attributes; with `qq > dims` it fails `validate`.
    pub fn trailing(k: usize, dims: usize, qq: usize) -> Self {
        let first = dims.saturating_sub(qq);
        Self::new(k, (first..first + qq).collect(), vec![1.0; qq])
    }

    pub fn qq(&self) -> usize {
        self.attributes.len()
    }

    /// Checks the query against a dataset of `dims` attributes.
    pub fn validate(&self, dims: usize) -> Result<()> {
        if self.k == 0 {
            return Err(TopkError::InvalidQuery("k must be at least 1".into()));
        }
        if self.k > MAX_K {
            return Err(TopkError::KTooLarge { k: self.k, max: MAX_K });
        }
        if self.attributes.is_empty() {
            return Err(TopkError::InvalidQuery("at least one attribute must be selected".into()));
        }
        if self.attributes.len() > dims {
            return Err(TopkError::InvalidQuery(format!(
                "{} attributes selected but the dataset has {}",
                self.attributes.len(),
                dims
            )));
        }
        if self.weights.len() != self.attributes.len() {
            return Err(TopkError::InvalidQuery(format!(
                "{} weights given for {} attributes",
                self.weights.len(),
                self.attributes.len()
            )));
        }
        let mut seen = vec![false; dims];
        for &attr in &self.attributes {
            if attr >= dims {
                return Err(TopkError::InvalidQuery(format!(
                    "attribute {} out of range for {} dimensions",
                    attr, dims
                )));
            }
            if seen[attr] {
                return Err(TopkError::InvalidQuery(format!("attribute {} selected twice", attr)));
            }
            seen[attr] = true;
        }
        if let Some(w) = self.weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(TopkError::InvalidQuery(format!(
                "weight {} must be finite and non-negative",
                w
            )));
        }
        Ok(())
    }

    /// Σ weight·value over the selected attributes of `values` (indexed by attribute).
    ///
    /// Accumulates in attribute order with a separate multiply and add, the
    /// same order every score kernel uses.
    #[inline]
    pub fn score_with(&self, value: impl Fn(usize) -> f32) -> f32 {
        let mut score = 0.0f32;
        for (&attr, &w) in self.attributes.iter().zip(self.weights.iter()) {
            score += w * value(attr);
        }
        score
    }
}
