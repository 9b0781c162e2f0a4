// Copyright @yucwang 2026

use super::constants::{ Float, ONE_MINUS_EPSILON };

/// Piecewise-constant distribution over a finite set of entries, stored as
/// a cumulative table. Append entries, call `normalize` once, then sample.
#[derive(Debug, Clone)]
pub struct DiscretePDF {
    cdf: Vec<Float>,
    sum: Float,
    normalization: Float,
    normalized: bool,
}

impl Default for DiscretePDF {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DiscretePDF {
    pub fn new(n_entries: usize) -> Self {
        let mut cdf = Vec::with_capacity(n_entries + 1);
        cdf.push(0.0);
        Self { cdf, sum: 0.0, normalization: 0.0, normalized: false }
    }

    pub fn clear(&mut self) {
        self.cdf.clear();
        self.cdf.push(0.0);
        self.sum = 0.0;
        self.normalization = 0.0;
        self.normalized = false;
    }

    pub fn append(&mut self, value: Float) {
        let last = self.cdf[self.cdf.len() - 1];
        self.cdf.push(last + value.max(0.0));
    }

    pub fn size(&self) -> usize {
        self.cdf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Probability mass of one entry (after normalization).
    pub fn get(&self, idx: usize) -> Float {
        self.cdf[idx + 1] - self.cdf[idx]
    }

    /// Sum of the entries before normalization.
    pub fn sum(&self) -> Float {
        self.sum
    }

    /// Reciprocal of `sum()`, zero for an empty or all-zero table.
    pub fn normalization(&self) -> Float {
        self.normalization
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Scales the table to unit mass and returns the original sum.
    pub fn normalize(&mut self) -> Float {
        self.sum = self.cdf[self.cdf.len() - 1];
        if self.sum > 0.0 {
            self.normalization = 1.0 / self.sum;
            for value in self.cdf.iter_mut() {
                *value *= self.normalization;
            }
            let last = self.cdf.len() - 1;
            self.cdf[last] = 1.0;
            self.normalized = true;
        } else {
            self.normalization = 0.0;
        }
        self.sum
    }

    pub fn sample(&self, u: Float) -> usize {
        let upper = self.cdf.partition_point(|&c| c <= u);
        let last = self.size().saturating_sub(1);
        upper.saturating_sub(1).min(last)
    }

    pub fn sample_with_pdf(&self, u: Float) -> (usize, Float) {
        let idx = self.sample(u);
        (idx, self.get(idx))
    }

    /// Samples an entry and hands back `u` rescaled into the chosen
    /// entry's interval, so the same variate can drive a second decision.
    pub fn sample_reuse(&self, u: Float) -> (usize, Float) {
        let idx = self.sample(u);
        let width = self.get(idx);
        let rescaled = if width > 0.0 {
            (u - self.cdf[idx]) / width
        } else {
            0.0
        };
        (idx, rescaled.clamp(0.0, ONE_MINUS_EPSILON))
    }
}
