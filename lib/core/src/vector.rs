use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// A dense vector of feature values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self { data: vec![0.0; dim] }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Dot product; 0.0 when dimensions differ
    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        // Two accumulators for better pipelining
        let mut sum1 = 0.0;
        let mut sum2 = 0.0;
        let chunks = self.data.chunks_exact(2).zip(other.data.chunks_exact(2));
        for (a, b) in chunks {
            sum1 += a[0] * b[0];
            sum2 += a[1] * b[1];
        }
        if self.dim() % 2 == 1 {
            let last = self.dim() - 1;
            sum1 += self.data[last] * other.data[last];
        }
        sum1 + sum2
    }

    /// Euclidean norm
    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// True when the vector has no magnitude to compare against
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.norm() <= f64::EPSILON
    }

    /// Compute cosine similarity with another vector
    ///
    /// Zero-magnitude vectors have similarity 0.0 with everything,
    /// themselves included.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f64 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
            return 0.0;
        }

        self.dot(other) / (norm_a * norm_b)
    }
}

impl Sub for &Vector {
    type Output = Vector;

    fn sub(self, other: &Vector) -> Vector {
        assert_eq!(self.dim(), other.dim());
        Vector::new(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}
