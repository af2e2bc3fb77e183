//! Feature Matrix Builder
//!
//! Standardizes a batch of feature vectors column by column (z-scores) so
//! that features measured in different units contribute comparably to
//! cosine similarity.

use crate::features::{FeatureVector, FEATURE_COUNT};
use dugout_core::{Error, PlayerId, Result, Vector};
use serde::{Deserialize, Serialize};

/// Standard deviations at or below this are treated as zero
pub const STDEV_EPSILON: f64 = 1e-9;

/// Mean and standard deviation of one feature column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

impl ColumnStats {
    /// Population statistics (N denominator) of a column
    ///
    /// Uses Welford's running update so a column of huge finite values
    /// cannot overflow the mean. A variance that still overflows leaves a
    /// non-finite std, which [`is_degenerate`](Self::is_degenerate) catches.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { mean: 0.0, std: 0.0 };
        }
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for (i, value) in values.iter().enumerate() {
            let delta = value - mean;
            mean += delta / (i + 1) as f64;
            m2 += delta * (value - mean);
        }
        Self {
            mean,
            std: (m2 / values.len() as f64).sqrt(),
        }
    }

    /// True when the column carries no usable variation across the batch
    pub fn is_degenerate(&self) -> bool {
        !self.mean.is_finite() || !self.std.is_finite() || self.std <= STDEV_EPSILON
    }

    /// z-score of a value; 0.0 for degenerate columns or non-finite results
    pub fn zscore(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let z = (value - self.mean) / self.std;
        if z.is_finite() {
            z
        } else {
            0.0
        }
    }
}

/// Per-column scaler fitted on a training batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scaler {
    columns: [ColumnStats; FEATURE_COUNT],
}

impl Scaler {
    /// Fit column statistics on a batch
    pub fn fit(vectors: &[FeatureVector]) -> Self {
        let rows: Vec<[f64; FEATURE_COUNT]> = vectors.iter().map(FeatureVector::to_array).collect();
        let columns = std::array::from_fn(|col| {
            let values: Vec<f64> = rows.iter().map(|row| row[col]).collect();
            ColumnStats::compute(&values)
        });
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnStats; FEATURE_COUNT] {
        &self.columns
    }

    /// Standardize one vector with the fitted statistics
    pub fn transform(&self, vector: &FeatureVector) -> Vector {
        let values = vector.to_array();
        Vector::new(
            values
                .iter()
                .zip(self.columns.iter())
                .map(|(value, stats)| stats.zscore(*value))
                .collect(),
        )
    }
}

/// Standardized feature rows with their player ids
///
/// Row order is the order of the training batch and is the index used by
/// every downstream lookup.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    ids: Vec<PlayerId>,
    rows: Vec<Vector>,
    scaler: Scaler,
}

impl FeatureMatrix {
    /// Fit a scaler on `vectors` and standardize every row
    pub fn build(ids: Vec<PlayerId>, vectors: &[FeatureVector]) -> Result<Self> {
        if ids.len() != vectors.len() {
            return Err(Error::InvalidDimension {
                expected: ids.len(),
                actual: vectors.len(),
            });
        }
        if vectors.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let scaler = Scaler::fit(vectors);
        let rows = vectors.iter().map(|v| scaler.transform(v)).collect();

        Ok(Self { ids, rows, scaler })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    pub fn rows(&self) -> &[Vector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Vector> {
        self.rows.get(index)
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_with(height_cm: f64, home_runs: f64) -> FeatureVector {
        FeatureVector {
            height_cm,
            home_runs,
            ..FeatureVector::default()
        }
    }

    #[test]
    fn test_column_stats() {
        let stats = ColumnStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std - 2.0).abs() < 1e-12);
        assert!((stats.zscore(9.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_column_is_zero() {
        let stats = ColumnStats::compute(&[187.96, 187.96, 187.96]);
        assert!(stats.is_degenerate());
        assert_eq!(stats.zscore(187.96), 0.0);
        assert_eq!(stats.zscore(250.0), 0.0);
    }

    #[test]
    fn test_standardized_columns_have_zero_mean_unit_variance() {
        let vectors = vec![
            vector_with(180.0, 10.0),
            vector_with(190.0, 30.0),
            vector_with(200.0, 50.0),
            vector_with(185.0, 5.0),
        ];
        let matrix = FeatureMatrix::build(vec![1, 2, 3, 4], &vectors).unwrap();

        for feature in [crate::Feature::HeightCm, crate::Feature::HomeRuns] {
            let column: Vec<f64> = matrix.rows().iter().map(|r| r.as_slice()[feature.index()]).collect();
            let stats = ColumnStats::compute(&column);
            assert!(stats.mean.abs() < 1e-9);
            assert!((stats.std - 1.0).abs() < 1e-9);
        }

        // Columns that never vary stay at zero
        for row in matrix.rows() {
            assert_eq!(row.as_slice()[crate::Feature::Era.index()], 0.0);
        }
    }

    #[test]
    fn test_huge_values_do_not_poison_stats() {
        let stats = ColumnStats::compute(&[1.7e308, 1.7e308, 182.88]);
        assert!(stats.mean.is_finite());
        assert!(stats.is_degenerate());
        assert_eq!(stats.zscore(1.7e308), 0.0);
        assert_eq!(stats.zscore(182.88), 0.0);

        let stats = ColumnStats::compute(&[1.0e308, 1.0e308]);
        assert!((stats.mean - 1.0e308).abs() / 1.0e308 < 1e-12);
        assert!(stats.is_degenerate());
    }

    #[test]
    fn test_huge_column_standardizes_to_zero() {
        let vectors = vec![
            vector_with(1.7e308, 10.0),
            vector_with(1.7e308, 30.0),
            vector_with(182.88, 50.0),
        ];
        let matrix = FeatureMatrix::build(vec![1, 2, 3], &vectors).unwrap();
        for row in matrix.rows() {
            assert!(row.as_slice().iter().all(|v| v.is_finite()));
            assert_eq!(row.as_slice()[crate::Feature::HeightCm.index()], 0.0);
        }
        // Other columns still standardize normally
        assert!(matrix.row(0).unwrap().as_slice()[crate::Feature::HomeRuns.index()] < 0.0);
    }

    #[test]
    fn test_single_row_is_all_zero() {
        let matrix = FeatureMatrix::build(vec![7], &[vector_with(190.0, 40.0)]).unwrap();
        assert_eq!(matrix.len(), 1);
        assert!(matrix.row(0).unwrap().as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_row_order_preserved() {
        let vectors = vec![vector_with(180.0, 1.0), vector_with(200.0, 2.0)];
        let matrix = FeatureMatrix::build(vec![42, 7], &vectors).unwrap();
        assert_eq!(matrix.ids(), &[42, 7]);
        assert!(matrix.row(0).unwrap().as_slice()[1] < 0.0);
        assert!(matrix.row(1).unwrap().as_slice()[1] > 0.0);
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(FeatureMatrix::build(vec![], &[]), Err(Error::EmptyBatch)));
        assert!(matches!(
            FeatureMatrix::build(vec![1, 2], &[FeatureVector::default()]),
            Err(Error::InvalidDimension { expected: 2, actual: 1 })
        ));
    }
}
