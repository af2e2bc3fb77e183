//! Similarity engine
//!
//! Trains on a batch of player records and answers top-K "similar players"
//! queries. A trained model is an immutable [`ModelSnapshot`]; retraining
//! builds a new snapshot and swaps it in whole, so a reader never sees a
//! similarity matrix paired with another batch's id order.

use crate::encoder::FeatureEncoder;
use crate::explain::{generate_reason, Recommendation};
use crate::features::FeatureVector;
use crate::matrix::FeatureMatrix;
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Duration, Utc};
use dugout_core::{Error, PlayerId, PlayerRecord, Result, Vector};
use parking_lot::RwLock;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default model age after which callers should retrain
pub const DEFAULT_MAX_MODEL_AGE_SECS: i64 = 3600;

/// All-pairs cosine similarity over standardized rows
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute the full matrix
    ///
    /// Only the upper triangle is computed and mirrored, so the result is
    /// exactly symmetric. Zero rows (and rows with a non-finite norm) score
    /// 0.0 against everything including themselves; every other row has
    /// exactly 1.0 on the diagonal. Entries are always finite.
    pub fn compute(features: &FeatureMatrix) -> Self {
        let rows = features.rows();
        let n = rows.len();
        let norms: Vec<f64> = rows.iter().map(Vector::norm).collect();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            if !usable_norm(norms[i]) {
                continue;
            }
            data[i * n + i] = 1.0;
            for j in (i + 1)..n {
                if !usable_norm(norms[j]) {
                    continue;
                }
                let sim = rows[i].dot(&rows[j]) / (norms[i] * norms[j]);
                let sim = if sim.is_finite() { sim } else { 0.0 };
                data[i * n + j] = sim;
                data[j * n + i] = sim;
            }
        }

        Self { n, data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

fn usable_norm(norm: f64) -> bool {
    norm.is_finite() && norm > f64::EPSILON
}

/// A fitted model: ids, features, scaler and similarity matrix together
#[derive(Debug)]
pub struct ModelSnapshot {
    features: FeatureMatrix,
    raw: Vec<FeatureVector>,
    index: AHashMap<PlayerId, usize>,
    similarity: SimilarityMatrix,
    trained_at: DateTime<Utc>,
}

impl ModelSnapshot {
    /// Standardize `raw` and compute the similarity matrix
    ///
    /// When an id appears more than once, lookups resolve to its first row.
    pub fn fit(ids: Vec<PlayerId>, raw: Vec<FeatureVector>, trained_at: DateTime<Utc>) -> Result<Self> {
        let features = FeatureMatrix::build(ids, &raw)?;
        let similarity = SimilarityMatrix::compute(&features);

        let mut index = AHashMap::with_capacity(features.len());
        for (row, id) in features.ids().iter().enumerate() {
            index.entry(*id).or_insert(row);
        }

        Ok(Self {
            features,
            raw,
            index,
            similarity,
            trained_at,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of players any single target is compared against
    pub fn candidates_count(&self) -> usize {
        self.index.len().saturating_sub(1)
    }

    pub fn ids(&self) -> &[PlayerId] {
        self.features.ids()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    /// Unstandardized features of a player
    pub fn raw_features(&self, id: PlayerId) -> Option<&FeatureVector> {
        self.index_of(id).and_then(|row| self.raw.get(row))
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Top-K players most similar to `target_id`
    ///
    /// Unknown ids yield an empty list. The target itself is never returned
    /// and no id appears twice. Ties keep batch order.
    pub fn recommend(&self, target_id: PlayerId, top_k: usize) -> Vec<Recommendation> {
        let Some(target_row) = self.index_of(target_id) else {
            debug!("Player {} not in model, no recommendations", target_id);
            return Vec::new();
        };

        let scores = self.similarity.row(target_row);
        let ids = self.features.ids();
        let rows = self.features.rows();

        // Only the first row of each id is a candidate
        let mut order: Vec<usize> = (0..self.len())
            .filter(|&i| ids[i] != target_id && self.index_of(ids[i]) == Some(i))
            .collect();
        // Stable sort keeps batch order for equal scores
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

        order
            .into_iter()
            .take(top_k)
            .map(|i| {
                let reason = generate_reason(&rows[target_row], &rows[i]);
                Recommendation::new(ids[i], scores[i], reason)
            })
            .collect()
    }
}

/// Outcome of a training call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrainSummary {
    /// Records that made it into the model
    pub trained: usize,
    /// Records dropped because they had no id or repeated an earlier id
    pub skipped: usize,
    pub trained_at: DateTime<Utc>,
}

/// Player recommendation engine
///
/// Untrained until the first successful [`train`](Self::train). Safe to
/// share across threads: queries take a cheap read lock to clone the
/// current snapshot, and training only holds the write lock for the swap.
pub struct RecommendationEngine {
    encoder: FeatureEncoder,
    model: RwLock<Option<Arc<ModelSnapshot>>>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(FeatureEncoder::new())
    }
}

impl RecommendationEngine {
    pub fn new(encoder: FeatureEncoder) -> Self {
        Self {
            encoder,
            model: RwLock::new(None),
        }
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Rebuild the model from a full batch
    ///
    /// Records without an id, and later records repeating an id already in
    /// the batch, are skipped. If nothing usable remains the call fails with
    /// [`Error::EmptyBatch`] and the previous model stays.
    pub fn train(&self, batch: &[PlayerRecord]) -> Result<TrainSummary> {
        info!("Training player recommendation model on {} records", batch.len());

        let mut ids = Vec::with_capacity(batch.len());
        let mut vectors = Vec::with_capacity(batch.len());
        let mut seen = AHashSet::with_capacity(batch.len());
        let mut skipped = 0;

        for (position, record) in batch.iter().enumerate() {
            match record.id {
                Some(id) if !seen.insert(id) => {
                    warn!("Skipping duplicate player id {} at position {}", id, position);
                    skipped += 1;
                }
                Some(id) => {
                    ids.push(id);
                    vectors.push(self.encoder.encode(record));
                }
                None => {
                    warn!("Skipping player record at position {} without id", position);
                    skipped += 1;
                }
            }
        }

        if ids.is_empty() {
            warn!("No usable player records in training batch, keeping previous model");
            return Err(Error::EmptyBatch);
        }

        let snapshot = ModelSnapshot::fit(ids, vectors, Utc::now())?;
        let summary = TrainSummary {
            trained: snapshot.len(),
            skipped,
            trained_at: snapshot.trained_at(),
        };

        *self.model.write() = Some(Arc::new(snapshot));

        info!(
            "Recommendation model trained with {} players ({} skipped)",
            summary.trained, summary.skipped
        );
        Ok(summary)
    }

    /// Current model, if trained
    pub fn snapshot(&self) -> Option<Arc<ModelSnapshot>> {
        self.model.read().clone()
    }

    pub fn is_trained(&self) -> bool {
        self.model.read().is_some()
    }

    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.model.read().as_ref().map(|m| m.trained_at())
    }

    /// Top-K similar players, or [`Error::NotTrained`] before the first training
    pub fn try_recommend(&self, target_id: PlayerId, top_k: usize) -> Result<Vec<Recommendation>> {
        let snapshot = self.snapshot().ok_or(Error::NotTrained)?;
        Ok(snapshot.recommend(target_id, top_k))
    }

    /// Top-K similar players; logs and returns an empty list when untrained
    pub fn recommend(&self, target_id: PlayerId, top_k: usize) -> Vec<Recommendation> {
        match self.try_recommend(target_id, top_k) {
            Ok(recommendations) => recommendations,
            Err(e) => {
                warn!("Cannot recommend players similar to {}: {}", target_id, e);
                Vec::new()
            }
        }
    }

    /// Whether the model is missing or older than `max_age`
    pub fn needs_retrain(&self, max_age: Duration) -> bool {
        self.needs_retrain_at(max_age, Utc::now())
    }

    /// [`needs_retrain`](Self::needs_retrain) against an explicit clock
    pub fn needs_retrain_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match self.trained_at() {
            None => true,
            Some(trained_at) => now - trained_at > max_age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncoderBuilder;
    use chrono::NaiveDate;
    use dugout_core::PlayerStats;

    fn test_engine() -> RecommendationEngine {
        let encoder = EncoderBuilder::new()
            .reference_date(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
            .build();
        RecommendationEngine::new(encoder)
    }

    fn player(id: PlayerId, position: &str, height: &str, hr: f64, avg: f64) -> PlayerRecord {
        PlayerRecord::new(id)
            .with_position(position)
            .with_height(height)
            .with_weight("200 lbs")
            .with_birth_date("1995-06-15")
            .with_bat_side("R")
            .with_stats(PlayerStats::from_numbers(avg, hr, 80.0, 4.0, 100.0))
    }

    fn roster() -> Vec<PlayerRecord> {
        vec![
            player(1, "SS", "6'0\"", 20.0, 0.280),
            player(2, "SS", "6'1\"", 22.0, 0.285),
            player(3, "P", "6'5\"", 0.0, 0.120),
            player(4, "RF", "6'3\"", 40.0, 0.260),
            player(5, "CF", "6'2\"", 12.0, 0.240),
        ]
    }

    #[test]
    fn test_untrained_engine() {
        let engine = test_engine();
        assert!(!engine.is_trained());
        assert!(engine.trained_at().is_none());
        assert!(matches!(engine.try_recommend(1, 3), Err(Error::NotTrained)));
        assert!(engine.recommend(1, 3).is_empty());
        assert!(engine.needs_retrain(Duration::seconds(DEFAULT_MAX_MODEL_AGE_SECS)));
    }

    #[test]
    fn test_similarity_matrix_properties() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        let snapshot = engine.snapshot().unwrap();
        let sim = snapshot.similarity();

        assert_eq!(sim.len(), 5);
        for i in 0..sim.len() {
            assert_eq!(sim.get(i, i), 1.0);
            for j in 0..sim.len() {
                assert_eq!(sim.get(i, j), sim.get(j, i));
                assert!(sim.get(i, j) <= 1.0 + 1e-9 && sim.get(i, j) >= -1.0 - 1e-9);
            }
        }
    }

    #[test]
    fn test_recommend_excludes_target_and_sorts() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();

        let recs = engine.recommend(1, 10);
        assert_eq!(recs.len(), 4);
        assert!(recs.iter().all(|r| r.player_id != 1));
        for pair in recs.windows(2) {
            assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
        // The other shortstop is the closest match
        assert_eq!(recs[0].player_id, 2);
    }

    #[test]
    fn test_recommend_length_clamped() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        assert_eq!(engine.recommend(3, 2).len(), 2);
        assert_eq!(engine.recommend(3, 0).len(), 0);
        assert_eq!(engine.recommend(3, 100).len(), 4);
    }

    #[test]
    fn test_unknown_target_is_empty_not_error() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        assert!(engine.try_recommend(999, 5).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_batch_order() {
        // Three identical candidates tie with each other
        let engine = test_engine();
        let batch = vec![
            player(10, "SS", "6'0\"", 20.0, 0.280),
            player(11, "P", "6'4\"", 0.0, 0.100),
            player(12, "P", "6'4\"", 0.0, 0.100),
            player(13, "P", "6'4\"", 0.0, 0.100),
        ];
        engine.train(&batch).unwrap();
        let ids: Vec<PlayerId> = engine.recommend(10, 3).iter().map(|r| r.player_id).collect();
        assert_eq!(ids, vec![11, 12, 13]);
    }

    #[test]
    fn test_single_player_batch() {
        let engine = test_engine();
        engine.train(&[player(7, "C", "6'0\"", 10.0, 0.250)]).unwrap();
        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.similarity().len(), 1);
        assert_eq!(snapshot.similarity().get(0, 0), 0.0);
        assert!(engine.recommend(7, 5).is_empty());
    }

    #[test]
    fn test_records_without_id_skipped() {
        let engine = test_engine();
        let mut batch = roster();
        batch.push(PlayerRecord::default().with_name("No Id"));
        let summary = engine.train(&batch).unwrap();
        assert_eq!(summary.trained, 5);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_empty_batch_keeps_previous_model() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        let before = engine.trained_at();

        assert!(matches!(engine.train(&[]), Err(Error::EmptyBatch)));
        assert!(matches!(
            engine.train(&[PlayerRecord::default()]),
            Err(Error::EmptyBatch)
        ));
        assert_eq!(engine.trained_at(), before);
        assert_eq!(engine.recommend(1, 1).len(), 1);
    }

    #[test]
    fn test_retrain_replaces_snapshot() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        let old = engine.snapshot().unwrap();

        engine.train(&roster()[..2]).unwrap();
        let new = engine.snapshot().unwrap();

        // Readers holding the old snapshot keep a consistent view
        assert_eq!(old.len(), 5);
        assert_eq!(old.recommend(1, 10).len(), 4);
        assert_eq!(new.len(), 2);
        assert_eq!(engine.recommend(1, 10).len(), 1);
        assert!(!new.contains(5));
    }

    #[test]
    fn test_duplicate_ids_skipped_on_train() {
        let engine = test_engine();
        let batch = vec![
            player(1, "SS", "6'0\"", 20.0, 0.280),
            player(5, "CF", "6'2\"", 12.0, 0.240),
            player(5, "P", "6'5\"", 0.0, 0.120),
            player(1, "RF", "6'3\"", 40.0, 0.260),
        ];
        let summary = engine.train(&batch).unwrap();
        assert_eq!(summary.trained, 2);
        assert_eq!(summary.skipped, 2);

        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.ids(), &[1, 5]);
        assert_eq!(snapshot.candidates_count(), 1);
        // First occurrence wins
        assert_eq!(snapshot.raw_features(5).unwrap().position_code, 8.0);

        let result = engine.recommend(1, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].player_id, 5);
    }

    #[test]
    fn test_fitted_duplicates_never_repeat() {
        let encoder = test_engine().encoder().clone();
        let batch = roster();
        let mut ids: Vec<PlayerId> = batch.iter().filter_map(|r| r.id).collect();
        let mut raw: Vec<FeatureVector> = batch.iter().map(|r| encoder.encode(r)).collect();
        ids.extend([1, 2]);
        raw.extend([raw[0], raw[1]]);

        let snapshot = ModelSnapshot::fit(ids, raw, Utc::now()).unwrap();
        assert_eq!(snapshot.candidates_count(), 4);

        let result = snapshot.recommend(1, 10);
        let mut seen: Vec<PlayerId> = result.iter().map(|r| r.player_id).collect();
        assert_eq!(seen.len(), 4);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_huge_feature_value_keeps_scores_finite() {
        let engine = test_engine();
        let batch = vec![
            PlayerRecord::new(1).with_height(1.7e308),
            PlayerRecord::new(2).with_height(1.7e308).with_position("P"),
            PlayerRecord::new(3).with_height("6'0\"").with_position("SS"),
        ];
        engine.train(&batch).unwrap();

        let snapshot = engine.snapshot().unwrap();
        let matrix = snapshot.similarity();
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert!(matrix.get(i, j).is_finite(), "non-finite at {},{}", i, j);
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }

        let result = engine.recommend(1, 2);
        assert_eq!(result.len(), 2);
        for rec in &result {
            assert!((0.0..=1.0).contains(&rec.similarity_score));
        }
    }

    #[test]
    fn test_needs_retrain_at() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        let trained_at = engine.trained_at().unwrap();
        let max_age = Duration::seconds(DEFAULT_MAX_MODEL_AGE_SECS);

        assert!(!engine.needs_retrain_at(max_age, trained_at + Duration::seconds(60)));
        assert!(!engine.needs_retrain_at(max_age, trained_at + max_age));
        assert!(engine.needs_retrain_at(max_age, trained_at + max_age + Duration::seconds(1)));
    }

    #[test]
    fn test_raw_features_lookup() {
        let engine = test_engine();
        engine.train(&roster()).unwrap();
        let snapshot = engine.snapshot().unwrap();
        let raw = snapshot.raw_features(3).unwrap();
        assert_eq!(raw.position_code, 1.0);
        assert!(snapshot.raw_features(42).is_none());
    }
}
