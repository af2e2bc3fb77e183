//! Explainability for player recommendations
//!
//! Attaches a short human-readable reason to each recommendation and
//! provides the output structures handed to the presentation layer.
//!
//! The reason is a heuristic: it names the single feature on which the two
//! players are closest after standardization. It says nothing about which
//! feature actually drove the cosine score.

use crate::features::Feature;
use dugout_core::{PlayerId, Vector};
use serde::{Deserialize, Serialize};

/// Reason used when the closest feature has no dedicated wording
pub const GENERIC_REASON: &str = "overall similar profile";

/// Natural-language reason for a feature, if it has one
pub fn reason_for(feature: Feature) -> &'static str {
    match feature {
        Feature::PositionCode => "similar defensive position",
        Feature::HeightCm => "similar build",
        Feature::Age => "comparable age",
        Feature::Avg => "close batting average",
        Feature::HomeRuns => "similar power profile",
        _ => GENERIC_REASON,
    }
}

/// Feature with the smallest absolute difference between two rows
///
/// Ties resolve to the earliest feature in vector order. Both rows must use
/// the same representation (both standardized or both raw).
pub fn closest_feature(target: &Vector, candidate: &Vector) -> Option<Feature> {
    if target.dim() != candidate.dim() {
        return None;
    }
    let diff = target - candidate;
    let mut best: Option<(Feature, f64)> = None;
    for (feature, delta) in Feature::ALL.iter().zip(diff.as_slice()) {
        let delta = delta.abs();
        match best {
            Some((_, best_delta)) if delta >= best_delta => {}
            _ => best = Some((*feature, delta)),
        }
    }
    best.map(|(feature, _)| feature)
}

/// Reason string for recommending `candidate` to someone looking at `target`
pub fn generate_reason(target: &Vector, candidate: &Vector) -> &'static str {
    closest_feature(target, candidate)
        .map(reason_for)
        .unwrap_or(GENERIC_REASON)
}

/// How much weight a presentation layer should give a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ConfidenceLevel::High
        } else if score >= 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// A similar player with score and explanation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub player_id: PlayerId,
    /// Cosine similarity clamped to [0.0, 1.0]
    pub similarity_score: f64,
    pub reason: String,
    pub confidence: ConfidenceLevel,
}

impl Recommendation {
    /// Non-finite cosines score 0.0
    pub fn new(player_id: PlayerId, cosine: f64, reason: &str) -> Self {
        let similarity_score = if cosine.is_finite() {
            cosine.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            player_id,
            similarity_score,
            reason: reason.to_string(),
            confidence: ConfidenceLevel::from_score(similarity_score),
        }
    }
}

/// Summary statistics for a recommendation query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationStats {
    /// Number of other players the target was compared against
    pub candidates_count: usize,
    /// Number of recommendations returned
    pub results_count: usize,
    pub avg_score: f64,
    pub best_score: f64,
    /// Reason attached to the best recommendation
    pub top_reason: Option<String>,
}

impl RecommendationStats {
    /// Compute stats from ranked recommendations
    pub fn compute(results: &[Recommendation], candidates_count: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_reason: None,
            };
        }

        let avg_score =
            results.iter().map(|r| r.similarity_score).sum::<f64>() / results.len() as f64;

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score: results[0].similarity_score, // Results are sorted
            top_reason: Some(results[0].reason.clone()),
        }
    }
}

/// Response for a similar-players query
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub target_id: PlayerId,
    pub result: Vec<Recommendation>,
    pub stats: RecommendationStats,
}

impl RecommendationResponse {
    pub fn new(target_id: PlayerId, result: Vec<Recommendation>, candidates_count: usize) -> Self {
        let stats = RecommendationStats::compute(&result, candidates_count);
        Self {
            target_id,
            result,
            stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;

    fn row_with(feature: Feature, value: f64) -> Vector {
        let mut values = vec![5.0; FEATURE_COUNT];
        values[feature.index()] = value;
        Vector::new(values)
    }

    #[test]
    fn test_closest_feature() {
        // Every feature differs by 5.0 except age
        let target = Vector::new(vec![0.0; FEATURE_COUNT]);
        let candidate = row_with(Feature::Age, 0.1);
        assert_eq!(closest_feature(&target, &candidate), Some(Feature::Age));
        assert_eq!(generate_reason(&target, &candidate), "comparable age");
    }

    #[test]
    fn test_ties_pick_first_feature() {
        let a = Vector::new(vec![1.0; FEATURE_COUNT]);
        let b = Vector::new(vec![1.0; FEATURE_COUNT]);
        assert_eq!(closest_feature(&a, &b), Some(Feature::PositionCode));
        assert_eq!(generate_reason(&a, &b), "similar defensive position");
    }

    #[test]
    fn test_unmapped_feature_falls_back() {
        let target = Vector::new(vec![0.0; FEATURE_COUNT]);
        let candidate = row_with(Feature::Era, 0.0);
        assert_eq!(closest_feature(&target, &candidate), Some(Feature::Era));
        assert_eq!(generate_reason(&target, &candidate), GENERIC_REASON);
    }

    #[test]
    fn test_dimension_mismatch_is_generic() {
        let a = Vector::new(vec![0.0; 3]);
        let b = Vector::new(vec![0.0; FEATURE_COUNT]);
        assert_eq!(closest_feature(&a, &b), None);
        assert_eq!(generate_reason(&a, &b), GENERIC_REASON);
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(0.95), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.7), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.2), ConfidenceLevel::Low);
    }

    #[test]
    fn test_recommendation_clamps_score() {
        let rec = Recommendation::new(3, -0.4, "comparable age");
        assert_eq!(rec.similarity_score, 0.0);
        assert_eq!(rec.confidence, ConfidenceLevel::Low);

        let rec = Recommendation::new(3, 1.0000000002, "comparable age");
        assert_eq!(rec.similarity_score, 1.0);

        let rec = Recommendation::new(3, f64::NAN, "comparable age");
        assert_eq!(rec.similarity_score, 0.0);
        assert_eq!(rec.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_stats() {
        let results = vec![
            Recommendation::new(1, 0.9, "similar build"),
            Recommendation::new(2, 0.7, "comparable age"),
            Recommendation::new(3, 0.5, GENERIC_REASON),
        ];
        let stats = RecommendationStats::compute(&results, 10);
        assert_eq!(stats.candidates_count, 10);
        assert_eq!(stats.results_count, 3);
        assert_eq!(stats.best_score, 0.9);
        assert!((stats.avg_score - 0.7).abs() < 1e-9);
        assert_eq!(stats.top_reason.as_deref(), Some("similar build"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = RecommendationStats::compute(&[], 5);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
        assert!(stats.top_reason.is_none());
    }

    #[test]
    fn test_response_serialization() {
        let response = RecommendationResponse::new(
            10,
            vec![Recommendation::new(11, 0.85, "similar build")],
            4,
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"target_id\":10"));
        assert!(json.contains("\"confidence\":\"high\""));
        assert!(json.contains("\"reason\":\"similar build\""));
    }
}
