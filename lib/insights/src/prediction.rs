//! Batting-average prediction
//!
//! A simple multiplicative model: the career average is scaled by an age
//! curve that peaks between 27 and 30 and by an availability factor derived
//! from games played.

use chrono::NaiveDate;
use dugout_core::age_on;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// League-average batting average used when nothing better is known
pub const LEAGUE_AVG: f64 = 0.250;
/// Interval returned by the fallback prediction
pub const FALLBACK_INTERVAL: f64 = 0.050;
/// Interval attached to every model prediction
pub const MODEL_INTERVAL: f64 = 0.05;
/// Games played at or above which no injury discount applies
pub const FULL_SEASON_GAMES: f64 = 140.0;

/// Inputs to the batting-average model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionFeatures {
    pub career_avg: f64,
    pub age: f64,
    pub games_played: f64,
    pub at_bats: f64,
}

impl Default for PredictionFeatures {
    fn default() -> Self {
        Self {
            career_avg: LEAGUE_AVG,
            age: 25.0,
            games_played: 150.0,
            at_bats: 500.0,
        }
    }
}

impl PredictionFeatures {
    /// Build features from a birth date and a hitting-stat object
    ///
    /// Reads `avg`, `gamesPlayed` and `atBats` from `stats`; each falls back
    /// to its default independently when missing or unparsable.
    pub fn from_player(birth_date: Option<&str>, stats: Option<&Value>, today: NaiveDate) -> Self {
        let defaults = Self::default();
        let field = |name: &str| stats.and_then(|s| s.get(name)).and_then(number);

        Self {
            career_avg: field("avg").unwrap_or(defaults.career_avg),
            age: birth_date
                .and_then(|d| age_on(d, today))
                .unwrap_or(defaults.age),
            games_played: field("gamesPlayed").unwrap_or(defaults.games_played),
            at_bats: field("atBats").unwrap_or(defaults.at_bats),
        }
    }

    fn is_finite(&self) -> bool {
        self.career_avg.is_finite()
            && self.age.is_finite()
            && self.games_played.is_finite()
            && self.at_bats.is_finite()
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Predicted batting average with a symmetric confidence interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BattingPrediction {
    pub predicted_avg: f64,
    pub confidence_interval: f64,
}

impl BattingPrediction {
    /// League-average prediction
    pub fn fallback() -> Self {
        Self {
            predicted_avg: LEAGUE_AVG,
            confidence_interval: FALLBACK_INTERVAL,
        }
    }
}

/// How far a prediction can be trusted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredictionQuality {
    Good,
    Uncertain,
}

/// Expected direction of a player's performance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Positive,
    Neutral,
    Cautious,
}

/// Human-readable breakdown of a prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionAnalysis {
    pub quality: PredictionQuality,
    pub key_factors: Vec<String>,
    pub risk_factors: Vec<String>,
    pub outlook: Outlook,
}

/// Stateless batting-average predictor
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformancePredictor;

impl PerformancePredictor {
    pub fn new() -> Self {
        Self
    }

    /// Predict next-season batting average
    ///
    /// Non-finite inputs, or a non-finite result, yield [`BattingPrediction::fallback`].
    pub fn predict_batting_average(&self, features: &PredictionFeatures) -> BattingPrediction {
        if !features.is_finite() {
            warn!(?features, "non-finite prediction input, using league average");
            return BattingPrediction::fallback();
        }

        let predicted_avg = features.career_avg
            * age_factor(features.age)
            * injury_factor(features.games_played);

        if !predicted_avg.is_finite() {
            warn!(?features, "non-finite prediction, using league average");
            return BattingPrediction::fallback();
        }

        debug!(predicted_avg, age = features.age, "batting average predicted");
        BattingPrediction {
            predicted_avg,
            confidence_interval: MODEL_INTERVAL,
        }
    }

    /// Explain a prediction in terms of age and uncertainty
    pub fn analyze(&self, prediction: &BattingPrediction, features: &PredictionFeatures) -> PredictionAnalysis {
        let mut analysis = PredictionAnalysis {
            quality: PredictionQuality::Good,
            key_factors: Vec::new(),
            risk_factors: Vec::new(),
            outlook: Outlook::Neutral,
        };

        if features.age < 25.0 {
            analysis.key_factors.push("young player with room to grow".to_string());
            analysis.outlook = Outlook::Positive;
        } else if features.age > 32.0 {
            analysis.risk_factors.push("veteran age, physical decline possible".to_string());
            analysis.outlook = Outlook::Cautious;
        }

        if prediction.confidence_interval > 0.1 {
            analysis.quality = PredictionQuality::Uncertain;
            analysis.risk_factors.push("high prediction uncertainty".to_string());
        }

        analysis
    }
}

/// Age curve, 1.0 at the 27-30 peak
pub fn age_factor(age: f64) -> f64 {
    if (27.0..=30.0).contains(&age) {
        1.0
    } else if age < 27.0 {
        0.9 + (age - 20.0) * 0.02
    } else {
        1.0 - (age - 30.0) * 0.02
    }
}

/// Availability discount for partial seasons
pub fn injury_factor(games_played: f64) -> f64 {
    if games_played >= FULL_SEASON_GAMES {
        1.0
    } else {
        0.8 + (games_played / FULL_SEASON_GAMES) * 0.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn test_age_factor_curve() {
        assert_eq!(age_factor(27.0), 1.0);
        assert_eq!(age_factor(30.0), 1.0);
        assert!((age_factor(20.0) - 0.9).abs() < 1e-12);
        assert!((age_factor(25.0) - 1.0).abs() < 1e-12);
        assert!((age_factor(35.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_injury_factor() {
        assert_eq!(injury_factor(162.0), 1.0);
        assert_eq!(injury_factor(140.0), 1.0);
        assert!((injury_factor(70.0) - 0.9).abs() < 1e-12);
        assert!((injury_factor(0.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_prime_full_season_keeps_average() {
        let features = PredictionFeatures {
            career_avg: 0.300,
            age: 28.0,
            games_played: 155.0,
            at_bats: 600.0,
        };
        let prediction = PerformancePredictor::new().predict_batting_average(&features);
        assert!((prediction.predicted_avg - 0.300).abs() < 1e-12);
        assert_eq!(prediction.confidence_interval, MODEL_INTERVAL);
    }

    #[test]
    fn test_veteran_partial_season() {
        let features = PredictionFeatures {
            career_avg: 0.280,
            age: 35.0,
            games_played: 70.0,
            at_bats: 250.0,
        };
        let prediction = PerformancePredictor::new().predict_batting_average(&features);
        assert!((prediction.predicted_avg - 0.280 * 0.9 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_falls_back() {
        let features = PredictionFeatures {
            career_avg: f64::NAN,
            ..PredictionFeatures::default()
        };
        let prediction = PerformancePredictor::new().predict_batting_average(&features);
        assert_eq!(prediction, BattingPrediction::fallback());
    }

    #[test]
    fn test_features_from_player() {
        let stats = json!({"avg": ".312", "gamesPlayed": 120, "atBats": "450"});
        let features = PredictionFeatures::from_player(Some("1994-07-01"), Some(&stats), today());
        assert!((features.career_avg - 0.312).abs() < 1e-12);
        assert!((features.age - 30.0).abs() < 0.01);
        assert_eq!(features.games_played, 120.0);
        assert_eq!(features.at_bats, 450.0);
    }

    #[test]
    fn test_features_fall_back_per_field() {
        let stats = json!({"avg": "n/a", "gamesPlayed": 99});
        let features = PredictionFeatures::from_player(Some("not a date"), Some(&stats), today());
        assert_eq!(features.career_avg, LEAGUE_AVG);
        assert_eq!(features.age, 25.0);
        assert_eq!(features.games_played, 99.0);
        assert_eq!(features.at_bats, 500.0);

        assert_eq!(PredictionFeatures::from_player(None, None, today()), PredictionFeatures::default());
    }

    #[test]
    fn test_analysis() {
        let predictor = PerformancePredictor::new();
        let prediction = BattingPrediction {
            predicted_avg: 0.260,
            confidence_interval: 0.05,
        };

        let young = PredictionFeatures { age: 22.0, ..Default::default() };
        let analysis = predictor.analyze(&prediction, &young);
        assert_eq!(analysis.outlook, Outlook::Positive);
        assert_eq!(analysis.key_factors.len(), 1);
        assert_eq!(analysis.quality, PredictionQuality::Good);

        let veteran = PredictionFeatures { age: 34.0, ..Default::default() };
        let analysis = predictor.analyze(&prediction, &veteran);
        assert_eq!(analysis.outlook, Outlook::Cautious);
        assert_eq!(analysis.risk_factors.len(), 1);

        let wide = BattingPrediction {
            predicted_avg: 0.260,
            confidence_interval: 0.15,
        };
        let analysis = predictor.analyze(&wide, &PredictionFeatures { age: 28.0, ..Default::default() });
        assert_eq!(analysis.quality, PredictionQuality::Uncertain);
        assert_eq!(analysis.outlook, Outlook::Neutral);
        assert_eq!(analysis.risk_factors.len(), 1);
    }
}
