//! Player feature definitions
//!
//! Defines the fixed, ordered set of numeric features every player is
//! reduced to before comparison, and the defaults used when a raw field is
//! missing or cannot be interpreted.

use dugout_core::{Error, Result, Vector};
use serde::{Deserialize, Serialize};

/// Number of features in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 11;

/// A named feature dimension, in vector order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PositionCode,
    HeightCm,
    WeightKg,
    Age,
    BattingHand,
    TeamStrength,
    Avg,
    HomeRuns,
    Rbi,
    Era,
    Strikeouts,
}

impl Feature {
    /// All features in vector order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::PositionCode,
        Feature::HeightCm,
        Feature::WeightKg,
        Feature::Age,
        Feature::BattingHand,
        Feature::TeamStrength,
        Feature::Avg,
        Feature::HomeRuns,
        Feature::Rbi,
        Feature::Era,
        Feature::Strikeouts,
    ];

    /// Column name of the feature
    pub fn name(self) -> &'static str {
        match self {
            Feature::PositionCode => "position_code",
            Feature::HeightCm => "height_cm",
            Feature::WeightKg => "weight_kg",
            Feature::Age => "age",
            Feature::BattingHand => "batting_hand",
            Feature::TeamStrength => "team_strength",
            Feature::Avg => "avg",
            Feature::HomeRuns => "home_runs",
            Feature::Rbi => "rbi",
            Feature::Era => "era",
            Feature::Strikeouts => "strikeouts",
        }
    }

    /// Position of the feature in the vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Value used when the raw field is missing or unparsable
    pub fn default_value(self) -> f64 {
        match self {
            Feature::PositionCode => defaults::POSITION,
            Feature::HeightCm => defaults::HEIGHT_CM,
            Feature::WeightKg => defaults::WEIGHT_KG,
            Feature::Age => defaults::AGE,
            Feature::BattingHand => defaults::BATTING_HAND,
            Feature::TeamStrength => defaults::TEAM_STRENGTH,
            Feature::Avg => defaults::AVG,
            Feature::HomeRuns => defaults::HOME_RUNS,
            Feature::Rbi => defaults::RBI,
            Feature::Era => defaults::ERA,
            Feature::Strikeouts => defaults::STRIKEOUTS,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fallback values for each feature
pub mod defaults {
    pub const POSITION: f64 = 5.0;
    pub const HEIGHT_CM: f64 = 180.0;
    pub const WEIGHT_KG: f64 = 80.0;
    pub const AGE: f64 = 25.0;
    pub const BATTING_HAND: f64 = 1.0;
    pub const TEAM_STRENGTH: f64 = 0.5;
    pub const AVG: f64 = 0.250;
    pub const HOME_RUNS: f64 = 0.0;
    pub const RBI: f64 = 0.0;
    pub const ERA: f64 = 4.00;
    pub const STRIKEOUTS: f64 = 0.0;
}

/// Numeric encoding of one player
///
/// All fields are always finite numbers; the encoder substitutes
/// defaults for anything it cannot read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub position_code: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: f64,
    pub batting_hand: f64,
    pub team_strength: f64,
    pub avg: f64,
    pub home_runs: f64,
    pub rbi: f64,
    pub era: f64,
    pub strikeouts: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            position_code: defaults::POSITION,
            height_cm: defaults::HEIGHT_CM,
            weight_kg: defaults::WEIGHT_KG,
            age: defaults::AGE,
            batting_hand: defaults::BATTING_HAND,
            team_strength: defaults::TEAM_STRENGTH,
            avg: defaults::AVG,
            home_runs: defaults::HOME_RUNS,
            rbi: defaults::RBI,
            era: defaults::ERA,
            strikeouts: defaults::STRIKEOUTS,
        }
    }
}

impl FeatureVector {
    /// Values in [`Feature::ALL`] order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.position_code,
            self.height_cm,
            self.weight_kg,
            self.age,
            self.batting_hand,
            self.team_strength,
            self.avg,
            self.home_runs,
            self.rbi,
            self.era,
            self.strikeouts,
        ]
    }

    /// Rebuild from values in [`Feature::ALL`] order
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [position_code, height_cm, weight_kg, age, batting_hand, team_strength, avg, home_runs, rbi, era, strikeouts] =
            values;
        Self {
            position_code,
            height_cm,
            weight_kg,
            age,
            batting_hand,
            team_strength,
            avg,
            home_runs,
            rbi,
            era,
            strikeouts,
        }
    }

    /// Rebuild from a slice, checking its length
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| Error::InvalidDimension {
            expected: FEATURE_COUNT,
            actual: values.len(),
        })?;
        Ok(Self::from_array(array))
    }

    /// Value of a single feature
    pub fn get(&self, feature: Feature) -> f64 {
        self.to_array()[feature.index()]
    }

    pub fn to_vector(&self) -> Vector {
        Vector::new(self.to_array().to_vec())
    }
}
