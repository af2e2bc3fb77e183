//! Runtime configuration for the recommender

use chrono::{Duration, NaiveDate};
use dugout_core::{Error, Result};
use dugout_similarity::{EncoderBuilder, FeatureEncoder, DEFAULT_MAX_MODEL_AGE_SECS, DEFAULT_STRONG_TEAMS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of recommendations returned when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 8;

/// Largest model age a `chrono::Duration` can hold, in seconds
const MAX_MODEL_AGE_SECS: u64 = (i64::MAX / 1000) as u64;

/// Recommender settings, loadable from a JSON file
///
/// Every field is optional in the file:
///
/// ```json
/// {
///   "top_k": 5,
///   "max_model_age_secs": 1800,
///   "strong_teams": ["Atlanta Braves"],
///   "reference_date": "2024-04-01"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DugoutConfig {
    pub top_k: usize,
    pub max_model_age_secs: u64,
    pub strong_teams: Vec<String>,
    /// Date player ages are measured to; today when unset
    pub reference_date: Option<NaiveDate>,
}

impl Default for DugoutConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_model_age_secs: DEFAULT_MAX_MODEL_AGE_SECS as u64,
            strong_teams: DEFAULT_STRONG_TEAMS.iter().map(|s| s.to_string()).collect(),
            reference_date: None,
        }
    }
}

impl DugoutConfig {
    /// Read and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if self.max_model_age_secs == 0 {
            return Err(Error::InvalidConfig(
                "max_model_age_secs must be at least 1".to_string(),
            ));
        }
        if self.max_model_age_secs > MAX_MODEL_AGE_SECS {
            return Err(Error::InvalidConfig(
                "max_model_age_secs is out of range".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_model_age(&self) -> Duration {
        Duration::seconds(self.max_model_age_secs.min(MAX_MODEL_AGE_SECS) as i64)
    }

    /// Encoder configured with these settings
    pub fn encoder(&self) -> FeatureEncoder {
        let builder = EncoderBuilder::new().strong_teams(self.strong_teams.iter().cloned());
        match self.reference_date {
            Some(date) => builder.reference_date(date).build(),
            None => builder.build(),
        }
    }
}
