//! Feature Encoder
//!
//! Converts raw player records into fixed-length [`FeatureVector`]s.
//! Encoding never fails: each field is read by a small pure function that
//! falls back to the field's default, so one malformed record cannot abort
//! a training batch.

use crate::features::{defaults, FeatureVector};
use chrono::{NaiveDate, Utc};
use dugout_core::{age_on, FieldValue, Labeled, PlayerRecord};

const CM_PER_FOOT: f64 = 30.48;
const CM_PER_INCH: f64 = 2.54;
const KG_PER_POUND: f64 = 0.453592;

/// Teams treated as strong by the team-strength placeholder
pub const DEFAULT_STRONG_TEAMS: [&str; 3] = [
    "New York Yankees",
    "Los Angeles Dodgers",
    "Houston Astros",
];

/// Encoder turning player records into feature vectors
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    strong_teams: Vec<String>,
    reference_date: Option<NaiveDate>,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureEncoder {
    /// Encoder with the default strong-team list, ages measured to today
    pub fn new() -> Self {
        Self {
            strong_teams: DEFAULT_STRONG_TEAMS.iter().map(|s| s.to_string()).collect(),
            reference_date: None,
        }
    }

    pub fn strong_teams(&self) -> &[String] {
        &self.strong_teams
    }

    /// Date ages are measured to
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Encode one record
    pub fn encode(&self, record: &PlayerRecord) -> FeatureVector {
        let today = self.reference_date();
        let stats = record.stats.as_ref();

        FeatureVector {
            position_code: encode_position(
                record.primary_position.as_ref().and_then(Labeled::short_code),
            ),
            height_cm: parse_height(record.height.as_ref()),
            weight_kg: parse_weight(record.weight.as_ref()),
            age: encode_age(record.birth_date.as_deref(), today),
            batting_hand: encode_bat_side(record.bat_side.as_ref().and_then(Labeled::code)),
            team_strength: self.team_strength(record.current_team.as_ref().and_then(Labeled::name)),
            avg: stat_float(stats.and_then(|s| s.avg.as_ref()), defaults::AVG),
            home_runs: stat_int(stats.and_then(|s| s.home_runs.as_ref()), defaults::HOME_RUNS),
            rbi: stat_int(stats.and_then(|s| s.rbi.as_ref()), defaults::RBI),
            era: stat_float(stats.and_then(|s| s.era.as_ref()), defaults::ERA),
            strikeouts: stat_int(stats.and_then(|s| s.strikeouts.as_ref()), defaults::STRIKEOUTS),
        }
    }

    /// Placeholder strength model: listed teams 1.0, everyone else 0.5
    pub fn team_strength(&self, team_name: Option<&str>) -> f64 {
        match team_name {
            Some(name) if self.strong_teams.iter().any(|t| t == name.trim()) => 1.0,
            _ => defaults::TEAM_STRENGTH,
        }
    }
}

/// Builder for creating FeatureEncoder with custom options
#[derive(Debug, Clone, Default)]
pub struct EncoderBuilder {
    encoder: FeatureEncoder,
}

impl EncoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strong_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encoder.strong_teams = teams.into_iter().map(Into::into).collect();
        self
    }

    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.encoder.reference_date = Some(date);
        self
    }

    pub fn build(self) -> FeatureEncoder {
        self.encoder
    }
}

/// Position code to numeric weight; unknown or missing codes get 5.0
pub fn encode_position(position: Option<&str>) -> f64 {
    let Some(code) = position else {
        return defaults::POSITION;
    };
    match code.trim().to_ascii_uppercase().as_str() {
        "P" => 1.0,
        "C" => 2.0,
        "1B" => 3.0,
        "2B" => 4.0,
        "3B" => 5.0,
        "SS" => 6.0,
        "LF" => 7.0,
        "CF" => 8.0,
        "RF" => 9.0,
        "DH" => 10.0,
        "OF" => 7.5,
        "IF" => 4.5,
        "UT" => 5.5,
        _ => defaults::POSITION,
    }
}

/// Height in centimeters from `6'2"`, `185 cm`, `185` or a number
pub fn parse_height(height: Option<&FieldValue>) -> f64 {
    let parsed = match height {
        Some(FieldValue::Number(n)) => Some(*n),
        Some(FieldValue::Text(s)) => parse_height_text(s),
        _ => None,
    };
    positive_or(parsed, defaults::HEIGHT_CM)
}

fn parse_height_text(s: &str) -> Option<f64> {
    if s.contains('\'') {
        let cleaned = s.replace('"', "");
        let mut parts = cleaned.splitn(2, '\'');
        let feet: i64 = parts.next()?.trim().parse().ok()?;
        let inches: i64 = match parts.next().map(str::trim) {
            Some("") | None => 0,
            Some(rest) => rest.parse().ok()?,
        };
        Some(feet as f64 * CM_PER_FOOT + inches as f64 * CM_PER_INCH)
    } else {
        s.replace("cm", "").trim().parse().ok()
    }
}

/// Weight in kilograms from `200 lbs`, `90 kg`, `200` or a number
///
/// Values without a unit are pounds, the unit the stats feed reports.
pub fn parse_weight(weight: Option<&FieldValue>) -> f64 {
    let parsed = match weight {
        Some(FieldValue::Number(n)) => Some(*n * KG_PER_POUND),
        Some(FieldValue::Text(s)) if s.contains("kg") => s.replace("kg", "").trim().parse().ok(),
        Some(FieldValue::Text(s)) => s
            .replace("lbs", "")
            .trim()
            .parse::<f64>()
            .ok()
            .map(|pounds| pounds * KG_PER_POUND),
        _ => None,
    };
    positive_or(parsed, defaults::WEIGHT_KG)
}

/// Fractional age on `today`; 25.0 when the birth date is missing or unreadable
pub fn encode_age(birth_date: Option<&str>, today: NaiveDate) -> f64 {
    birth_date
        .and_then(|d| age_on(d, today))
        .filter(|age| age.is_finite())
        .unwrap_or(defaults::AGE)
}

/// Left 0.0, right 1.0, switch 0.5; anything else counts as right-handed
pub fn encode_bat_side(bat_side: Option<&str>) -> f64 {
    let Some(code) = bat_side else {
        return defaults::BATTING_HAND;
    };
    match code.trim().to_ascii_uppercase().as_str() {
        "L" | "LEFT" => 0.0,
        "R" | "RIGHT" => 1.0,
        "S" | "B" | "SWITCH" | "BOTH" => 0.5,
        _ => defaults::BATTING_HAND,
    }
}

/// Rate stat such as AVG or ERA; numeric strings like `".285"` are accepted
pub fn stat_float(value: Option<&FieldValue>, default: f64) -> f64 {
    let parsed = match value {
        Some(FieldValue::Number(n)) => Some(*n),
        Some(FieldValue::Text(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Counting stat; numbers are truncated, strings must be whole numbers
pub fn stat_int(value: Option<&FieldValue>, default: f64) -> f64 {
    let parsed = match value {
        Some(FieldValue::Number(n)) if n.is_finite() => Some(n.trunc()),
        Some(FieldValue::Text(s)) => s.trim().parse::<i64>().ok().map(|n| n as f64),
        _ => None,
    };
    parsed.unwrap_or(default)
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}
