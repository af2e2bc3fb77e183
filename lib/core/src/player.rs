use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub type PlayerId = u64;

/// A scalar field as it arrives from the stats feed: a number, a string
/// with or without units, or something else entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// A coded field: either a bare code (`"SS"`) or a feed object such as
/// `{"code": "R", "description": "Right"}` or `{"id": 147, "name": "New York Yankees"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Labeled {
    Code(String),
    Object(LabeledObject),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabeledObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Labeled {
    /// Short code: abbreviation first, then code
    pub fn short_code(&self) -> Option<&str> {
        match self {
            Labeled::Code(s) => Some(s),
            Labeled::Object(o) => o.abbreviation.as_deref().or(o.code.as_deref()),
            Labeled::Other(_) => None,
        }
    }

    /// Code first, then description
    pub fn code(&self) -> Option<&str> {
        match self {
            Labeled::Code(s) => Some(s),
            Labeled::Object(o) => o.code.as_deref().or(o.description.as_deref()),
            Labeled::Other(_) => None,
        }
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        match self {
            Labeled::Code(s) => Some(s),
            Labeled::Object(o) => o.name.as_deref(),
            Labeled::Other(_) => None,
        }
    }
}

impl From<&str> for Labeled {
    fn from(s: &str) -> Self {
        Labeled::Code(s.to_string())
    }
}

/// Optional season stats attached to a player record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_runs: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rbi: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<FieldValue>,
    #[serde(default, rename = "strikeOuts", skip_serializing_if = "Option::is_none")]
    pub strikeouts: Option<FieldValue>,
}

impl PlayerStats {
    /// Stat block with every field present as a number
    pub fn from_numbers(avg: f64, home_runs: f64, rbi: f64, era: f64, strikeouts: f64) -> Self {
        Self {
            avg: Some(FieldValue::Number(avg)),
            home_runs: Some(FieldValue::Number(home_runs)),
            rbi: Some(FieldValue::Number(rbi)),
            era: Some(FieldValue::Number(era)),
            strikeouts: Some(FieldValue::Number(strikeouts)),
        }
    }
}

/// A raw player record from the stats feed
///
/// Every field is optional and every field type has a catch-all variant,
/// so deserializing any JSON object succeeds. Interpretation (and the
/// fallback to defaults) happens in the feature encoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_position: Option<Labeled>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bat_side: Option<Labeled>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_team: Option<Labeled>,
    #[serde(default, deserialize_with = "lenient_stats", skip_serializing_if = "Option::is_none")]
    pub stats: Option<PlayerStats>,
}

impl PlayerRecord {
    #[inline]
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.full_name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: &str) -> Self {
        self.primary_position = Some(Labeled::from(position));
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: impl Into<FieldValue>) -> Self {
        self.height = Some(height.into());
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: impl Into<FieldValue>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    #[must_use]
    pub fn with_birth_date(mut self, birth_date: &str) -> Self {
        self.birth_date = Some(birth_date.to_string());
        self
    }

    #[must_use]
    pub fn with_bat_side(mut self, bat_side: &str) -> Self {
        self.bat_side = Some(Labeled::from(bat_side));
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: &str) -> Self {
        self.current_team = Some(Labeled::from(team));
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: PlayerStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// True when the record carries no data at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of parsing a JSON batch of player records
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub records: Vec<PlayerRecord>,
    /// Entries that were null, not objects, or empty
    pub skipped: usize,
}

/// Parse a JSON array of player records
///
/// Entries that cannot be read as a record are skipped and counted rather
/// than failing the whole batch. Only a non-array top level is an error.
pub fn parse_batch(value: &Value) -> Result<ParsedBatch> {
    let entries = value.as_array().ok_or_else(|| {
        Error::Serialization("player batch must be a JSON array".to_string())
    })?;

    let mut batch = ParsedBatch::default();
    for entry in entries {
        if !entry.is_object() {
            batch.skipped += 1;
            continue;
        }
        match serde_json::from_value::<PlayerRecord>(entry.clone()) {
            Ok(record) if !record.is_empty() => batch.records.push(record),
            _ => batch.skipped += 1,
        }
    }
    Ok(batch)
}

/// Age in fractional years on `today`, from an ISO `YYYY-MM-DD` birth date
///
/// Whole days elapsed divided by 365.25. `None` when the date does not parse.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<f64> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;
    Some((today - birth).num_days() as f64 / 365.25)
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<PlayerId>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_stats<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<PlayerStats>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}
