//! Search-behavior profiling
//!
//! Turns a user's search history into a [`UserProfile`] (favorite teams,
//! peak hours, engagement) and derives personalized content from it.

use chrono::{DateTime, NaiveDateTime, Timelike};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, warn};

/// Hours returned when no usable time pattern exists
pub const DEFAULT_PEAK_HOURS: [u32; 3] = [19, 20, 21];
/// Search type used when a history has none
pub const DEFAULT_SEARCH_TYPE: &str = "player";
/// User id of the default profile
pub const ANONYMOUS_USER: &str = "anonymous";

const TOP_ITEMS: usize = 3;

/// One entry of a user's search history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchRecord {
    #[serde(default)]
    pub search_type: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    /// ISO-8601 timestamp
    #[serde(default)]
    pub search_time: Option<String>,
    #[serde(default)]
    pub results_count: Option<u64>,
}

impl SearchRecord {
    pub fn new(search_type: &str, search_query: &str) -> Self {
        Self {
            search_type: Some(search_type.to_string()),
            search_query: Some(search_query.to_string()),
            ..Default::default()
        }
    }

    pub fn at(mut self, search_time: &str) -> Self {
        self.search_time = Some(search_time.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngagementLevel {
    New,
    Low,
    Medium,
    High,
}

impl EngagementLevel {
    pub fn from_frequency(search_frequency: usize) -> Self {
        if search_frequency >= 50 {
            EngagementLevel::High
        } else if search_frequency >= 20 {
            EngagementLevel::Medium
        } else {
            EngagementLevel::Low
        }
    }
}

/// Summary of a user's interests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub search_frequency: usize,
    pub preferred_teams: Vec<String>,
    pub peak_search_hours: Vec<u32>,
    pub engagement_level: EngagementLevel,
    pub recommendations: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            user_id: ANONYMOUS_USER.to_string(),
            search_frequency: 0,
            preferred_teams: Vec::new(),
            peak_search_hours: DEFAULT_PEAK_HOURS.to_vec(),
            engagement_level: EngagementLevel::New,
            recommendations: vec![
                "Explore trending players".to_string(),
                "See today's games".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestedTeam {
    pub team_name: String,
    pub reason: String,
}

/// Content selected for a user from their profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalizedContent {
    pub recommended_players: Vec<String>,
    pub suggested_teams: Vec<SuggestedTeam>,
    pub trending_topics: Vec<String>,
    pub custom_insights: Vec<String>,
}

/// Builds and caches user profiles
#[derive(Debug, Default)]
pub struct BehaviorAnalyzer {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl BehaviorAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile a user's search history
    ///
    /// An empty history returns the default profile without caching it.
    pub fn analyze_search_patterns(&self, user_id: &str, history: &[SearchRecord]) -> UserProfile {
        if history.is_empty() {
            return UserProfile::default();
        }

        let team_queries = history
            .iter()
            .filter(|s| s.search_type.as_deref() == Some("team"))
            .filter_map(|s| s.search_query.as_deref())
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let preferred_teams = most_common(team_queries, TOP_ITEMS);

        let timestamps: Vec<&str> = history
            .iter()
            .filter_map(|s| s.search_time.as_deref())
            .filter(|t| !t.is_empty())
            .collect();
        let peak_search_hours = peak_hours(&timestamps);

        let profile = UserProfile {
            user_id: user_id.to_string(),
            search_frequency: history.len(),
            recommendations: team_suggestions(&preferred_teams),
            preferred_teams,
            peak_search_hours,
            engagement_level: EngagementLevel::from_frequency(history.len()),
        };

        debug!(user_id, searches = history.len(), "user profile updated");
        self.profiles.write().insert(user_id.to_string(), profile.clone());
        profile
    }

    /// Last profile computed for a user
    pub fn cached_profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.read().get(user_id).cloned()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }
}

/// Content suggestions driven by favorite teams and engagement
pub fn personalized_content(profile: &UserProfile) -> PersonalizedContent {
    let mut content = PersonalizedContent::default();

    for team in profile.preferred_teams.iter().take(TOP_ITEMS) {
        content.suggested_teams.push(SuggestedTeam {
            team_name: team.clone(),
            reason: format!("based on your searches for {team}"),
        });
    }

    match profile.engagement_level {
        EngagementLevel::High => {
            content.custom_insights.push("Explore advanced stat breakdowns".to_string());
            content.custom_insights.push("Check player performance predictions".to_string());
        }
        EngagementLevel::Medium => {
            content.custom_insights.push("Try comparing players side by side".to_string());
        }
        EngagementLevel::Low | EngagementLevel::New => {
            content.custom_insights.push("Start by following a team you like".to_string());
        }
    }

    content
}

/// The search type a user uses most, `player` if none is recorded
pub fn most_frequent_search_type(history: &[SearchRecord]) -> String {
    let types = history
        .iter()
        .filter_map(|s| s.search_type.as_deref())
        .filter(|t| !t.is_empty());
    most_common(types, 1)
        .into_iter()
        .next()
        .unwrap_or(DEFAULT_SEARCH_TYPE)
        .to_string()
}

fn team_suggestions(teams: &[String]) -> Vec<String> {
    teams
        .iter()
        .take(2)
        .flat_map(|team| {
            [
                format!("Check the latest results for {team}"),
                format!("Discover the star players of {team}"),
            ]
        })
        .collect()
}

/// Three most common hours of day, or the evening default on any bad timestamp
fn peak_hours(timestamps: &[&str]) -> Vec<u32> {
    let mut hours = Vec::with_capacity(timestamps.len());
    for ts in timestamps {
        match parse_hour(ts) {
            Some(hour) => hours.push(hour),
            None => {
                warn!(timestamp = %ts, "unparsable search time, using default peak hours");
                return DEFAULT_PEAK_HOURS.to_vec();
            }
        }
    }
    most_common(hours, TOP_ITEMS)
}

fn parse_hour(ts: &str) -> Option<u32> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.hour());
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.hour())
}

/// Up to `n` most frequent items; equal counts keep first-appearance order
fn most_common<T, I>(items: I, n: usize) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<(T, usize)> = Vec::new();
    let mut index: HashMap<T, usize> = HashMap::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(item.clone(), order.len());
                order.push((item, 1));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(n).map(|(item, _)| item).collect()
}
