//! # Dugout
//!
//! "Similar players" recommendations for baseball, with batting-average
//! predictions and search-behavior profiles on the side.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! dugout recommend --players players.json --player-id 592450 --top-k 5
//! dugout predict --birth-date 1992-04-26 --career-avg .281 --games-played 158
//! dugout profile --history searches.json --user-id fan-42
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use dugout::prelude::*;
//! use serde_json::json;
//!
//! let batch = parse_batch(&json!([
//!     {"id": 1, "primaryPosition": {"abbreviation": "RF"}, "height": "6' 7\"",
//!      "stats": {"avg": ".311", "homeRuns": 62}},
//!     {"id": 2, "primaryPosition": {"abbreviation": "RF"}, "height": "6' 6\"",
//!      "stats": {"avg": ".301", "homeRuns": 58}},
//!     {"id": 3, "primaryPosition": {"abbreviation": "P"}, "height": "6' 0\"",
//!      "stats": {"avg": ".120", "homeRuns": 0, "era": "2.90"}},
//! ])).unwrap();
//!
//! let engine = RecommendationEngine::new(DugoutConfig::default().encoder());
//! engine.train(&batch.records).unwrap();
//!
//! let similar = engine.recommend(1, 1);
//! assert_eq!(similar[0].player_id, 2);
//! ```
//!
//! ## Crate Structure
//!
//! - `dugout-core` - Player records, vectors and the shared error type
//! - `dugout-similarity` - Feature encoding, standardization and the recommendation engine
//! - `dugout-insights` - Performance prediction and user behavior analysis

pub mod config;

pub use config::{DugoutConfig, DEFAULT_TOP_K};

// Re-export core types
pub use dugout_core::{
    parse_batch, Error, ParsedBatch, PlayerId, PlayerRecord, PlayerStats, Result, Vector,
};

// Re-export the similarity engine
pub use dugout_similarity::{
    ConfidenceLevel, Feature, FeatureEncoder, FeatureVector, ModelSnapshot, Recommendation,
    RecommendationEngine, RecommendationResponse, TrainSummary,
};

// Re-export insights
pub use dugout_insights::{
    BehaviorAnalyzer, PerformancePredictor, PredictionAnalysis, PredictionFeatures,
    SearchRecord, UserProfile,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        parse_batch, BehaviorAnalyzer, ConfidenceLevel, DugoutConfig, Error, Feature,
        FeatureEncoder, FeatureVector, PerformancePredictor, PlayerId, PlayerRecord,
        PredictionFeatures, Recommendation, RecommendationEngine, RecommendationResponse,
        Result, SearchRecord, UserProfile,
    };
}
