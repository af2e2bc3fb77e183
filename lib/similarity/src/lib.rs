//! # Dugout Similarity
//!
//! A content-based "similar players" engine.
//!
//! Each player record is reduced to a fixed set of numeric features,
//! the features are standardized across the training batch, and players
//! are compared by cosine similarity. Every recommendation carries a short
//! reason naming the feature the two players share most closely.
//!
//! ## Example
//!
//! ```rust
//! use dugout_core::{PlayerRecord, PlayerStats};
//! use dugout_similarity::{EncoderBuilder, RecommendationEngine};
//!
//! let engine = RecommendationEngine::new(EncoderBuilder::new().build());
//!
//! let batch = vec![
//!     PlayerRecord::new(1).with_position("SS").with_height("6'0\"")
//!         .with_stats(PlayerStats::from_numbers(0.280, 20.0, 75.0, 4.0, 90.0)),
//!     PlayerRecord::new(2).with_position("SS").with_height("6'1\"")
//!         .with_stats(PlayerStats::from_numbers(0.285, 22.0, 80.0, 4.0, 95.0)),
//!     PlayerRecord::new(3).with_position("P").with_height("6'5\"")
//!         .with_stats(PlayerStats::from_numbers(0.110, 0.0, 2.0, 3.1, 210.0)),
//! ];
//! engine.train(&batch).unwrap();
//!
//! let similar = engine.recommend(1, 1);
//! assert_eq!(similar[0].player_id, 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Records   │────>│   Encoder   │────>│   Matrix    │
//! │   (batch)   │     │ (record→fv) │     │  (z-score)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌──────┴──────┐
//!                     │   Explain   │<────│   Engine    │
//!                     │  (reasons)  │     │  (cosine)   │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod features;
pub mod encoder;
pub mod matrix;
pub mod engine;
pub mod explain;

// Re-export main types for convenience
pub use features::{Feature, FeatureVector, FEATURE_COUNT};
pub use encoder::{EncoderBuilder, FeatureEncoder, DEFAULT_STRONG_TEAMS};
pub use matrix::{ColumnStats, FeatureMatrix, Scaler};
pub use engine::{
    ModelSnapshot, RecommendationEngine, SimilarityMatrix, TrainSummary,
    DEFAULT_MAX_MODEL_AGE_SECS,
};
pub use explain::{
    ConfidenceLevel, Recommendation, RecommendationResponse, RecommendationStats,
};
