//! # Dugout Insights
//!
//! Player- and user-facing insights built alongside the similarity engine:
//!
//! - [`PerformancePredictor`] - next-season batting average from age and availability
//! - [`BehaviorAnalyzer`] - user profiles from search history
//!
//! ```rust
//! use dugout_insights::{PerformancePredictor, PredictionFeatures};
//!
//! let features = PredictionFeatures { career_avg: 0.300, age: 28.0, ..Default::default() };
//! let prediction = PerformancePredictor::new().predict_batting_average(&features);
//! assert!((prediction.predicted_avg - 0.300).abs() < 1e-9);
//! ```

pub mod behavior;
pub mod prediction;

pub use behavior::{
    most_frequent_search_type, personalized_content, BehaviorAnalyzer, EngagementLevel,
    PersonalizedContent, SearchRecord, SuggestedTeam, UserProfile,
};
pub use prediction::{
    BattingPrediction, Outlook, PerformancePredictor, PredictionAnalysis, PredictionFeatures,
    PredictionQuality,
};
