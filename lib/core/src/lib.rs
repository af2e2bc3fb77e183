//! # Dugout Core
//!
//! Core types shared by the Dugout crates.
//!
//! - [`PlayerRecord`] - A raw player record as delivered by the stats feed
//! - [`Vector`] - Dense `f64` vector with dot product, norm and cosine similarity
//! - [`Error`] - Error type shared across the workspace
//!
//! ## Example
//!
//! ```rust
//! use dugout_core::{parse_batch, Vector};
//! use serde_json::json;
//!
//! let batch = parse_batch(&json!([
//!     {"id": 1, "fullName": "Aaron Judge", "height": "6' 7\"", "weight": 282},
//!     null,
//! ])).unwrap();
//! assert_eq!(batch.records.len(), 1);
//! assert_eq!(batch.skipped, 1);
//!
//! let a = Vector::new(vec![1.0, 0.0]);
//! let b = Vector::new(vec![1.0, 0.0]);
//! assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod player;
pub mod vector;

pub use error::{Error, Result};
pub use player::{
    age_on, parse_batch, FieldValue, Labeled, LabeledObject, ParsedBatch, PlayerId,
    PlayerRecord, PlayerStats,
};
pub use vector::Vector;
