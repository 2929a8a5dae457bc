//! # Genrefit Common Library
//!
//! Shared code for the genrefit workspace including:
//! - Domain models (feature vectors, genre profiles, score results)
//! - Event types (BatchEvent enum) and EventBus
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
pub use models::{FeatureKey, FeatureVector, GenreId, GenreProfile, ScoreResult, TrackResult};
