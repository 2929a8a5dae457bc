//! Feature extraction boundary
//!
//! The engine never analyzes audio itself; it asks an external analysis
//! service for a track's [`FeatureVector`]. The boundary is the
//! [`FeatureExtractor`] trait so batch orchestration can run against the
//! production HTTP client or an in-process test double alike.

pub mod http;

pub use http::HttpFeatureExtractor;

use async_trait::async_trait;
use genrefit_common::models::{FeatureVector, GenreId};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// One already-validated track handed to the extractor
///
/// Format, batch-size and file-size limits are enforced by the upload layer
/// before a `TrackSource` exists.
#[derive(Debug, Clone)]
pub struct TrackSource {
    /// Original filename as submitted (kept for reporting)
    pub filename: String,
    /// Location of the audio payload on disk
    pub path: PathBuf,
}

impl TrackSource {
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }

    /// Build a source from a path, using its file name for reporting
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { filename, path }
    }
}

/// What the analysis service returns for one track
///
/// `scores` are the service's own per-genre predictions; the engine
/// re-derives its deterministic rule-based scores from `features` and keeps
/// the remote values for diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub features: FeatureVector,
    pub scores: HashMap<GenreId, f64>,
}

/// Extraction failure (per-track, recoverable)
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// I/O error reading the track payload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Analysis service returned an error response
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse the service response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported audio format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// External feature extraction collaborator
///
/// Implementations must be safe to call once per track from a sequential
/// batch loop; each call is independent.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// Extractor name for logging and provenance
    fn name(&self) -> &'static str;

    /// Analyze one track, scoring it against the selected genres
    ///
    /// # Errors
    /// Returns `ExtractionError` on malformed/corrupt audio, unsupported
    /// format, or transport failure. The caller isolates failures per track.
    async fn extract(
        &self,
        track: &TrackSource,
        genre_ids: &[GenreId],
    ) -> Result<ExtractionOutcome, ExtractionError>;
}
