//! Domain models shared across the genrefit workspace
//!
//! A track's measurement arrives as a [`FeatureVector`] from the external
//! analysis service; the catalog supplies [`GenreProfile`]s; scoring produces
//! a [`ScoreResult`] per track, collected into [`TrackResult`]s in submission
//! order. All of these are immutable once produced — re-scoring creates a new
//! `ScoreResult` rather than mutating one in place.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// File extensions the upload layer accepts
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "m4a"];

/// Maximum number of tracks in one batch
pub const MAX_BATCH_TRACKS: usize = 10;

/// Maximum size of a single uploaded track (50 MiB)
pub const MAX_TRACK_BYTES: u64 = 50 * 1024 * 1024;

/// Check whether a filename carries a supported audio extension
///
/// Matching is case-insensitive on the final extension component.
pub fn is_supported_extension(filename: &str) -> bool {
    filename
        .rsplit('.')
        .next()
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Catalog key for a genre
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreId(String);

impl GenreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GenreId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Numeric feature fields of a track measurement
///
/// Only these fields participate in rule evaluation and hit-average
/// comparison. `key`, `duration` and `brightness` are display-only and live
/// directly on [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Bpm,
    Energy,
    Danceability,
    Valence,
    Acousticness,
    Instrumentalness,
    Liveness,
    Speechiness,
    Loudness,
}

impl FeatureKey {
    /// Wire/display name, matching the analysis service JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::Bpm => "bpm",
            FeatureKey::Energy => "energy",
            FeatureKey::Danceability => "danceability",
            FeatureKey::Valence => "valence",
            FeatureKey::Acousticness => "acousticness",
            FeatureKey::Instrumentalness => "instrumentalness",
            FeatureKey::Liveness => "liveness",
            FeatureKey::Speechiness => "speechiness",
            FeatureKey::Loudness => "loudness",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One track's audio measurement, as returned by the analysis service
///
/// Every numeric field is optional: the service omits features it could not
/// compute, and a rule predicate over an absent feature simply does not fire.
/// The vector is never mutated after it is produced.
///
/// Domains: `bpm` positive (typically 40-220); `energy` through
/// `speechiness` in [0, 1]; `loudness` in decibels (typically -60..0 dBFS);
/// `duration` in seconds; `brightness` in Hz (spectral centroid).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acousticness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speechiness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loudness: Option<f64>,
    /// Musical key (e.g. "C", "Am") — display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Track duration in seconds — display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Spectral centroid mean in Hz — display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
}

impl FeatureVector {
    /// Look up a scoreable feature by key
    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        match key {
            FeatureKey::Bpm => self.bpm,
            FeatureKey::Energy => self.energy,
            FeatureKey::Danceability => self.danceability,
            FeatureKey::Valence => self.valence,
            FeatureKey::Acousticness => self.acousticness,
            FeatureKey::Instrumentalness => self.instrumentalness,
            FeatureKey::Liveness => self.liveness,
            FeatureKey::Speechiness => self.speechiness,
            FeatureKey::Loudness => self.loudness,
        }
    }
}

/// Per-genre reference feature means ("hit averages")
///
/// The catalog supplies these partially; any feature missing from the map
/// reads as [`HitAverages::DEFAULT_MEAN`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitAverages(HashMap<FeatureKey, f64>);

impl HitAverages {
    /// Reference mean assumed for features the catalog does not provide
    pub const DEFAULT_MEAN: f64 = 0.5;

    pub fn from_pairs(pairs: impl IntoIterator<Item = (FeatureKey, f64)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// Reference mean for a feature, defaulting when the catalog omits it
    pub fn get_or_default(&self, key: FeatureKey) -> f64 {
        self.get(key).unwrap_or(Self::DEFAULT_MEAN)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Catalog-supplied description of one genre
///
/// Loaded once per session from the catalog source and never mutated by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreProfile {
    pub id: GenreId,
    /// Display name
    pub name: String,
    /// Reference feature means for comparative display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_averages: Option<HitAverages>,
}

/// Per-genre affinity scores for one track
///
/// Scores are non-negative reals with no fixed upper bound. A `ScoreResult`
/// is created fresh per (track, genre-set) evaluation; re-scoring produces a
/// new value rather than mutating an existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreResult(HashMap<GenreId, f64>);

impl ScoreResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, genre: GenreId, score: f64) {
        self.0.insert(genre, score);
    }

    pub fn get(&self, genre: &GenreId) -> Option<f64> {
        self.0.get(genre).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GenreId, f64)> {
        self.0.iter().map(|(id, score)| (id, *score))
    }
}

impl FromIterator<(GenreId, f64)> for ScoreResult {
    fn from_iter<I: IntoIterator<Item = (GenreId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One track's outcome within a batch
///
/// A batch is an ordered `Vec<TrackResult>`; the order matches upload order
/// and is relied on for index-based detail lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResult {
    /// Original filename as submitted
    pub filename: String,
    pub features: FeatureVector,
    /// Scores for the genres selected for this batch
    pub scores: ScoreResult,
}

/// Per-track failure record surfaced by the batch orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFailure {
    pub filename: String,
    /// Human-readable failure description
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_get_maps_all_keys() {
        let features = FeatureVector {
            bpm: Some(120.0),
            energy: Some(0.8),
            danceability: Some(0.7),
            valence: Some(0.6),
            acousticness: Some(0.5),
            instrumentalness: Some(0.4),
            liveness: Some(0.3),
            speechiness: Some(0.2),
            loudness: Some(-6.0),
            ..Default::default()
        };

        assert_eq!(features.get(FeatureKey::Bpm), Some(120.0));
        assert_eq!(features.get(FeatureKey::Energy), Some(0.8));
        assert_eq!(features.get(FeatureKey::Danceability), Some(0.7));
        assert_eq!(features.get(FeatureKey::Valence), Some(0.6));
        assert_eq!(features.get(FeatureKey::Acousticness), Some(0.5));
        assert_eq!(features.get(FeatureKey::Instrumentalness), Some(0.4));
        assert_eq!(features.get(FeatureKey::Liveness), Some(0.3));
        assert_eq!(features.get(FeatureKey::Speechiness), Some(0.2));
        assert_eq!(features.get(FeatureKey::Loudness), Some(-6.0));
    }

    #[test]
    fn test_feature_vector_absent_fields_read_none() {
        let features = FeatureVector {
            bpm: Some(95.0),
            ..Default::default()
        };
        assert_eq!(features.get(FeatureKey::Valence), None);
        assert_eq!(features.get(FeatureKey::Loudness), None);
    }

    #[test]
    fn test_feature_vector_wire_roundtrip() {
        let json = r#"{"bpm":104.5,"energy":0.71,"loudness":-7.2,"key":"Am","duration":213.0}"#;
        let features: FeatureVector = serde_json::from_str(json).unwrap();
        assert_eq!(features.bpm, Some(104.5));
        assert_eq!(features.key.as_deref(), Some("Am"));
        assert_eq!(features.speechiness, None);

        let back = serde_json::to_string(&features).unwrap();
        let reparsed: FeatureVector = serde_json::from_str(&back).unwrap();
        assert_eq!(features, reparsed);
    }

    #[test]
    fn test_hit_averages_default_for_missing_keys() {
        let averages = HitAverages::from_pairs([(FeatureKey::Danceability, 0.72)]);
        assert_eq!(averages.get_or_default(FeatureKey::Danceability), 0.72);
        assert_eq!(
            averages.get_or_default(FeatureKey::Speechiness),
            HitAverages::DEFAULT_MEAN
        );
    }

    #[test]
    fn test_supported_extension_check() {
        assert!(is_supported_extension("track.mp3"));
        assert!(is_supported_extension("TRACK.FLAC"));
        assert!(is_supported_extension("mix.final.m4a"));
        assert!(!is_supported_extension("notes.txt"));
        assert!(!is_supported_extension("noextension"));
    }

    #[test]
    fn test_score_result_insert_and_get() {
        let mut scores = ScoreResult::new();
        scores.insert(GenreId::from("samba"), 85.0);
        scores.insert(GenreId::from("forro"), 30.0);

        assert_eq!(scores.get(&GenreId::from("samba")), Some(85.0));
        assert_eq!(scores.get(&GenreId::from("pagode")), None);
        assert_eq!(scores.len(), 2);
    }
}
