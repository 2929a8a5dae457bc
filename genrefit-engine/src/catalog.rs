//! Genre catalog
//!
//! The catalog supplies the ordered list of known genres with display names
//! and optional per-genre reference feature means. It is loaded once per
//! session and never mutated by the engine. Catalog unavailability degrades
//! to "no genres to score" at the call site rather than a crash.

use genrefit_common::models::{FeatureKey, GenreId, GenreProfile, HitAverages};
use genrefit_common::{Error, Result};
use std::path::Path;

/// Ordered collection of genre profiles
///
/// Iteration order is the catalog's canonical order; suggestion ties are
/// broken by it.
#[derive(Debug, Clone, Default)]
pub struct GenreCatalog {
    genres: Vec<GenreProfile>,
}

impl GenreCatalog {
    pub fn new(genres: Vec<GenreProfile>) -> Self {
        Self { genres }
    }

    /// The empty catalog ("no genres to score")
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file (an array of genre profiles)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Catalog(format!("Read catalog failed ({}): {}", path.display(), e))
        })?;
        let genres: Vec<GenreProfile> = serde_json::from_str(&content).map_err(|e| {
            Error::Catalog(format!("Parse catalog failed ({}): {}", path.display(), e))
        })?;
        Ok(Self::new(genres))
    }

    pub fn get(&self, id: &GenreId) -> Option<&GenreProfile> {
        self.genres.iter().find(|profile| &profile.id == id)
    }

    /// Display name for a genre, falling back to the raw id
    pub fn display_name<'a>(&'a self, id: &'a GenreId) -> &'a str {
        self.get(id).map(|profile| profile.name.as_str()).unwrap_or(id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenreProfile> {
        self.genres.iter()
    }

    /// All genre ids in catalog order
    pub fn ids(&self) -> Vec<GenreId> {
        self.genres.iter().map(|profile| profile.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// The built-in catalog of the nine Brazilian market genres
    ///
    /// Reference means cover the five compared features; anything else reads
    /// as the 0.5 default.
    pub fn builtin() -> Self {
        use FeatureKey::*;

        fn profile(id: &str, name: &str, averages: [(FeatureKey, f64); 5]) -> GenreProfile {
            GenreProfile {
                id: GenreId::from(id),
                name: name.to_string(),
                hit_averages: Some(HitAverages::from_pairs(averages)),
            }
        }

        Self::new(vec![
            profile(
                "rnb_trap",
                "R&B Trap",
                [
                    (Danceability, 0.72),
                    (Energy, 0.75),
                    (Valence, 0.45),
                    (Acousticness, 0.15),
                    (Speechiness, 0.30),
                ],
            ),
            profile(
                "rnb_pop",
                "R&B Pop",
                [
                    (Danceability, 0.68),
                    (Energy, 0.60),
                    (Valence, 0.60),
                    (Acousticness, 0.45),
                    (Speechiness, 0.08),
                ],
            ),
            profile(
                "mpb_rock",
                "MPB Rock",
                [
                    (Danceability, 0.55),
                    (Energy, 0.75),
                    (Valence, 0.55),
                    (Acousticness, 0.25),
                    (Speechiness, 0.06),
                ],
            ),
            profile(
                "mpb_indie",
                "MPB Indie",
                [
                    (Danceability, 0.55),
                    (Energy, 0.50),
                    (Valence, 0.55),
                    (Acousticness, 0.65),
                    (Speechiness, 0.07),
                ],
            ),
            profile(
                "sertanejo",
                "Sertanejo",
                [
                    (Danceability, 0.78),
                    (Energy, 0.70),
                    (Valence, 0.70),
                    (Acousticness, 0.50),
                    (Speechiness, 0.06),
                ],
            ),
            profile(
                "pagode",
                "Pagode",
                [
                    (Danceability, 0.76),
                    (Energy, 0.65),
                    (Valence, 0.70),
                    (Acousticness, 0.60),
                    (Speechiness, 0.07),
                ],
            ),
            profile(
                "samba",
                "Samba",
                [
                    (Danceability, 0.70),
                    (Energy, 0.60),
                    (Valence, 0.65),
                    (Acousticness, 0.70),
                    (Speechiness, 0.08),
                ],
            ),
            profile(
                "forro",
                "Forró",
                [
                    (Danceability, 0.76),
                    (Energy, 0.68),
                    (Valence, 0.68),
                    (Acousticness, 0.50),
                    (Speechiness, 0.06),
                ],
            ),
            profile(
                "pop_urban_brasil",
                "Pop/Urban Brasil",
                [
                    (Danceability, 0.72),
                    (Energy, 0.70),
                    (Valence, 0.60),
                    (Acousticness, 0.20),
                    (Speechiness, 0.10),
                ],
            ),
        ])
    }
}
