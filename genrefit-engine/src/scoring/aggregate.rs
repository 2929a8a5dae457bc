//! Batch aggregation and genre suggestion
//!
//! One suggestion pass owns one [`BatchAccumulator`]: every track's feature
//! vector is scored against every catalog genre, sums accumulate per genre,
//! and the final ranking divides by the number of tracks *submitted* — not
//! the number successfully scored. A track lost to extraction failure is
//! absent from the sums but still counted in the denominator, matching the
//! original product's behavior.

use super::evaluator;
use super::rules::RuleTable;
use crate::catalog::GenreCatalog;
use genrefit_common::models::{FeatureVector, GenreId};
use std::collections::HashMap;

/// Number of genres a suggestion returns
pub const SUGGESTED_GENRES: usize = 2;

/// Transient per-pass accumulation state
///
/// Created at the start of a suggestion pass, discarded after producing the
/// ranking. Never persisted, never shared.
#[derive(Debug)]
pub struct BatchAccumulator {
    sums: HashMap<GenreId, f64>,
    /// Tracks originally submitted (the ranking denominator)
    submitted: usize,
    /// Tracks actually observed (successfully extracted)
    observed: usize,
}

impl BatchAccumulator {
    pub fn new(submitted: usize) -> Self {
        Self {
            sums: HashMap::new(),
            submitted,
            observed: 0,
        }
    }

    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Fold one track's scores over every catalog genre into the sums
    pub fn observe(&mut self, features: &FeatureVector, catalog: &GenreCatalog, table: &RuleTable) {
        for profile in catalog.iter() {
            let value = evaluator::score_genre(features, &profile.id, table);
            *self.sums.entry(profile.id.clone()).or_insert(0.0) += value;
        }
        self.observed += 1;
    }

    /// Mean scores in descending order, ties broken by catalog order
    ///
    /// Empty when no track was observed ("no suggestion available").
    pub fn mean_ranking(&self, catalog: &GenreCatalog) -> Vec<(GenreId, f64)> {
        if self.observed == 0 || self.submitted == 0 {
            return Vec::new();
        }

        let mut ranking: Vec<(GenreId, f64)> = catalog
            .iter()
            .map(|profile| {
                let sum = self.sums.get(&profile.id).copied().unwrap_or(0.0);
                (profile.id.clone(), sum / self.submitted as f64)
            })
            .collect();

        // Stable sort keeps catalog order for equal means.
        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranking
    }

    /// Top genres by mean score
    pub fn suggest(&self, catalog: &GenreCatalog) -> Vec<GenreId> {
        self.mean_ranking(catalog)
            .into_iter()
            .take(SUGGESTED_GENRES)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Suggest the best-fit genres for a set of already-extracted tracks
///
/// The denominator is `vectors.len()`; use [`BatchAccumulator`] directly
/// when some submitted tracks failed extraction and the original submission
/// count must be preserved.
pub fn suggest_genres(
    vectors: &[FeatureVector],
    catalog: &GenreCatalog,
    table: &RuleTable,
) -> Vec<GenreId> {
    let mut accumulator = BatchAccumulator::new(vectors.len());
    for features in vectors {
        accumulator.observe(features, catalog, table);
    }
    accumulator.suggest(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trap_features() -> FeatureVector {
        FeatureVector {
            bpm: Some(90.0),
            speechiness: Some(0.25),
            energy: Some(0.8),
            danceability: Some(0.7),
            acousticness: Some(0.2),
            ..Default::default()
        }
    }

    fn samba_features() -> FeatureVector {
        FeatureVector {
            bpm: Some(100.0),
            acousticness: Some(0.75),
            danceability: Some(0.72),
            valence: Some(0.65),
            speechiness: Some(0.05),
            energy: Some(0.7),
            ..Default::default()
        }
    }

    #[test]
    fn test_suggest_returns_at_most_two() {
        let catalog = GenreCatalog::builtin();
        let table = RuleTable::builtin();
        let suggestion = suggest_genres(&[trap_features(), samba_features()], &catalog, &table);
        assert!(suggestion.len() <= SUGGESTED_GENRES);
        assert_eq!(suggestion.len(), 2);
    }

    #[test]
    fn test_suggest_empty_input_yields_empty() {
        let catalog = GenreCatalog::builtin();
        let table = RuleTable::builtin();
        assert!(suggest_genres(&[], &catalog, &table).is_empty());
    }

    #[test]
    fn test_ranking_is_descending() {
        let catalog = GenreCatalog::builtin();
        let table = RuleTable::builtin();
        let mut accumulator = BatchAccumulator::new(1);
        accumulator.observe(&samba_features(), &catalog, &table);

        let ranking = accumulator.mean_ranking(&catalog);
        assert_eq!(ranking.len(), catalog.len());
        for pair in ranking.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        // Strongly acoustic mid-tempo groove lands on samba first.
        assert_eq!(ranking[0].0, GenreId::from("samba"));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = GenreCatalog::builtin();
        let table = RuleTable::builtin();
        // A vector with no feature present scores 0 everywhere: a nine-way
        // tie resolved purely by catalog order.
        let suggestion = suggest_genres(&[FeatureVector::default()], &catalog, &table);
        assert_eq!(
            suggestion,
            vec![GenreId::from("rnb_trap"), GenreId::from("rnb_pop")]
        );
    }

    #[test]
    fn test_denominator_is_submitted_count() {
        let catalog = GenreCatalog::builtin();
        let table = RuleTable::builtin();

        // Three submitted, one extracted: means divide by 3.
        let mut accumulator = BatchAccumulator::new(3);
        accumulator.observe(&samba_features(), &catalog, &table);
        let partial = accumulator.mean_ranking(&catalog);

        let mut full = BatchAccumulator::new(1);
        full.observe(&samba_features(), &catalog, &table);
        let whole = full.mean_ranking(&catalog);

        let partial_samba = partial
            .iter()
            .find(|(id, _)| id == &GenreId::from("samba"))
            .unwrap()
            .1;
        let whole_samba = whole
            .iter()
            .find(|(id, _)| id == &GenreId::from("samba"))
            .unwrap()
            .1;
        assert!((partial_samba - whole_samba / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_observed_tracks_yield_no_suggestion() {
        let catalog = GenreCatalog::builtin();
        let accumulator = BatchAccumulator::new(3);
        assert!(accumulator.mean_ranking(&catalog).is_empty());
        assert!(accumulator.suggest(&catalog).is_empty());
    }

    #[test]
    fn test_empty_catalog_yields_no_suggestion() {
        let catalog = GenreCatalog::empty();
        let table = RuleTable::builtin();
        assert!(suggest_genres(&[trap_features()], &catalog, &table).is_empty());
    }
}
