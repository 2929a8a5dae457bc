//! Per-genre scoring rule tables
//!
//! Each genre's affinity rules are plain data: an ordered list of
//! (predicate, delta) pairs over single feature fields. Positive deltas are
//! bonuses, negative deltas are penalties that suppress false positives
//! (e.g. a rap-driven genre loses points when speechiness is low no matter
//! what else fired). Adding a genre means adding rows, not new code paths.

use genrefit_common::models::{FeatureKey, FeatureVector, GenreId};
use std::collections::HashMap;

/// Numeric comparison over a single feature value
///
/// `Between` is inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    LessThan(f64),
    GreaterThan(f64),
    Between(f64, f64),
}

impl Predicate {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Predicate::LessThan(limit) => value < limit,
            Predicate::GreaterThan(limit) => value > limit,
            Predicate::Between(lo, hi) => value >= lo && value <= hi,
        }
    }
}

/// One scoring rule: a predicate over one feature, and the delta it
/// contributes when the predicate holds
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub feature: FeatureKey,
    pub predicate: Predicate,
    pub delta: f64,
}

impl Rule {
    pub fn new(feature: FeatureKey, predicate: Predicate, delta: f64) -> Self {
        Self {
            feature,
            predicate,
            delta,
        }
    }

    /// Whether this rule fires for the given vector
    ///
    /// A feature absent from the vector never matches.
    pub fn matches(&self, features: &FeatureVector) -> bool {
        features
            .get(self.feature)
            .map(|value| self.predicate.holds(value))
            .unwrap_or(false)
    }
}

/// Mapping from genre id to its ordered rule list
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<GenreId, Vec<Rule>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a genre's rule set
    pub fn insert(&mut self, genre: GenreId, rules: Vec<Rule>) {
        self.rules.insert(genre, rules);
    }

    /// Rules for a genre; unknown genres have no rules and score 0
    pub fn rules_for(&self, genre: &GenreId) -> &[Rule] {
        self.rules.get(genre).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, genre: &GenreId) -> bool {
        self.rules.contains_key(genre)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The built-in rule table for the nine Brazilian market genres
    pub fn builtin() -> Self {
        use FeatureKey::*;
        use Predicate::*;

        let mut table = Self::new();

        table.insert(
            GenreId::from("rnb_trap"),
            vec![
                Rule::new(Bpm, LessThan(95.0), 30.0),
                Rule::new(Speechiness, GreaterThan(0.2), 35.0),
                Rule::new(Energy, GreaterThan(0.7), 20.0),
                Rule::new(Danceability, GreaterThan(0.6), 15.0),
                // trap is not acoustic
                Rule::new(Acousticness, GreaterThan(0.5), -40.0),
                // trap needs rap vocals
                Rule::new(Speechiness, LessThan(0.15), -30.0),
            ],
        );

        table.insert(
            GenreId::from("rnb_pop"),
            vec![
                Rule::new(Bpm, Between(95.0, 120.0), 25.0),
                Rule::new(Speechiness, LessThan(0.15), 20.0),
                Rule::new(Valence, GreaterThan(0.5), 25.0),
                Rule::new(Danceability, GreaterThan(0.6), 15.0),
                Rule::new(Acousticness, GreaterThan(0.4), 10.0),
            ],
        );

        table.insert(
            GenreId::from("mpb_rock"),
            vec![
                Rule::new(Energy, GreaterThan(0.6), 30.0),
                Rule::new(Loudness, GreaterThan(-7.0), 25.0),
                Rule::new(Bpm, GreaterThan(110.0), 20.0),
                Rule::new(Acousticness, LessThan(0.4), 15.0),
            ],
        );

        table.insert(
            GenreId::from("mpb_indie"),
            vec![
                Rule::new(Acousticness, GreaterThan(0.5), 35.0),
                Rule::new(Valence, Between(0.4, 0.7), 25.0),
                Rule::new(Bpm, Between(95.0, 120.0), 20.0),
                Rule::new(Energy, Between(0.4, 0.65), 15.0),
                Rule::new(Speechiness, LessThan(0.15), 15.0),
            ],
        );

        table.insert(
            GenreId::from("sertanejo"),
            vec![
                Rule::new(Bpm, GreaterThan(120.0), 30.0),
                Rule::new(Danceability, GreaterThan(0.7), 25.0),
                Rule::new(Valence, GreaterThan(0.6), 20.0),
                Rule::new(Acousticness, GreaterThan(0.4), 15.0),
            ],
        );

        table.insert(
            GenreId::from("pagode"),
            vec![
                Rule::new(Bpm, Between(100.0, 130.0), 25.0),
                Rule::new(Danceability, GreaterThan(0.7), 30.0),
                Rule::new(Acousticness, GreaterThan(0.5), 20.0),
                Rule::new(Valence, GreaterThan(0.6), 15.0),
            ],
        );

        table.insert(
            GenreId::from("samba"),
            vec![
                Rule::new(Bpm, Between(90.0, 120.0), 30.0),
                Rule::new(Acousticness, GreaterThan(0.6), 35.0),
                Rule::new(Danceability, GreaterThan(0.6), 20.0),
                Rule::new(Valence, GreaterThan(0.5), 15.0),
                Rule::new(Speechiness, LessThan(0.15), 10.0),
            ],
        );

        table.insert(
            GenreId::from("forro"),
            vec![
                Rule::new(Bpm, Between(110.0, 140.0), 30.0),
                Rule::new(Danceability, GreaterThan(0.7), 25.0),
                Rule::new(Acousticness, GreaterThan(0.4), 20.0),
            ],
        );

        table.insert(
            GenreId::from("pop_urban_brasil"),
            vec![
                Rule::new(Energy, GreaterThan(0.6), 25.0),
                Rule::new(Danceability, GreaterThan(0.65), 25.0),
                Rule::new(Loudness, GreaterThan(-6.0), 20.0),
                Rule::new(Valence, GreaterThan(0.5), 15.0),
            ],
        );

        table
    }
}
