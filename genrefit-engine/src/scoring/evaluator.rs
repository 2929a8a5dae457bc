//! Rule evaluation
//!
//! Evaluation is order-independent: every rule whose predicate holds
//! contributes its delta, and the raw sum is clamped to a floor of 0 exactly
//! once, after summation. There is no upper clamp. The evaluator carries no
//! state and performs no I/O.

use super::rules::{Rule, RuleTable};
use genrefit_common::models::{FeatureVector, GenreId, ScoreResult};

/// Evaluate one rule set against a feature vector
///
/// Returns the clamped, non-negative affinity score. Rules over features
/// absent from the vector do not fire; an empty rule set scores 0.
pub fn score(features: &FeatureVector, rules: &[Rule]) -> f64 {
    let total: f64 = rules
        .iter()
        .filter(|rule| rule.matches(features))
        .map(|rule| rule.delta)
        .sum();
    total.max(0.0)
}

/// Evaluate one genre from a rule table
pub fn score_genre(features: &FeatureVector, genre: &GenreId, table: &RuleTable) -> f64 {
    score(features, table.rules_for(genre))
}

/// Score a track against a selected set of genres
///
/// Produces a fresh [`ScoreResult`]; genres without rules score 0.
pub fn score_track(
    features: &FeatureVector,
    genre_ids: &[GenreId],
    table: &RuleTable,
) -> ScoreResult {
    genre_ids
        .iter()
        .map(|genre| (genre.clone(), score_genre(features, genre, table)))
        .collect()
}
