//! Genre affinity scoring
//!
//! The scoring pipeline in evaluation order:
//! - [`rules`] — hand-authored per-genre rule tables (data, not branching code)
//! - [`evaluator`] — pure rule evaluation producing clamped scores
//! - [`aggregate`] — batch accumulation and top-genre suggestion
//! - [`best_match`] — per-track highest-scoring genre selection
//! - [`compare`] — feature-by-feature comparison against genre hit averages
//! - [`recommend`] — advisory production notes derived from a feature vector

pub mod aggregate;
pub mod best_match;
pub mod compare;
pub mod evaluator;
pub mod recommend;
pub mod rules;

pub use aggregate::{suggest_genres, BatchAccumulator, SUGGESTED_GENRES};
pub use best_match::best_match;
pub use compare::{compare_to_hits, FeatureComparison, Verdict};
pub use evaluator::{score, score_track};
pub use recommend::{recommendations_for, Priority, Recommendation};
pub use rules::{Predicate, Rule, RuleTable};
