//! Feature comparison against genre hit averages
//!
//! Each displayed feature is compared independently on a 0-100 percent
//! scale: within 5 percentage points of the reference mean counts as "on
//! average", otherwise the verdict carries the gap magnitude. No aggregate
//! distance short-circuits the per-feature verdicts.

use genrefit_common::models::{FeatureKey, FeatureVector, HitAverages};
use serde::{Deserialize, Serialize};

/// Features shown in the comparative display, in display order
pub const COMPARED_FEATURES: [FeatureKey; 5] = [
    FeatureKey::Danceability,
    FeatureKey::Energy,
    FeatureKey::Valence,
    FeatureKey::Acousticness,
    FeatureKey::Speechiness,
];

/// Gap (percentage points) below which a feature counts as within average
pub const WITHIN_AVERAGE_POINTS: f64 = 5.0;

/// Three-way comparison verdict; gaps are magnitudes in percentage points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "gap")]
pub enum Verdict {
    WithinAverage,
    AboveAverage(f64),
    BelowAverage(f64),
}

/// One feature's comparison outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureComparison {
    pub feature: FeatureKey,
    /// Track value on the 0-100 percent scale
    pub track_percent: f64,
    /// Reference mean on the 0-100 percent scale
    pub reference_percent: f64,
    pub verdict: Verdict,
}

/// Compare two percent values
pub fn compare_feature(track_percent: f64, reference_percent: f64) -> Verdict {
    let gap = track_percent - reference_percent;
    if gap.abs() < WITHIN_AVERAGE_POINTS {
        Verdict::WithinAverage
    } else if gap > 0.0 {
        Verdict::AboveAverage(gap)
    } else {
        Verdict::BelowAverage(-gap)
    }
}

/// Compare a track against a genre's reference means, feature by feature
///
/// A feature the track lacks compares as 0; a reference the catalog lacks
/// defaults to 0.5 (→ 50%). Pure and stateless.
pub fn compare_to_hits(
    features: &FeatureVector,
    hit_averages: &HitAverages,
) -> Vec<FeatureComparison> {
    COMPARED_FEATURES
        .iter()
        .map(|&feature| {
            let track_percent = features.get(feature).unwrap_or(0.0) * 100.0;
            let reference_percent = hit_averages.get_or_default(feature) * 100.0;
            FeatureComparison {
                feature,
                track_percent,
                reference_percent,
                verdict: compare_feature(track_percent, reference_percent),
            }
        })
        .collect()
}
