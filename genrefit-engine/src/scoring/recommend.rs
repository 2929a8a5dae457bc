//! Advisory production notes
//!
//! Threshold-gated suggestions derived from a track's features against the
//! ideal ranges observed in chart hits (tempo 110-130 BPM, energy 0.5-0.9,
//! danceability 0.6-0.95, duration 2.5-4 minutes). Purely informational —
//! nothing here feeds back into scoring.

use genrefit_common::models::FeatureVector;
use serde::{Deserialize, Serialize};

const IDEAL_BPM: (f64, f64) = (110.0, 130.0);
const IDEAL_ENERGY: (f64, f64) = (0.5, 0.9);
const IDEAL_DANCEABILITY: (f64, f64) = (0.6, 0.95);
const IDEAL_DURATION_SECS: (f64, f64) = (150.0, 240.0);

/// Advisory priority shown alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One production advisory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
    pub priority: Priority,
}

impl Recommendation {
    fn new(category: &str, message: String, priority: Priority) -> Self {
        Self {
            category: category.to_string(),
            message,
            priority,
        }
    }
}

/// Closeness of a value to an ideal range, on a 0-1 scale
///
/// 1.0 inside the range, falling off with relative distance outside it.
/// Only meaningful for positive-valued ranges.
fn range_score(value: f64, ideal_min: f64, ideal_max: f64) -> f64 {
    if value < ideal_min {
        let penalty = ((ideal_min - value) / ideal_min).min(1.0);
        1.0 - penalty
    } else if value > ideal_max {
        let penalty = ((value - ideal_max) / ideal_max).min(1.0);
        1.0 - penalty
    } else {
        1.0
    }
}

/// Generate advisories for a feature vector
///
/// Features missing from the vector produce no advisory. When nothing is
/// flagged, a single low-priority "keep going" entry is returned instead of
/// an empty list.
pub fn recommendations_for(features: &FeatureVector) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if let Some(bpm) = features.bpm {
        if range_score(bpm, IDEAL_BPM.0, IDEAL_BPM.1) < 0.7 {
            if bpm < IDEAL_BPM.0 {
                recommendations.push(Recommendation::new(
                    "Tempo",
                    format!(
                        "BPM ({:.0}) is below the ideal range. Consider raising it toward 110-130 BPM.",
                        bpm
                    ),
                    Priority::High,
                ));
            } else if bpm > IDEAL_BPM.1 {
                recommendations.push(Recommendation::new(
                    "Tempo",
                    format!(
                        "BPM ({:.0}) is above the ideal range. Consider bringing it down toward 110-130 BPM.",
                        bpm
                    ),
                    Priority::Medium,
                ));
            }
        }
    }

    if let Some(danceability) = features.danceability {
        if range_score(danceability, IDEAL_DANCEABILITY.0, IDEAL_DANCEABILITY.1) < 0.6 {
            recommendations.push(Recommendation::new(
                "Danceability",
                "Low danceability. Add more regular, pronounced rhythmic elements.".to_string(),
                Priority::High,
            ));
        }
    }

    if let Some(energy) = features.energy {
        if range_score(energy, IDEAL_ENERGY.0, IDEAL_ENERGY.1) < 0.6 {
            recommendations.push(Recommendation::new(
                "Energy",
                "Low energy. Consider raising the production's dynamics and intensity.".to_string(),
                Priority::Medium,
            ));
        }
    }

    if let Some(duration) = features.duration {
        if duration > IDEAL_DURATION_SECS.1 {
            recommendations.push(Recommendation::new(
                "Duration",
                format!(
                    "Track runs long ({:.1} min). Consider editing it toward 3-4 minutes.",
                    duration / 60.0
                ),
                Priority::Medium,
            ));
        } else if duration < IDEAL_DURATION_SECS.0 {
            recommendations.push(Recommendation::new(
                "Duration",
                format!(
                    "Track is short ({:.1} min). Consider expanding it toward 2.5-4 minutes.",
                    duration / 60.0
                ),
                Priority::Low,
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            "General",
            "Solid characteristics. Keep refining the production and the mix.".to_string(),
            Priority::Low,
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_score_inside_range() {
        assert_eq!(range_score(120.0, 110.0, 130.0), 1.0);
        assert_eq!(range_score(110.0, 110.0, 130.0), 1.0);
    }

    #[test]
    fn test_range_score_falls_off_outside() {
        let below = range_score(55.0, 110.0, 130.0);
        assert!(below < 0.7);
        let above = range_score(260.0, 110.0, 130.0);
        assert!(above < 0.7);
    }

    #[test]
    fn test_slow_track_gets_high_priority_tempo_note() {
        let features = FeatureVector {
            bpm: Some(70.0),
            ..Default::default()
        };
        let recommendations = recommendations_for(&features);
        let tempo = recommendations
            .iter()
            .find(|r| r.category == "Tempo")
            .expect("tempo advisory");
        assert_eq!(tempo.priority, Priority::High);
        assert!(tempo.message.contains("70"));
    }

    #[test]
    fn test_long_track_gets_duration_note() {
        let features = FeatureVector {
            duration: Some(330.0),
            ..Default::default()
        };
        let recommendations = recommendations_for(&features);
        assert!(recommendations.iter().any(|r| r.category == "Duration"));
    }

    #[test]
    fn test_well_formed_track_gets_general_note_only() {
        let features = FeatureVector {
            bpm: Some(122.0),
            energy: Some(0.7),
            danceability: Some(0.8),
            duration: Some(200.0),
            ..Default::default()
        };
        let recommendations = recommendations_for(&features);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].category, "General");
        assert_eq!(recommendations[0].priority, Priority::Low);
    }

    #[test]
    fn test_missing_features_produce_no_specific_notes() {
        let recommendations = recommendations_for(&FeatureVector::default());
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].category, "General");
    }
}
