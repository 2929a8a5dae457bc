//! Per-track best-match selection
//!
//! Picks the highest-scoring genre out of a caller-chosen subset. The
//! comparison is strictly greater-than, so the first genre reaching the
//! maximum wins ties — this drives which genre a track is labeled with, and
//! flipping it to `>=` would silently change the label to last-wins.

use genrefit_common::models::{GenreId, ScoreResult};

/// Highest-scoring genre for a track, restricted to `genre_ids`
///
/// Iterates the subset in the caller's order; genres without a score are
/// skipped. Returns `None` for an empty subset or when no listed genre has a
/// score.
pub fn best_match(scores: &ScoreResult, genre_ids: &[GenreId]) -> Option<GenreId> {
    let mut best: Option<(&GenreId, f64)> = None;
    for genre in genre_ids {
        if let Some(score) = scores.get(genre) {
            let replaces = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if replaces {
                best = Some((genre, score));
            }
        }
    }
    best.map(|(genre, _)| genre.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> ScoreResult {
        pairs
            .iter()
            .map(|(id, score)| (GenreId::from(*id), *score))
            .collect()
    }

    #[test]
    fn test_empty_subset_returns_none() {
        let result = scores(&[("samba", 80.0)]);
        assert_eq!(best_match(&result, &[]), None);
    }

    #[test]
    fn test_no_scores_returns_none() {
        let result = ScoreResult::new();
        assert_eq!(best_match(&result, &[GenreId::from("samba")]), None);
    }

    #[test]
    fn test_picks_maximum() {
        let result = scores(&[("samba", 40.0), ("pagode", 90.0), ("forro", 65.0)]);
        let subset = vec![
            GenreId::from("samba"),
            GenreId::from("pagode"),
            GenreId::from("forro"),
        ];
        assert_eq!(best_match(&result, &subset), Some(GenreId::from("pagode")));
    }

    #[test]
    fn test_ties_go_to_first_in_input_order() {
        let result = scores(&[("samba", 75.0), ("pagode", 75.0)]);

        let subset = vec![GenreId::from("samba"), GenreId::from("pagode")];
        assert_eq!(best_match(&result, &subset), Some(GenreId::from("samba")));

        // Reversing the caller's order flips the winner.
        let reversed = vec![GenreId::from("pagode"), GenreId::from("samba")];
        assert_eq!(best_match(&result, &reversed), Some(GenreId::from("pagode")));
    }

    #[test]
    fn test_unscored_genres_are_skipped() {
        let result = scores(&[("forro", 10.0)]);
        let subset = vec![GenreId::from("samba"), GenreId::from("forro")];
        assert_eq!(best_match(&result, &subset), Some(GenreId::from("forro")));
    }

    #[test]
    fn test_zero_scores_still_select_first() {
        let result = scores(&[("samba", 0.0), ("pagode", 0.0)]);
        let subset = vec![GenreId::from("samba"), GenreId::from("pagode")];
        assert_eq!(best_match(&result, &subset), Some(GenreId::from("samba")));
    }
}
