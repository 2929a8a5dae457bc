//! Batch orchestration
//!
//! Drives the end-to-end flow: per submitted track, request its feature
//! vector from the extraction collaborator, score it against the selected
//! genres, and collect results in submission order. A single track's
//! failure never aborts the batch; it is recorded and reported, and the
//! loop moves on. Tracks are processed strictly sequentially — the external
//! call is the only suspension point, and display order must follow
//! submission order.

use crate::catalog::GenreCatalog;
use crate::extractor::{FeatureExtractor, TrackSource};
use crate::scoring::aggregate::BatchAccumulator;
use crate::scoring::{evaluator, RuleTable};
use chrono::Utc;
use genrefit_common::events::{BatchEvent, EventBus};
use genrefit_common::models::{GenreId, TrackFailure, TrackResult};
use genrefit_common::{Error, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Outcome of one batch run
///
/// `results` preserves submission order for the tracks that succeeded;
/// `failures` carries one record per skipped track. A cancelled run keeps
/// everything accumulated up to the cancellation point.
#[derive(Debug)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub results: Vec<TrackResult>,
    pub failures: Vec<TrackFailure>,
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Whether the batch produced nothing despite attempting tracks
    ///
    /// The caller surfaces this as one overall failure, distinct from the
    /// per-track reports already emitted.
    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty() && !self.failures.is_empty()
    }
}

/// Batch orchestrator service
pub struct BatchOrchestrator {
    extractor: Arc<dyn FeatureExtractor>,
    catalog: GenreCatalog,
    rules: RuleTable,
    event_bus: EventBus,
}

impl BatchOrchestrator {
    pub fn new(
        extractor: Arc<dyn FeatureExtractor>,
        catalog: GenreCatalog,
        event_bus: EventBus,
    ) -> Self {
        Self {
            extractor,
            catalog,
            rules: RuleTable::builtin(),
            event_bus,
        }
    }

    /// Replace the built-in rule table (custom genre sets)
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    pub fn catalog(&self) -> &GenreCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Score one already-extracted track against a genre selection
    pub fn score_track(
        &self,
        features: &genrefit_common::models::FeatureVector,
        genre_ids: &[GenreId],
    ) -> genrefit_common::models::ScoreResult {
        evaluator::score_track(features, genre_ids, &self.rules)
    }

    /// Run a batch: extract, score, and collect per-track results
    ///
    /// Fails fast on empty input; per-track extraction failures are
    /// reported and skipped. Cancellation between tracks abandons the
    /// remainder and returns partial results.
    pub async fn run_batch(
        &self,
        tracks: &[TrackSource],
        genre_ids: &[GenreId],
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        if tracks.is_empty() {
            return Err(Error::EmptyInput("batch contains no tracks".to_string()));
        }
        if genre_ids.is_empty() {
            return Err(Error::EmptyInput("no genres selected".to_string()));
        }

        let batch_id = Uuid::new_v4();
        let total = tracks.len();

        tracing::info!(
            batch_id = %batch_id,
            track_count = total,
            genre_count = genre_ids.len(),
            extractor = self.extractor.name(),
            "Starting batch run"
        );

        self.event_bus.emit_lossy(BatchEvent::BatchStarted {
            batch_id,
            track_count: total,
            timestamp: Utc::now(),
        });

        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut cancelled = false;
        let mut attempted = 0;

        for (index, track) in tracks.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(
                    batch_id = %batch_id,
                    attempted,
                    "Batch cancelled, returning partial results"
                );
                cancelled = true;
                self.event_bus.emit_lossy(BatchEvent::BatchCancelled {
                    batch_id,
                    attempted,
                    timestamp: Utc::now(),
                });
                break;
            }

            self.event_bus.emit_lossy(BatchEvent::TrackStarted {
                batch_id,
                index,
                filename: track.filename.clone(),
                fraction: index as f64 / total as f64,
                timestamp: Utc::now(),
            });

            tracing::info!(
                batch_id = %batch_id,
                file = %track.filename,
                progress = format!("{}/{}", index + 1, total),
                "Analyzing track"
            );

            attempted += 1;

            match self.extractor.extract(track, genre_ids).await {
                Ok(outcome) => {
                    tracing::debug!(
                        batch_id = %batch_id,
                        file = %track.filename,
                        remote_scores = outcome.scores.len(),
                        "Extraction succeeded"
                    );

                    let scores = evaluator::score_track(&outcome.features, genre_ids, &self.rules);
                    results.push(TrackResult {
                        filename: track.filename.clone(),
                        features: outcome.features,
                        scores,
                    });

                    self.event_bus.emit_lossy(BatchEvent::TrackCompleted {
                        batch_id,
                        index,
                        filename: track.filename.clone(),
                        fraction: (index + 1) as f64 / total as f64,
                        timestamp: Utc::now(),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        batch_id = %batch_id,
                        file = %track.filename,
                        error = %e,
                        "Extraction failed, skipping track"
                    );

                    failures.push(TrackFailure {
                        filename: track.filename.clone(),
                        message: e.to_string(),
                    });

                    self.event_bus.emit_lossy(BatchEvent::TrackFailed {
                        batch_id,
                        index,
                        filename: track.filename.clone(),
                        message: e.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        if !cancelled {
            self.event_bus.emit_lossy(BatchEvent::BatchCompleted {
                batch_id,
                succeeded: results.len(),
                failed: failures.len(),
                timestamp: Utc::now(),
            });
        }

        tracing::info!(
            batch_id = %batch_id,
            succeeded = results.len(),
            failed = failures.len(),
            cancelled,
            "Batch run finished"
        );

        Ok(BatchOutcome {
            batch_id,
            results,
            failures,
            cancelled,
        })
    }

    /// Suggest the best-fit genre pair for a batch of tracks
    ///
    /// Extracts each track against the full catalog, skipping failures; the
    /// ranking denominator stays at the submitted track count. Returns the
    /// empty list when nothing could be scored ("no suggestion available").
    pub async fn suggest_for_batch(
        &self,
        tracks: &[TrackSource],
        cancel: &CancellationToken,
    ) -> Result<Vec<GenreId>> {
        if tracks.is_empty() {
            return Err(Error::EmptyInput("no tracks to suggest from".to_string()));
        }

        let catalog_ids = self.catalog.ids();
        let mut accumulator = BatchAccumulator::new(tracks.len());

        for (index, track) in tracks.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(attempted = index, "Suggestion pass cancelled");
                break;
            }

            match self.extractor.extract(track, &catalog_ids).await {
                Ok(outcome) => {
                    accumulator.observe(&outcome.features, &self.catalog, &self.rules);
                }
                Err(e) => {
                    tracing::warn!(
                        file = %track.filename,
                        error = %e,
                        "Extraction failed during suggestion pass, skipping track"
                    );
                }
            }
        }

        let suggestion = accumulator.suggest(&self.catalog);
        tracing::info!(
            submitted = tracks.len(),
            scored = accumulator.observed(),
            suggestion = ?suggestion.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
            "Suggestion pass finished"
        );
        Ok(suggestion)
    }
}
