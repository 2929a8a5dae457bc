//! genrefit - genre affinity scoring CLI
//!
//! Scores audio tracks against genre style profiles by way of an external
//! audio analysis service, or suggests the best-fit genre pair for a batch.
//! Upload-layer validation (format, batch size, file size) happens here
//! before anything reaches the engine.

use anyhow::Result;
use clap::Parser;
use genrefit_common::events::{BatchEvent, EventBus};
use genrefit_common::models::{
    is_supported_extension, GenreId, MAX_BATCH_TRACKS, MAX_TRACK_BYTES,
};
use genrefit_engine::catalog::GenreCatalog;
use genrefit_engine::config::EngineConfig;
use genrefit_engine::extractor::{HttpFeatureExtractor, TrackSource};
use genrefit_engine::orchestrator::BatchOrchestrator;
use genrefit_engine::scoring::{best_match, compare_to_hits, recommendations_for, Verdict};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "genrefit",
    version,
    about = "Score audio tracks against genre style profiles"
)]
struct Cli {
    /// Audio files to analyze (mp3, wav, ogg, flac, m4a)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Genre ids to score against (repeatable); defaults to the full catalog
    #[arg(short, long = "genre", value_name = "ID")]
    genres: Vec<String>,

    /// Suggest the best-fit genre pair for the batch instead of scoring
    #[arg(long)]
    suggest: bool,

    /// Print per-track comparison against hit averages and advisories
    #[arg(long)]
    detail: bool,

    /// Analysis service base URL
    #[arg(long, value_name = "URL")]
    extractor_url: Option<String>,

    /// Genre catalog JSON file
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = EngineConfig::resolve(cli.extractor_url.as_deref(), cli.catalog.as_ref())?;
    info!(extractor_url = %config.extractor_url, "Configuration resolved");

    // Catalog unavailability degrades to "no genres to score", never a crash.
    let catalog = match &config.catalog_path {
        Some(path) => match GenreCatalog::load(path) {
            Ok(catalog) => {
                info!(path = %path.display(), genres = catalog.len(), "Catalog loaded");
                catalog
            }
            Err(e) => {
                warn!(error = %e, "Catalog unavailable, continuing without genres");
                GenreCatalog::empty()
            }
        },
        None => GenreCatalog::builtin(),
    };

    let tracks = validate_uploads(&cli.files);
    if tracks.is_empty() {
        anyhow::bail!("no valid audio files to analyze");
    }

    let extractor = Arc::new(HttpFeatureExtractor::new(
        &config.extractor_url,
        config.request_timeout_secs,
    )?);

    let event_bus = EventBus::new(100);
    spawn_progress_printer(&event_bus);

    let orchestrator = BatchOrchestrator::new(extractor, catalog, event_bus);

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current track and stopping");
            cancel_on_signal.cancel();
        }
    });

    if cli.suggest {
        run_suggestion(&orchestrator, &tracks, &cancel).await
    } else {
        run_scoring(&orchestrator, &tracks, &cli, &cancel).await
    }
}

async fn run_suggestion(
    orchestrator: &BatchOrchestrator,
    tracks: &[TrackSource],
    cancel: &CancellationToken,
) -> Result<()> {
    let suggestion = orchestrator.suggest_for_batch(tracks, cancel).await?;
    if suggestion.is_empty() {
        println!("No suggestion available (no track could be analyzed).");
        return Ok(());
    }

    let names: Vec<&str> = suggestion
        .iter()
        .map(|id| orchestrator.catalog().display_name(id))
        .collect();
    println!("Suggested genres: {}", names.join(", "));
    Ok(())
}

async fn run_scoring(
    orchestrator: &BatchOrchestrator,
    tracks: &[TrackSource],
    cli: &Cli,
    cancel: &CancellationToken,
) -> Result<()> {
    let genre_ids: Vec<GenreId> = if cli.genres.is_empty() {
        orchestrator.catalog().ids()
    } else {
        cli.genres.iter().map(|id| GenreId::new(id.clone())).collect()
    };
    if genre_ids.is_empty() {
        anyhow::bail!("no genres to score: catalog is empty and none were selected");
    }

    let outcome = orchestrator.run_batch(tracks, &genre_ids, cancel).await?;

    for result in &outcome.results {
        println!("\n{}", result.filename);
        for genre in &genre_ids {
            let score = result.scores.get(genre).unwrap_or(0.0);
            println!(
                "  {:<24} {:>6.1}",
                orchestrator.catalog().display_name(genre),
                score
            );
        }
        if let Some(best) = best_match(&result.scores, &genre_ids) {
            println!(
                "  best match: {}",
                orchestrator.catalog().display_name(&best)
            );

            if cli.detail {
                print_detail(orchestrator, result, &best);
            }
        }
    }

    for failure in &outcome.failures {
        println!("\nFAILED {}: {}", failure.filename, failure.message);
    }

    if outcome.is_total_failure() {
        anyhow::bail!("all {} tracks failed analysis", outcome.failures.len());
    }
    Ok(())
}

fn print_detail(
    orchestrator: &BatchOrchestrator,
    result: &genrefit_common::models::TrackResult,
    best: &GenreId,
) {
    let hit_averages = orchestrator
        .catalog()
        .get(best)
        .and_then(|profile| profile.hit_averages.clone())
        .unwrap_or_default();

    for comparison in compare_to_hits(&result.features, &hit_averages) {
        let verdict = match comparison.verdict {
            Verdict::WithinAverage => "within hit average".to_string(),
            Verdict::AboveAverage(gap) => format!("{:.0}% above hits", gap),
            Verdict::BelowAverage(gap) => format!("{:.0}% below hits", gap),
        };
        println!(
            "    {:<18} {:>3.0}% (hits {:.0}%) {}",
            comparison.feature.as_str(),
            comparison.track_percent,
            comparison.reference_percent,
            verdict
        );
    }

    for recommendation in recommendations_for(&result.features) {
        println!(
            "    [{}] {}: {}",
            match recommendation.priority {
                genrefit_engine::scoring::Priority::High => "high",
                genrefit_engine::scoring::Priority::Medium => "medium",
                genrefit_engine::scoring::Priority::Low => "low",
            },
            recommendation.category,
            recommendation.message
        );
    }
}

/// Upload-layer validation: supported extension, per-file size limit, and
/// batch size cap
fn validate_uploads(files: &[PathBuf]) -> Vec<TrackSource> {
    let mut tracks = Vec::new();

    for path in files {
        let source = TrackSource::from_path(path);
        if !is_supported_extension(&source.filename) {
            warn!(file = %source.filename, "Skipping unsupported format");
            continue;
        }
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.len() > MAX_TRACK_BYTES => {
                warn!(
                    file = %source.filename,
                    bytes = metadata.len(),
                    "Skipping file over the 50MB limit"
                );
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(file = %source.filename, error = %e, "Skipping unreadable file");
                continue;
            }
        }
        tracks.push(source);
    }

    if tracks.len() > MAX_BATCH_TRACKS {
        warn!(
            submitted = tracks.len(),
            limit = MAX_BATCH_TRACKS,
            "Batch truncated to the track limit"
        );
        tracks.truncate(MAX_BATCH_TRACKS);
    }

    tracks
}

/// Render progress events as console output while a batch runs
fn spawn_progress_printer(event_bus: &EventBus) {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                BatchEvent::TrackStarted {
                    filename, fraction, ..
                } => {
                    println!("[{:>3.0}%] analyzing {}", fraction * 100.0, filename);
                }
                BatchEvent::TrackFailed {
                    filename, message, ..
                } => {
                    println!("[skip] {}: {}", filename, message);
                }
                BatchEvent::BatchCompleted {
                    succeeded, failed, ..
                } => {
                    println!("[100%] done ({} ok, {} failed)", succeeded, failed);
                }
                BatchEvent::BatchCancelled { attempted, .. } => {
                    println!("[stop] cancelled after {} tracks", attempted);
                }
                _ => {}
            }
        }
    });
}
