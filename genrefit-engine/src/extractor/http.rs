//! HTTP client for the audio analysis service
//!
//! Uploads the track as multipart form data to the service's `/analyze`
//! endpoint together with the selected genre ids, and parses the JSON
//! response into an [`ExtractionOutcome`].

use super::{ExtractionError, ExtractionOutcome, FeatureExtractor, TrackSource};
use async_trait::async_trait;
use genrefit_common::models::{is_supported_extension, FeatureVector, GenreId};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("genrefit/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Analysis service response for one track
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    features: FeatureVector,
    /// Per-genre predictions; absent when the service scored no genres
    #[serde(default)]
    predictions: HashMap<String, GenrePrediction>,
}

#[derive(Debug, Deserialize)]
struct GenrePrediction {
    hit_score: f64,
}

/// Error body the service returns on failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
}

/// Production [`FeatureExtractor`] backed by the analysis HTTP service
pub struct HttpFeatureExtractor {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpFeatureExtractor {
    /// Create a client against the given service base URL
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }

    /// Extract the most useful message from a failed response body
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed
                .error
                .or(parsed.details)
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}", status),
        }
    }

    fn parse_outcome(response: AnalyzeResponse) -> ExtractionOutcome {
        let scores = response
            .predictions
            .into_iter()
            .map(|(id, prediction)| (GenreId::new(id), prediction.hit_score))
            .collect();
        ExtractionOutcome {
            features: response.features,
            scores,
        }
    }
}

#[async_trait]
impl FeatureExtractor for HttpFeatureExtractor {
    fn name(&self) -> &'static str {
        "analysis-http"
    }

    async fn extract(
        &self,
        track: &TrackSource,
        genre_ids: &[GenreId],
    ) -> Result<ExtractionOutcome, ExtractionError> {
        if !is_supported_extension(&track.filename) {
            return Err(ExtractionError::UnsupportedFormat(track.filename.clone()));
        }

        let payload = tokio::fs::read(&track.path).await?;

        debug!(
            file = %track.filename,
            bytes = payload.len(),
            genres = genre_ids.len(),
            url = %self.analyze_url(),
            "Requesting feature extraction"
        );

        let mut form = reqwest::multipart::Form::new().part(
            "audio",
            reqwest::multipart::Part::bytes(payload).file_name(track.filename.clone()),
        );
        for genre in genre_ids {
            form = form.text("genres[]", genre.as_str().to_string());
        }

        let response = self
            .http_client
            .post(self.analyze_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api(
                status.as_u16(),
                Self::error_message(status, &body),
            ));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        debug!(
            file = %track.filename,
            remote_scores = parsed.predictions.len(),
            "Feature extraction complete"
        );

        Ok(Self::parse_outcome(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let extractor = HttpFeatureExtractor::new("http://localhost:5000/", 10).unwrap();
        assert_eq!(extractor.analyze_url(), "http://localhost:5000/analyze");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "success": true,
            "filename": "demo.mp3",
            "features": {"bpm": 96.0, "energy": 0.7, "speechiness": 0.22},
            "predictions": {
                "rnb_trap": {"hit_score": 88.0, "prediction_method": "heuristic"},
                "samba": {"hit_score": 12.0}
            }
        }"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        let outcome = HttpFeatureExtractor::parse_outcome(response);

        assert_eq!(outcome.features.bpm, Some(96.0));
        assert_eq!(outcome.scores.get(&GenreId::from("rnb_trap")), Some(&88.0));
        assert_eq!(outcome.scores.len(), 2);
    }

    #[test]
    fn test_response_without_predictions() {
        let json = r#"{"features": {"bpm": 120.0}}"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        let outcome = HttpFeatureExtractor::parse_outcome(response);
        assert!(outcome.scores.is_empty());
    }

    #[test]
    fn test_error_message_prefers_service_error() {
        let message = HttpFeatureExtractor::error_message(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error": "corrupt audio stream"}"#,
        );
        assert_eq!(message, "corrupt audio stream");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let message =
            HttpFeatureExtractor::error_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(message, "HTTP 500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_unsupported_extension_fails_before_network() {
        let extractor = HttpFeatureExtractor::new("http://localhost:5000", 10).unwrap();
        let track = TrackSource::new("notes.txt", "/tmp/notes.txt");
        let err = extractor
            .extract(&track, &[GenreId::from("samba")])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }
}
