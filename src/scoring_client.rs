use crate::errors::AppError;
use crate::models::{FeatureVector, Score, ScoreResult, ScoreSource};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Score substituted whenever the scoring service cannot produce a usable answer.
///
/// Deliberately low so that unknown risk lands in the review tier.
pub const FALLBACK_SCORE: f64 = 0.1;

/// Returns [`FALLBACK_SCORE`] as a [`Score`].
pub fn fallback_score() -> Score {
    Score::new(FALLBACK_SCORE).unwrap_or_else(|| unreachable!("fallback score is in range"))
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    features: &'a FeatureVector,
}

#[derive(Deserialize)]
struct ScoreResponse {
    #[serde(alias = "probability")]
    score: f64,
}

/// Reasons a scoring call fell back. Logged, never returned to callers.
#[derive(Debug)]
enum ScoringFailure {
    Timeout,
    Transport(String),
    Status(StatusCode, String),
    MalformedBody(String),
    OutOfRange(f64),
}

impl fmt::Display for ScoringFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringFailure::Timeout => write!(f, "scoring request timed out"),
            ScoringFailure::Transport(msg) => write!(f, "scoring request failed: {}", msg),
            ScoringFailure::Status(status, body) => {
                write!(f, "scoring service returned {}: {}", status, body)
            }
            ScoringFailure::MalformedBody(msg) => {
                write!(f, "failed to parse scoring response: {}", msg)
            }
            ScoringFailure::OutOfRange(value) => {
                write!(f, "scoring service returned out-of-range score {}", value)
            }
        }
    }
}

impl From<reqwest::Error> for ScoringFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScoringFailure::Timeout
        } else if err.is_decode() {
            ScoringFailure::MalformedBody(err.to_string())
        } else {
            ScoringFailure::Transport(err.to_string())
        }
    }
}

/// Client for the external repayment scoring service.
#[derive(Clone)]
pub struct ScoringClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ScoringClient {
    /// Creates a new `ScoringClient`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL the feature vector is posted to.
    /// * `timeout` - Upper bound on the whole request, body included.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create scoring client: {}", e))
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Scores a feature vector.
    ///
    /// Makes exactly one request. Any failure is logged and replaced with
    /// [`FALLBACK_SCORE`].
    pub async fn score(&self, features: &FeatureVector) -> ScoreResult {
        match self.request_score(features).await {
            Ok(score) => {
                tracing::debug!("Scoring service returned {} for {:?}", score, features);
                ScoreResult {
                    score,
                    source: ScoreSource::Service,
                }
            }
            Err(failure) => {
                tracing::warn!(
                    "Scoring unavailable ({}), using fallback score {}",
                    failure,
                    FALLBACK_SCORE
                );
                ScoreResult {
                    score: fallback_score(),
                    source: ScoreSource::Fallback,
                }
            }
        }
    }

    async fn request_score(&self, features: &FeatureVector) -> Result<Score, ScoringFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScoreRequest { features })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScoringFailure::Status(status, error_text));
        }

        let body: ScoreResponse = response.json().await?;

        Score::new(body.score).ok_or(ScoringFailure::OutOfRange(body.score))
    }
}
