//! Risk scoring backends
//!
//! [`RiskScorer`] is the seam between the submission controller and
//! whatever turns a [`FeatureVector`] into a [`PredictionResult`]:
//!
//! - [`HttpScorer`] posts the vector to `{backend}/predict`.
//! - [`PlaceholderScorer`] is a fixed arithmetic stand-in used when no
//!   backend is configured. It is not a model.

pub mod http;
pub mod placeholder;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::form::FeatureVector;

pub use http::HttpScorer;
pub use placeholder::PlaceholderScorer;

/// Result type for scoring backends
pub type ScoreResult = std::result::Result<PredictionResult, BackendError>;

/// Binary class reported alongside the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PredictedClass {
    Negative,
    Positive,
}

impl TryFrom<u8> for PredictedClass {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(PredictedClass::Negative),
            1 => Ok(PredictedClass::Positive),
            other => Err(format!("prediction must be 0 or 1, got {other}")),
        }
    }
}

impl From<PredictedClass> for u8 {
    fn from(class: PredictedClass) -> Self {
        match class {
            PredictedClass::Negative => 0,
            PredictedClass::Positive => 1,
        }
    }
}

/// Outcome of one successful submission.
///
/// `probability` is stored as received; the presenter clamps it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "prediction")]
    pub predicted_class: PredictedClass,
    pub probability: f64,
}

impl PredictionResult {
    /// Parse and validate a backend response body.
    ///
    /// Rejects bodies that are not `{ "prediction": 0|1, "probability": n }`.
    pub fn from_response_body(body: &[u8]) -> ScoreResult {
        let result: PredictionResult = serde_json::from_slice(body)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        if !result.probability.is_finite() {
            return Err(BackendError::MalformedResponse(format!(
                "probability is not finite: {}",
                result.probability
            )));
        }
        Ok(result)
    }
}

/// Turns a feature vector into a prediction.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    /// Score one submission. Called at most once per submit.
    async fn score(&self, features: &FeatureVector) -> ScoreResult;

    /// Short name used in logs and CLI output.
    fn describe(&self) -> String;

    /// Whether results come from a stand-in rather than a real model.
    fn is_placeholder(&self) -> bool {
        false
    }
}

#[async_trait]
impl<T: RiskScorer + ?Sized> RiskScorer for Box<T> {
    async fn score(&self, features: &FeatureVector) -> ScoreResult {
        (**self).score(features).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn is_placeholder(&self) -> bool {
        (**self).is_placeholder()
    }
}
