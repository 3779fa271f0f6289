//! HTTP scoring backend
//!
//! Posts `{"features": [...]}` to the configured `/predict` endpoint and
//! validates the response before trusting it. One request per call; no
//! retries and no timeout beyond the transport default.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{PredictionResult, RiskScorer, ScoreResult};
use crate::error::{BackendError, ConfigError};
use crate::form::FeatureVector;

/// Request body sent to the backend.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub features: &'a FeatureVector,
}

/// Scorer backed by a remote `/predict` endpoint
pub struct HttpScorer {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpScorer {
    /// Create a scorer for a full endpoint URL (including `/predict`).
    pub fn new(
        endpoint: &str,
        user_agent: &str,
        use_system_proxy: bool,
    ) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if !use_system_proxy {
            builder = builder.no_proxy();
        }
        let http_client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(HttpScorer {
            endpoint: endpoint.to_string(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RiskScorer for HttpScorer {
    async fn score(&self, features: &FeatureVector) -> ScoreResult {
        debug!(endpoint = %self.endpoint, "posting features");

        // .json() sets Content-Type: application/json
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&PredictRequest { features })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        PredictionResult::from_response_body(&body)
    }

    fn describe(&self) -> String {
        format!("http backend at {}", self.endpoint)
    }
}
