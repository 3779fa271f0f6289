//! Error types for cardiorisk-core

use thiserror::Error;

/// Message shown when any field fails to parse.
pub const VALIDATION_MESSAGE: &str = "Please fill all fields with valid numbers.";

/// Failures talking to the external scoring endpoint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Endpoint answered with a non-success status
    #[error("Prediction request failed: HTTP {status}")]
    Status { status: u16 },

    /// Request never completed (connect, DNS, TLS, body read)
    #[error("Prediction request failed: {0}")]
    Transport(String),

    /// Body did not match `{ prediction: 0|1, probability: number }`
    #[error("Prediction request failed: malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::MalformedResponse(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Errors a submission can terminate with.
///
/// Both kinds are recoverable: the controller returns to idle and accepts
/// another submit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    /// One or more fields did not parse as a finite number
    #[error("{}", VALIDATION_MESSAGE)]
    Validation { invalid_fields: Vec<String> },

    /// The scoring backend failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SubmissionError {
    /// Text suitable for display next to the submit button.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Invalid scoring configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("backend URL must start with http:// or https://: {0}")]
    InvalidBackendUrl(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type for submissions
pub type Result<T> = std::result::Result<T, SubmissionError>;
