//! Scoring configuration
//!
//! A single setting, `CARDIORISK_BACKEND_URL`, picks the scorer: a
//! non-empty base URL selects [`HttpScorer`], anything else the
//! [`PlaceholderScorer`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::scorer::{HttpScorer, PlaceholderScorer, RiskScorer};

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "CARDIORISK_BACKEND_URL";

/// User agent sent with backend requests.
pub const DEFAULT_USER_AGENT: &str = concat!("cardiorisk/", env!("CARGO_PKG_VERSION"));

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Backend base URL; `None` selects the placeholder scorer
    pub backend_url: Option<String>,
    /// User agent for backend requests
    pub user_agent: String,
    /// Route backend requests through proxies named in the environment
    pub use_system_proxy: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            backend_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_system_proxy: true,
        }
    }
}

impl ScoringConfig {
    /// Read the backend URL from `CARDIORISK_BACKEND_URL`.
    pub fn from_env() -> Self {
        Self::default().with_backend_url(std::env::var(BACKEND_URL_ENV).ok().as_deref())
    }

    /// Set the backend URL. Empty or whitespace-only values clear it.
    pub fn with_backend_url(mut self, url: Option<&str>) -> Self {
        self.backend_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        self
    }

    /// Enable or disable environment proxies (`HTTP_PROXY` and friends).
    pub fn with_system_proxy(mut self, enabled: bool) -> Self {
        self.use_system_proxy = enabled;
        self
    }

    /// Whether a real backend is configured.
    pub fn uses_backend(&self) -> bool {
        self.backend_url.is_some()
    }

    /// Full `/predict` endpoint, if a backend is configured.
    ///
    /// A trailing slash on the base URL is dropped before `/predict` is
    /// appended.
    pub fn predict_endpoint(&self) -> Result<Option<String>, ConfigError> {
        let Some(base) = self.backend_url.as_deref() else {
            return Ok(None);
        };
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(base.to_string()));
        }
        Ok(Some(format!("{}/predict", base.trim_end_matches('/'))))
    }
}

/// Build the scorer selected by `config`.
pub fn build_scorer(config: &ScoringConfig) -> Result<Box<dyn RiskScorer>, ConfigError> {
    match config.predict_endpoint()? {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "using HTTP scoring backend");
            Ok(Box::new(HttpScorer::new(
                &endpoint,
                &config.user_agent,
                config.use_system_proxy,
            )?))
        }
        None => {
            warn!("no scoring backend configured; using placeholder score (not a model)");
            Ok(Box::new(PlaceholderScorer::new()))
        }
    }
}
