//! cardiorisk-core: heart disease risk intake and presentation
//!
//! Collects thirteen clinical fields, turns them into an ordered feature
//! vector, scores it, and maps the probability to a risk tier.
//!
//! ## Pieces
//!
//! - [`schema`]: the fixed, ordered field descriptors
//! - [`controller`]: form state, validation and the submit lifecycle
//! - [`presenter`]: probability → tier, bar and labels
//! - [`scorer`]: HTTP backend or the offline placeholder (not a model)

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod obs;
pub mod presenter;
pub mod schema;
pub mod scorer;
pub mod telemetry;

pub use config::{build_scorer, ScoringConfig, BACKEND_URL_ENV};
pub use controller::{PendingSubmission, SubmissionController, SubmissionState};
pub use error::{BackendError, ConfigError, Result, SubmissionError, VALIDATION_MESSAGE};
pub use form::{parse_number, FeatureVector, FormValues, RangeViolation};
pub use obs::{
    emit_backend_failed, emit_scored, emit_stale_completion, emit_submission_started,
    emit_validation_failed, submission_span,
};
pub use presenter::{clamp_probability, render_bar, BarColor, RiskTier, RiskView, DISCLAIMERS};
pub use schema::{FieldDescriptor, Step, FIELD_COUNT, FIELD_SCHEMA};
pub use scorer::{
    HttpScorer, PlaceholderScorer, PredictedClass, PredictionResult, RiskScorer, ScoreResult,
};
pub use telemetry::init_tracing;
