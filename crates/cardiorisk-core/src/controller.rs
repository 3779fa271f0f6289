//! Submission controller
//!
//! Owns the form values and the [`SubmissionState`], validates input, and
//! resolves a probability through a [`RiskScorer`]. State changes are
//! published on a `tokio::sync::watch` channel so a display can re-render.
//!
//! Two ways to drive it:
//!
//! - [`SubmissionController::submit`] does the whole round trip. It takes
//!   `&mut self`, so overlapping submits on one controller do not compile.
//! - [`SubmissionController::begin_submit`] / [`SubmissionController::complete_submit`]
//!   split the request from its completion for event loops that run the
//!   scorer elsewhere. Each begin bumps a sequence number and completions
//!   carrying an older number are dropped.

use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Result, SubmissionError};
use crate::form::{FeatureVector, FormValues};
use crate::obs;
use crate::presenter::RiskView;
use crate::scorer::{PredictionResult, RiskScorer, ScoreResult};

/// Lifecycle of the most recent submission.
///
/// `Failed` and `Completed` are exclusive by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    /// Nothing submitted yet, or a submission was abandoned
    #[default]
    Idle,
    /// Waiting on the scorer
    Loading,
    Failed(SubmissionError),
    Completed(PredictionResult),
}

impl SubmissionState {
    pub fn loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    /// User-visible error text, if the last submission failed.
    pub fn error_message(&self) -> Option<String> {
        match self {
            SubmissionState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Label for the submit button.
    pub fn submit_label(&self) -> &'static str {
        if self.loading() {
            "Predicting…"
        } else {
            "Predict Risk"
        }
    }

    /// Presenter view of the last result.
    pub fn view(&self) -> RiskView {
        RiskView::from_result(self.last_result())
    }
}

/// A submission that passed validation and is waiting on a scorer.
#[derive(Debug)]
pub struct PendingSubmission {
    pub seq: u64,
    pub features: FeatureVector,
    span: tracing::Span,
}

/// Resets the state to idle if a submit future is dropped mid-flight.
struct LoadingFinalizer<'a> {
    state: &'a watch::Sender<SubmissionState>,
    armed: bool,
}

impl LoadingFinalizer<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingFinalizer<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_if_modified(|state| {
                if state.loading() {
                    *state = SubmissionState::Idle;
                    true
                } else {
                    false
                }
            });
        }
    }
}

/// Form state plus the scorer that resolves it.
pub struct SubmissionController<S: RiskScorer> {
    scorer: S,
    values: FormValues,
    state: watch::Sender<SubmissionState>,
    seq: u64,
}

impl<S: RiskScorer> SubmissionController<S> {
    pub fn new(scorer: S) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        SubmissionController {
            scorer,
            values: FormValues::new(),
            state,
            seq: 0,
        }
    }

    /// Start from pre-filled values.
    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Record raw text for a field. Never fails; unknown keys are ignored.
    pub fn set_field(&mut self, key: &str, raw: impl Into<String>) {
        self.values.set(key, raw);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Presenter view of the last result.
    pub fn view(&self) -> RiskView {
        self.state.borrow().view()
    }

    /// Sequence number of the latest submission.
    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    /// Validate, score and record one submission.
    ///
    /// Loading is cleared on every exit path, including when the returned
    /// future is dropped before the scorer answers.
    pub async fn submit(&mut self) -> Result<PredictionResult> {
        let pending = self.begin_submit()?;

        let span = pending.span.clone();
        let outcome = {
            let mut finalizer = LoadingFinalizer {
                state: &self.state,
                armed: true,
            };
            let outcome = self.scorer.score(&pending.features).instrument(span).await;
            finalizer.disarm();
            outcome
        };

        self.complete_submit(pending, outcome.clone());
        outcome.map_err(SubmissionError::from)
    }

    /// First half of a submission: enter loading and validate.
    ///
    /// On validation failure the state ends as `Failed` and no scorer call
    /// should follow.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission> {
        self.seq += 1;
        let seq = self.seq;
        let span = obs::submission_span(&Uuid::new_v4(), seq);

        let validated = span.in_scope(|| {
            self.state.send_replace(SubmissionState::Loading);
            obs::emit_submission_started(seq, &self.scorer.describe());

            let validated = self.values.to_features();
            if let Err(err) = &validated {
                if let SubmissionError::Validation { invalid_fields } = err {
                    obs::emit_validation_failed(seq, invalid_fields);
                }
                self.state.send_replace(SubmissionState::Failed(err.clone()));
            }
            validated
        });

        Ok(PendingSubmission {
            seq,
            features: validated?,
            span,
        })
    }

    /// Second half of a submission: record the scorer's outcome.
    ///
    /// Returns `false` and leaves the state untouched if a newer submission
    /// has begun since `pending` was issued.
    pub fn complete_submit(&mut self, pending: PendingSubmission, outcome: ScoreResult) -> bool {
        let _entered = pending.span.enter();

        if pending.seq != self.seq {
            obs::emit_stale_completion(pending.seq, self.seq);
            return false;
        }

        let next = match outcome {
            Ok(result) => {
                obs::emit_scored(
                    pending.seq,
                    result.probability,
                    result.predicted_class.into(),
                    self.scorer.is_placeholder(),
                );
                SubmissionState::Completed(result)
            }
            Err(err) => {
                obs::emit_backend_failed(pending.seq, &err);
                SubmissionState::Failed(err.into())
            }
        };
        self.state.send_replace(next);
        true
    }
}
