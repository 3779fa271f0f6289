//! Structured tracing events for the submission lifecycle.
//!
//! - `submission_span` builds the span carried by one submit
//! - emit functions for start, validation failure, scored, backend failure
//!   and stale completions

use tracing::{info, warn, Span};
use uuid::Uuid;

/// Span tagging everything inside one submission.
///
/// Enter it around synchronous work, or attach it to the backend future
/// with `tracing::Instrument`.
pub fn submission_span(submission_id: &Uuid, seq: u64) -> Span {
    tracing::info_span!(
        "cardiorisk.submission",
        submission_id = %submission_id,
        seq = seq
    )
}

/// Emit event: submission started against a scorer.
pub fn emit_submission_started(seq: u64, scorer: &str) {
    info!(event = "submission.started", seq = seq, scorer = %scorer);
}

/// Emit event: input failed numeric validation (no network call made).
pub fn emit_validation_failed(seq: u64, invalid_fields: &[String]) {
    warn!(
        event = "submission.validation_failed",
        seq = seq,
        invalid_fields = %invalid_fields.join(","),
    );
}

/// Emit event: a probability was produced.
pub fn emit_scored(seq: u64, probability: f64, predicted_class: u8, placeholder: bool) {
    info!(
        event = "submission.scored",
        seq = seq,
        probability = probability,
        predicted_class = predicted_class,
        placeholder = placeholder,
    );
}

/// Emit event: backend call failed.
pub fn emit_backend_failed(seq: u64, error: &dyn std::fmt::Display) {
    warn!(event = "submission.backend_failed", seq = seq, error = %error);
}

/// Emit event: a completion arrived for a superseded submission.
pub fn emit_stale_completion(seq: u64, current: u64) {
    warn!(event = "submission.stale", seq = seq, current = current);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SubmissionController;
    use crate::schema;
    use crate::scorer::PlaceholderScorer;
    use tracing_test::traced_test;

    fn filled_controller() -> SubmissionController<PlaceholderScorer> {
        let mut controller = SubmissionController::new(PlaceholderScorer::new());
        for field in schema::fields() {
            controller.set_field(field.key, "1");
        }
        controller
    }

    #[test]
    fn test_submission_span_enter() {
        let span = submission_span(&Uuid::new_v4(), 1);
        let _entered = span.enter();
        emit_submission_started(1, "placeholder");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_submit_emits_started_and_scored() {
        let mut controller = filled_controller();
        controller.submit().await.unwrap();

        assert!(logs_contain("submission.started"));
        assert!(logs_contain("submission.scored"));
        assert!(logs_contain("placeholder=true"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_validation_failure_names_fields() {
        let mut controller = filled_controller();
        controller.set_field("chol", "");
        assert!(controller.submit().await.is_err());

        assert!(logs_contain("submission.validation_failed"));
        assert!(logs_contain("chol"));
        assert!(!logs_contain("submission.scored"));
    }

    #[test]
    #[traced_test]
    fn test_stale_completion_is_logged() {
        let mut controller = filled_controller();
        let first = controller.begin_submit().unwrap();
        let _second = controller.begin_submit().unwrap();
        let outcome = Ok(PlaceholderScorer::compute(&first.features));
        assert!(!controller.complete_submit(first, outcome));

        assert!(logs_contain("submission.stale"));
    }

    #[test]
    #[traced_test]
    fn test_backend_failure_is_warned() {
        emit_backend_failed(4, &"HTTP 500");
        assert!(logs_contain("submission.backend_failed"));
        assert!(logs_contain("HTTP 500"));
    }
}
