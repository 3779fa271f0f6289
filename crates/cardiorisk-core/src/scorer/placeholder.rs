//! Placeholder scorer used when no backend is configured.
//!
//! This is NOT a risk model. The coefficients are arbitrary constants that
//! keep the flow producing a result offline; they carry no predictive
//! validity and must not be reused as defaults for a real scorer.

use async_trait::async_trait;

use super::{PredictedClass, PredictionResult, RiskScorer, ScoreResult};
use crate::form::FeatureVector;

/// Weight for positions where `i % 3 == 0`.
pub const PRIMARY_WEIGHT: f64 = 0.02;
/// Weight for every other position.
pub const SECONDARY_WEIGHT: f64 = 0.005;
/// Logistic steepness.
pub const STEEPNESS: f64 = 0.15;
/// Logistic midpoint.
pub const MIDPOINT: f64 = 10.0;
/// Positive class above this probability (strict).
pub const CLASS_THRESHOLD: f64 = 0.5;

/// Deterministic stand-in scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderScorer;

impl PlaceholderScorer {
    pub fn new() -> Self {
        PlaceholderScorer
    }

    /// Weighted sum, accumulated left to right.
    pub fn weighted_sum(features: &FeatureVector) -> f64 {
        features
            .as_slice()
            .iter()
            .enumerate()
            .fold(0.0, |acc, (i, v)| {
                acc + if i % 3 == 0 {
                    v * PRIMARY_WEIGHT
                } else {
                    v * SECONDARY_WEIGHT
                }
            })
    }

    /// Compute the placeholder result synchronously.
    pub fn compute(features: &FeatureVector) -> PredictionResult {
        let sum = Self::weighted_sum(features);
        let probability = 1.0 / (1.0 + (-STEEPNESS * (sum - MIDPOINT)).exp());
        let predicted_class = if probability > CLASS_THRESHOLD {
            PredictedClass::Positive
        } else {
            PredictedClass::Negative
        };
        PredictionResult {
            predicted_class,
            probability,
        }
    }
}

#[async_trait]
impl RiskScorer for PlaceholderScorer {
    async fn score(&self, features: &FeatureVector) -> ScoreResult {
        Ok(Self::compute(features))
    }

    fn describe(&self) -> String {
        "placeholder (not a model)".to_string()
    }

    fn is_placeholder(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: [f64; 13] = [
        63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0,
    ];

    #[test]
    fn test_weighted_sum_reference_record() {
        let sum = PlaceholderScorer::weighted_sum(&FeatureVector(REFERENCE));
        assert!((sum - 6.166).abs() < 1e-9);
    }

    #[test]
    fn test_reference_record_probability() {
        let result = PlaceholderScorer::compute(&FeatureVector(REFERENCE));
        assert!((result.probability - 0.360_060_861_236_092_7).abs() < 1e-12);
        assert_eq!(result.predicted_class, PredictedClass::Negative);
    }

    #[test]
    fn test_deterministic() {
        let a = PlaceholderScorer::compute(&FeatureVector(REFERENCE));
        let b = PlaceholderScorer::compute(&FeatureVector(REFERENCE));
        assert_eq!(a, b);
    }

    #[test]
    fn test_midpoint_is_one_half_and_negative() {
        // age alone contributes 500 * 0.02 = 10, the logistic midpoint
        let mut features = [0.0; 13];
        features[0] = 500.0;
        let result = PlaceholderScorer::compute(&FeatureVector(features));
        assert!((result.probability - 0.5).abs() < 1e-12);
        assert_eq!(result.predicted_class, PredictedClass::Negative);
    }

    #[test]
    fn test_large_inputs_are_positive() {
        // sum 20: 1 / (1 + e^-1.5)
        let mut features = [0.0; 13];
        features[0] = 1000.0;
        let result = PlaceholderScorer::compute(&FeatureVector(features));
        assert!((result.probability - 0.817_574_476_193_643_7).abs() < 1e-12);
        assert_eq!(result.predicted_class, PredictedClass::Positive);
    }

    #[tokio::test]
    async fn test_trait_score_matches_compute() {
        let scorer = PlaceholderScorer::new();
        let features = FeatureVector(REFERENCE);
        let scored = scorer.score(&features).await.unwrap();
        assert_eq!(scored, PlaceholderScorer::compute(&features));
        assert!(scorer.is_placeholder());
    }
}
