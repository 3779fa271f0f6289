//! Result presenter: probability → tier, bar and labels
//!
//! Pure functions of the last probability. The probability is clamped to
//! `[0, 1]` before anything else reads it.

use serde::Serialize;

use crate::scorer::PredictionResult;

/// Above this the tier is High (strict).
pub const HIGH_THRESHOLD: f64 = 0.7;
/// Above this the tier is Moderate (strict).
pub const MODERATE_THRESHOLD: f64 = 0.4;

/// Notes shown beside every result. The storage note names the scoring
/// backend, since this crate has no browser storage of its own.
pub const DISCLAIMERS: [&str; 3] = [
    "This tool supports clinical decision-making and is not a diagnosis.",
    "Inputs should follow standard heart disease dataset conventions.",
    "No data is stored unless the scoring backend enables persistence.",
];

/// Discrete risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// No result yet
    Unknown,
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Classify an already clamped probability.
    fn classify(probability: f64) -> Self {
        if probability > HIGH_THRESHOLD {
            RiskTier::High
        } else if probability > MODERATE_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Unknown => "—",
            RiskTier::Low => "Low Risk",
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::High => "High Risk",
        }
    }

    pub fn color(self) -> BarColor {
        match self {
            RiskTier::Unknown => BarColor::Neutral,
            RiskTier::Low => BarColor::Safe,
            RiskTier::Moderate => BarColor::Warning,
            RiskTier::High => BarColor::Alert,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Bar colour role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarColor {
    Neutral,
    Safe,
    Warning,
    Alert,
}

/// Everything a display needs to render the result card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskView {
    /// Clamped probability, `None` before the first result
    pub probability: Option<f64>,
    pub tier: RiskTier,
    pub color: BarColor,
    /// `round(probability * 100)`, 0 when absent
    pub bar_percent: u8,
}

impl RiskView {
    /// View for an optional raw probability.
    pub fn from_probability(probability: Option<f64>) -> Self {
        match probability.map(clamp_probability) {
            None => RiskView {
                probability: None,
                tier: RiskTier::Unknown,
                color: BarColor::Neutral,
                bar_percent: 0,
            },
            Some(p) => {
                let tier = RiskTier::classify(p);
                RiskView {
                    probability: Some(p),
                    tier,
                    color: tier.color(),
                    bar_percent: (p * 100.0).round() as u8,
                }
            }
        }
    }

    /// View for the last result of a controller.
    pub fn from_result(result: Option<&PredictionResult>) -> Self {
        Self::from_probability(result.map(|r| r.probability))
    }

    /// Bar fill as a fraction in `[0, 1]`.
    pub fn bar_fraction(&self) -> f64 {
        f64::from(self.bar_percent) / 100.0
    }

    /// Probability with one decimal, e.g. `"36.0%"`, or `"—"`.
    pub fn probability_label(&self) -> String {
        match self.probability {
            Some(p) => format!("{:.1}%", p * 100.0),
            None => "—".to_string(),
        }
    }
}

/// Clamp into `[0, 1]`. NaN is treated as 0.
pub fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

/// Text-mode bar of `width` cells.
pub fn render_bar(view: &RiskView, width: usize) -> String {
    let filled = ((view.bar_fraction() * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
