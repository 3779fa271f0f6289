//! Field schema: the thirteen clinical inputs and their payload order
//!
//! The position of a descriptor in [`FIELD_SCHEMA`] is its position in the
//! `features` array sent to a scoring backend. Any backend has to agree on
//! this order.

use serde::Serialize;

/// Number of clinical fields.
pub const FIELD_COUNT: usize = 13;

/// Input granularity of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Any real value is accepted
    Any,
    /// Values are expected in increments of this size
    Fixed(f64),
}

impl Serialize for Step {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Step::Any => serializer.serialize_str("any"),
            Step::Fixed(size) => serializer.serialize_f64(*size),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Any => write!(f, "any"),
            Step::Fixed(size) => write!(f, "{size}"),
        }
    }
}

/// A single form field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub min_value: f64,
    pub max_value: f64,
    pub step: Step,
}

impl FieldDescriptor {
    const fn new(key: &'static str, label: &'static str, min_value: f64, max_value: f64) -> Self {
        FieldDescriptor {
            key,
            label,
            min_value,
            max_value,
            step: Step::Any,
        }
    }

    const fn with_step(mut self, step: f64) -> Self {
        self.step = Step::Fixed(step);
        self
    }

    /// Whether `value` lies within the inclusive bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }
}

/// The fixed, ordered field schema.
pub static FIELD_SCHEMA: [FieldDescriptor; FIELD_COUNT] = [
    FieldDescriptor::new("age", "Age", 1.0, 120.0),
    FieldDescriptor::new("sex", "Sex (0 = female, 1 = male)", 0.0, 1.0),
    FieldDescriptor::new("cp", "Chest Pain Type (0-3)", 0.0, 3.0),
    FieldDescriptor::new("trestbps", "Resting BP (mm Hg)", 60.0, 250.0),
    FieldDescriptor::new("chol", "Cholesterol (mg/dl)", 80.0, 700.0),
    FieldDescriptor::new("fbs", "Fasting Blood Sugar > 120 mg/dl (0/1)", 0.0, 1.0),
    FieldDescriptor::new("restecg", "Resting ECG (0-2)", 0.0, 2.0),
    FieldDescriptor::new("thalach", "Max Heart Rate", 60.0, 250.0),
    FieldDescriptor::new("exang", "Exercise Induced Angina (0/1)", 0.0, 1.0),
    FieldDescriptor::new("oldpeak", "ST Depression", 0.0, 10.0).with_step(0.1),
    FieldDescriptor::new("slope", "Slope (0-2)", 0.0, 2.0),
    FieldDescriptor::new("ca", "Major Vessels (0-3)", 0.0, 3.0),
    FieldDescriptor::new(
        "thal",
        "Thal (0 = Normal, 1 = Fixed defect, 2 = Reversible)",
        0.0,
        2.0,
    ),
];

/// Read access to the ordered schema.
pub fn fields() -> &'static [FieldDescriptor] {
    &FIELD_SCHEMA
}

/// Look up a descriptor by key.
pub fn field(key: &str) -> Option<&'static FieldDescriptor> {
    FIELD_SCHEMA.iter().find(|f| f.key == key)
}

/// Payload position of a field.
pub fn position(key: &str) -> Option<usize> {
    FIELD_SCHEMA.iter().position(|f| f.key == key)
}
