//! Raw form values and their conversion into a feature vector

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SubmissionError;
use crate::schema::{self, FieldDescriptor, FIELD_COUNT};

/// Raw text entered for each schema field.
///
/// Always holds exactly one entry per schema key; entries start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<&'static str, String>,
}

impl Default for FormValues {
    fn default() -> Self {
        FormValues {
            values: schema::fields()
                .iter()
                .map(|f| (f.key, String::new()))
                .collect(),
        }
    }
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record raw text for `key`.
    ///
    /// Returns `false` (and leaves the form untouched) if `key` is not a
    /// schema field.
    pub fn set(&mut self, key: &str, raw: impl Into<String>) -> bool {
        match schema::field(key) {
            Some(descriptor) => {
                self.values.insert(descriptor.key, raw.into());
                true
            }
            None => {
                debug!(key = %key, "ignoring value for unknown field");
                false
            }
        }
    }

    /// Raw text for `key`, if it is a schema field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        for raw in self.values.values_mut() {
            raw.clear();
        }
    }

    /// Fill the form from a JSON object of `key -> number | string`.
    ///
    /// Unknown keys are skipped; numbers are stored in their JSON text form.
    pub fn from_json(value: &serde_json::Value) -> std::result::Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "expected a JSON object of field values".to_string())?;
        let mut form = FormValues::new();
        for (key, raw) in object {
            let text = match raw {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Null => String::new(),
                other => return Err(format!("field {key}: unsupported value {other}")),
            };
            form.set(key, text);
        }
        Ok(form)
    }

    /// Convert every field, in schema order, into a number.
    ///
    /// Fails with [`SubmissionError::Validation`] naming every field whose
    /// text is empty, non-numeric or non-finite.
    pub fn to_features(&self) -> std::result::Result<FeatureVector, SubmissionError> {
        let mut features = [0.0; FIELD_COUNT];
        let mut invalid_fields = Vec::new();

        for (slot, descriptor) in features.iter_mut().zip(schema::fields()) {
            match self.get(descriptor.key).and_then(parse_number) {
                Some(n) => *slot = n,
                None => invalid_fields.push(descriptor.key.to_string()),
            }
        }

        if invalid_fields.is_empty() {
            Ok(FeatureVector(features))
        } else {
            Err(SubmissionError::Validation { invalid_fields })
        }
    }

    /// Parsed values that fall outside their descriptor's bounds.
    ///
    /// Advisory only; out-of-range values still submit.
    pub fn out_of_range(&self) -> Vec<RangeViolation> {
        schema::fields()
            .iter()
            .filter_map(|descriptor| {
                let value = self.get(descriptor.key).and_then(parse_number)?;
                (!descriptor.contains(value)).then_some(RangeViolation {
                    field: *descriptor,
                    value,
                })
            })
            .collect()
    }
}

/// Standard numeric-string parse. Surrounding whitespace is ignored; empty,
/// non-numeric, NaN and infinite inputs are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A parsed value outside its field's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeViolation {
    pub field: FieldDescriptor,
    pub value: f64,
}

impl std::fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {} is outside [{}, {}]",
            self.field.key, self.value, self.field.min_value, self.field.max_value
        )
    }
}

/// The ordered numeric payload; position N is schema field N.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(pub [f64; FIELD_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value for a named field.
    pub fn get(&self, key: &str) -> Option<f64> {
        schema::position(key).map(|i| self.0[i])
    }
}
