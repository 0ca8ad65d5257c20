//! Boundary between heterogeneous collector payloads and typed evaluator inputs.
//!
//! Raw requests are flat maps of field name to JSON value. Every encoding the
//! collectors produce (Yes/No strings, 0/1, `"2 - Moderate"` sliders, `"++"`
//! dipstick readings, multi-select symptom lists) is decoded here, so the
//! evaluators only ever see [`InputValue`]s.

mod encoding;
mod mapping;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::domain::{ConditionInputs, InputValue};
use encoding::{
    normalize_field, parse_flag, parse_measure, parse_ordinal, parse_selection, parse_trimester,
};
use mapping::{field_for_label, targets_for, FieldKind, FieldTarget, SELECTION_FIELD};

/// Untyped request body as submitted by a form, JSON client or CSV row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAssessmentRequest {
    fields: Map<String, Value>,
}

impl RawAssessmentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for RawAssessmentRequest {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    #[error("field '{field}' is not a recognizable yes/no value: {value}")]
    InvalidFlag { field: String, value: String },
    #[error("field '{field}' is not a recognizable severity level: {value}")]
    InvalidOrdinal { field: String, value: String },
    #[error("field '{field}' is not a valid measurement: {value}")]
    InvalidMeasure { field: String, value: String },
    #[error("field '{field}' has an unrecognized value: {value}")]
    InvalidCategory { field: String, value: String },
    #[error("field '{field}' is not a valid symptom selection: {reason}")]
    InvalidSelection { field: String, reason: String },
}

/// Stateless decoder from [`RawAssessmentRequest`] to per-condition inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputNormalizer;

impl InputNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Decode every recognized field. Unknown fields and symptom labels are
    /// ignored; explicit fields take precedence over the symptom list.
    /// Conditions with no decoded values are omitted from the output.
    pub fn normalize(
        &self,
        raw: &RawAssessmentRequest,
    ) -> Result<ConditionInputs, NormalizationError> {
        let mut explicit: BTreeMap<&'static str, (&str, &Value, &'static [FieldTarget])> =
            BTreeMap::new();
        let mut selected = Vec::new();

        for (name, value) in raw.fields() {
            let field = normalize_field(name);
            if field == SELECTION_FIELD {
                selected.extend(parse_selection(name, value)?);
                continue;
            }

            match targets_for(&field) {
                Some((canonical, targets)) => {
                    explicit
                        .entry(canonical)
                        .or_insert((name.as_str(), value, targets));
                }
                None => debug!(field = %name, "ignoring unrecognized assessment field"),
            }
        }

        let mut inputs = ConditionInputs::new();
        for (_, (name, value, targets)) in &explicit {
            for target in *targets {
                if let Some(decoded) = decode(name, value, target.kind)? {
                    inputs
                        .entry(target.condition)
                        .or_default()
                        .insert(target.key, decoded);
                }
            }
        }

        for label in &selected {
            let Some(field) = field_for_label(label) else {
                debug!(%label, "ignoring unknown symptom label");
                continue;
            };
            if explicit.contains_key(field) {
                continue;
            }
            let Some((_, targets)) = targets_for(field) else {
                continue;
            };
            for target in targets {
                let decoded = decode(label, &Value::Bool(true), target.kind)?;
                if let Some(decoded) = decoded {
                    inputs
                        .entry(target.condition)
                        .or_default()
                        .insert(target.key, decoded);
                }
            }
        }

        Ok(inputs)
    }
}

fn decode(
    field: &str,
    value: &Value,
    kind: FieldKind,
) -> Result<Option<InputValue>, NormalizationError> {
    Ok(match kind {
        FieldKind::Flag => parse_flag(field, value)?.map(InputValue::Flag),
        FieldKind::Ordinal => parse_ordinal(field, value)?.map(InputValue::Ordinal),
        FieldKind::Measure => parse_measure(field, value)?.map(InputValue::Measure),
        FieldKind::Trimester => parse_trimester(field, value)?
            .map(|trimester| InputValue::Category(trimester.label().to_string())),
    })
}
