use serde_json::Value;

use super::super::domain::Trimester;
use super::NormalizationError;

/// Canonical form of a raw field name: trimmed, lowercase, `_` separated.
pub(crate) fn normalize_field(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|ch: char| ch.is_whitespace() || ch == '-' || ch == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

/// Canonical form of a free-text multi-select label.
pub(crate) fn normalize_label(value: &str) -> String {
    normalize_field(value).replace('_', " ")
}

fn is_blank(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "" | "unknown" | "n/a" | "na" | "not tested" | "-"
    )
}

/// Leading integer of a `"<n> - <label>"` slider encoding.
fn ordinal_prefix(text: &str) -> Option<u8> {
    let (head, _) = text.split_once('-')?;
    head.trim().parse::<u8>().ok()
}

/// Count of `+` signs in dipstick notation (`+`, `++`, `+++`).
fn plus_count(text: &str) -> Option<u8> {
    if !text.is_empty() && text.chars().all(|ch| ch == '+') {
        u8::try_from(text.len()).ok()
    } else {
        None
    }
}

fn yes_no(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "positive" | "present" => Some(true),
        "no" | "n" | "false" | "negative" | "absent" | "none" | "nil" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_flag(field: &str, value: &Value) -> Result<Option<bool>, NormalizationError> {
    let invalid = || NormalizationError::InvalidFlag {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(*flag)),
        Value::Number(number) => number.as_f64().map(|n| Some(n != 0.0)).ok_or_else(invalid),
        Value::String(raw) => {
            let text = raw.trim();
            if is_blank(text) {
                return Ok(None);
            }
            if let Some(flag) = yes_no(text) {
                return Ok(Some(flag));
            }
            if let Ok(number) = text.parse::<f64>() {
                return Ok(Some(number != 0.0));
            }
            ordinal_prefix(text)
                .map(|level| Some(level != 0))
                .ok_or_else(invalid)
        }
        Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

pub(crate) fn parse_ordinal(field: &str, value: &Value) -> Result<Option<u8>, NormalizationError> {
    let invalid = || NormalizationError::InvalidOrdinal {
        field: field.to_string(),
        value: value.to_string(),
    };
    let from_number = |number: f64| {
        if number.is_finite() && (0.0..=f64::from(u8::MAX)).contains(&number) {
            Ok(Some(number.round() as u8))
        } else {
            Err(invalid())
        }
    };

    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(u8::from(*flag))),
        Value::Number(number) => number.as_f64().map_or_else(|| Err(invalid()), from_number),
        Value::String(raw) => {
            let text = raw.trim();
            if is_blank(text) {
                return Ok(None);
            }
            if let Ok(number) = text.parse::<f64>() {
                return from_number(number);
            }
            if let Some(level) = ordinal_prefix(text).or_else(|| plus_count(text)) {
                return Ok(Some(level));
            }
            yes_no(text)
                .map(|flag| Some(u8::from(flag)))
                .ok_or_else(invalid)
        }
        Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

/// Continuous readings. Zero or empty means "not measured" and yields `None`.
pub(crate) fn parse_measure(field: &str, value: &Value) -> Result<Option<f64>, NormalizationError> {
    let invalid = || NormalizationError::InvalidMeasure {
        field: field.to_string(),
        value: value.to_string(),
    };

    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(number) => number.as_f64().ok_or_else(invalid)?,
        Value::String(raw) => {
            let text = raw.trim();
            if is_blank(text) {
                return Ok(None);
            }
            text.parse::<f64>().map_err(|_| invalid())?
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => return Err(invalid()),
    };

    if !number.is_finite() || number < 0.0 {
        return Err(invalid());
    }
    Ok((number != 0.0).then_some(number))
}

pub(crate) fn parse_trimester(
    field: &str,
    value: &Value,
) -> Result<Option<Trimester>, NormalizationError> {
    let invalid = || NormalizationError::InvalidCategory {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| n.to_string().parse::<Trimester>().ok())
            .map(Some)
            .ok_or_else(invalid),
        Value::String(raw) => {
            let text = raw.trim();
            if is_blank(text) {
                return Ok(None);
            }
            let text = text
                .strip_suffix("trimester")
                .or_else(|| text.strip_suffix("Trimester"))
                .unwrap_or(text);
            text.parse::<Trimester>().map(Some).map_err(|_| invalid())
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

/// Multi-select payload: a JSON list of labels or a comma separated string.
pub(crate) fn parse_selection(
    field: &str,
    value: &Value,
) -> Result<Vec<String>, NormalizationError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(raw) => Ok(raw
            .split([',', ';'])
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(label) => Ok(label.trim().to_string()),
                other => Err(NormalizationError::InvalidSelection {
                    field: field.to_string(),
                    reason: format!("expected text labels, found {other}"),
                }),
            })
            .filter(|label| !matches!(label, Ok(text) if text.is_empty()))
            .collect(),
        other => Err(NormalizationError::InvalidSelection {
            field: field.to_string(),
            reason: format!("expected a list of labels, found {other}"),
        }),
    }
}
