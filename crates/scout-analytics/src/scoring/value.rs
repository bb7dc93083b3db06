use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Observation fields keyed by schema element id.
///
/// Ordered by key so that loose metric matching walks fields deterministically.
pub type Fields = BTreeMap<String, FieldValue>;

/// Loosely-typed scalar recorded by a scout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl FieldValue {
    /// Interprets a raw spreadsheet cell.
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }

        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&string_coerce(self))
    }
}

/// Numeric reading of a field; anything that does not read as a finite number is 0.
pub fn numeric_coerce(value: &FieldValue) -> f64 {
    let number = match value {
        FieldValue::Number(number) => *number,
        FieldValue::Bool(true) => 1.0,
        FieldValue::Bool(false) => 0.0,
        FieldValue::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        FieldValue::Missing => 0.0,
    };

    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Truthiness of a field; unrecognised text and missing values are false.
pub fn boolean_coerce(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(flag) => *flag,
        FieldValue::Number(number) => *number != 0.0 && !number.is_nan(),
        FieldValue::Text(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1" | "t" | "on"
        ),
        FieldValue::Missing => false,
    }
}

pub fn string_coerce(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
            format!("{}", *number as i64)
        }
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Bool(flag) => flag.to_string(),
        FieldValue::Missing => String::new(),
    }
}
