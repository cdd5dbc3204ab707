//! Input normalization.
//!
//! Callers hand us parameters in one of three forms: JSON text (some agent
//! frameworks serialize the argument object into a string), a JSON object,
//! or a record that was already built in Rust. [`ToolInput`] names those
//! three cases and collapses them into one canonical record before anything
//! else looks at the values.

use serde_json::{Map, Value};

use crate::error::AmapError;
use crate::params::Parameters;

/// Caller-supplied parameters for one operation, in any accepted form.
#[derive(Debug, Clone)]
pub enum ToolInput<P> {
    /// Serialized JSON object text.
    Serialized(String),
    /// A decoded key/value map.
    Fields(Map<String, Value>),
    /// An already-validated record; passed through untouched.
    Canonical(P),
}

impl<P: Parameters> ToolInput<P> {
    /// Classify a raw JSON value: strings are treated as serialized objects,
    /// objects as field maps. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self, AmapError> {
        match value {
            Value::String(text) => Ok(ToolInput::Serialized(text)),
            Value::Object(map) => Ok(ToolInput::Fields(map)),
            other => Err(AmapError::input(
                "input",
                format!("expected a JSON object, got {}", json_type_name(&other)),
            )),
        }
    }

    /// Produce the canonical record.
    pub fn into_canonical(self) -> Result<P, AmapError> {
        match self {
            ToolInput::Serialized(text) => {
                let value: Value = serde_json::from_str(&text)
                    .map_err(|e| AmapError::input("input", format!("JSON parse failed: {}", e)))?;
                match value {
                    Value::Object(map) => P::from_fields(&FieldReader::new(&map)),
                    other => Err(AmapError::input(
                        "input",
                        format!(
                            "parsed JSON is not an object, got {}",
                            json_type_name(&other)
                        ),
                    )),
                }
            }
            ToolInput::Fields(map) => P::from_fields(&FieldReader::new(&map)),
            ToolInput::Canonical(record) => Ok(record),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed, field-named access to a parameter map.
///
/// JSON `null` reads as absent. Scalars are coerced the way agent callers
/// tend to send them: numbers may arrive as strings and vice versa.
pub struct FieldReader<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    pub fn optional_str(&self, field: &str) -> Result<Option<String>, AmapError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(AmapError::input(
                field,
                format!("expected a string, got {}", json_type_name(other)),
            )),
        }
    }

    pub fn required_str(&self, field: &str) -> Result<String, AmapError> {
        self.optional_str(field)?
            .ok_or_else(|| AmapError::input(field, "missing required field"))
    }

    pub fn str_or(&self, field: &str, default: &str) -> Result<String, AmapError> {
        Ok(self
            .optional_str(field)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn optional_int(&self, field: &str) -> Result<Option<i64>, AmapError> {
        let invalid = |got: &str| AmapError::input(field, format!("expected an integer, got {}", got));
        match self.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(invalid(&n.to_string())),
                },
            },
            Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid(s)),
            Some(other) => Err(invalid(json_type_name(other))),
        }
    }

    pub fn int_or(&self, field: &str, default: i64) -> Result<i64, AmapError> {
        Ok(self.optional_int(field)?.unwrap_or(default))
    }

    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, AmapError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(AmapError::input(field, format!("expected a boolean, got {}", s))),
            },
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => Ok(Some(true)),
                Some(0) => Ok(Some(false)),
                _ => Err(AmapError::input(field, format!("expected a boolean, got {}", n))),
            },
            Some(other) => Err(AmapError::input(
                field,
                format!("expected a boolean, got {}", json_type_name(other)),
            )),
        }
    }
}
