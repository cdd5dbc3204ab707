//! Core data types used throughout amap-tools.
//!
//! This module defines the geographic value types that parameters are
//! parsed into, the tool definition sent to callers, and the uniform
//! response envelope every operation returns.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AmapError;

// --- Geographic values ---

/// A longitude/latitude pair, serialized as `"lon,lat"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// A closed search area of at least three coordinates.
///
/// The caller's text is kept alongside the parsed points so the request
/// forwards exactly what the caller sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Coordinate>,
    pub raw: String,
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// --- Enumerated parameters ---

/// Level of detail requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extensions {
    #[default]
    Base,
    All,
}

impl Extensions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extensions::Base => "base",
            Extensions::All => "all",
        }
    }

    pub fn parse(field: &str, value: &str) -> Result<Self, AmapError> {
        match value {
            "base" => Ok(Extensions::Base),
            "all" => Ok(Extensions::All),
            other => Err(AmapError::input(
                field,
                format!("expected \"base\" or \"all\", got \"{}\"", other),
            )),
        }
    }
}

/// HTTP verb used for a provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

// --- Tool Definition ---

/// Describes a tool's interface to the caller via JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool's name (e.g. "geocoding")
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema describing the tool's input parameters
    pub input_schema: Value,
}

// --- Response Envelope ---

pub const DEFAULT_SUCCESS_INFO: &str = "OK";
pub const DEFAULT_FAILURE_INFO: &str = "request failed";

/// The uniform wrapper every operation returns.
///
/// `status == 1` carries `data` and no `error`; `status == 0` carries an
/// `error` and no `data`. Only the two constructors build one, so the
/// pairing cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u8,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub info: String,
}

impl ResponseEnvelope {
    /// Successful result. An empty `info` falls back to "OK".
    pub fn success(data: Value, info: impl Into<String>) -> Self {
        let info = info.into();
        Self {
            status: 1,
            data: Some(data),
            error: None,
            info: if info.is_empty() {
                DEFAULT_SUCCESS_INFO.to_string()
            } else {
                info
            },
        }
    }

    /// Failed result. An empty `info` falls back to "request failed".
    pub fn failure(message: impl Into<String>, info: impl Into<String>) -> Self {
        let info = info.into();
        Self {
            status: 0,
            data: None,
            error: Some(message.into()),
            info: if info.is_empty() {
                DEFAULT_FAILURE_INFO.to_string()
            } else {
                info
            },
        }
    }

    pub fn from_error(err: &AmapError) -> Self {
        Self::failure(err.to_string(), err.kind())
    }

    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate {
            lon: 116.481488,
            lat: 39.990464,
        };
        assert_eq!(c.to_string(), "116.481488,39.990464");
    }

    #[test]
    fn test_extensions_parse() {
        assert_eq!(Extensions::parse("extensions", "all").unwrap(), Extensions::All);
        assert_eq!(Extensions::parse("extensions", "base").unwrap(), Extensions::Base);
        let err = Extensions::parse("extensions", "full").unwrap_err();
        assert!(err.to_string().contains("extensions"));
    }

    #[test]
    fn test_success_envelope() {
        let env = ResponseEnvelope::success(json!({"a": 1}), "");
        assert_eq!(env.status, 1);
        assert!(env.error.is_none());
        assert_eq!(env.info, "OK");

        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["error"], Value::Null);
        assert_eq!(value["data"]["a"], 1);
    }

    #[test]
    fn test_failure_envelope() {
        let env = ResponseEnvelope::failure("boom", "");
        assert_eq!(env.status, 0);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("boom"));
        assert_eq!(env.info, "request failed");
    }

    #[test]
    fn test_from_error_uses_kind_as_info() {
        let env = ResponseEnvelope::from_error(&AmapError::Configuration("no key".into()));
        assert_eq!(env.info, "configuration error");
        assert_eq!(env.error.as_deref(), Some("no key"));
    }
}
