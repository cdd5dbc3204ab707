//! Canonical parameter records, one per operation.
//!
//! Each record knows how to build itself from a [`FieldReader`], how to
//! check its own values, and how to describe itself as an outbound query.
//! Records are built once per call and never mutated afterwards.

pub mod district;
pub mod geocode;
pub mod poi;
pub mod route;

use serde_json::{json, Value};

use crate::endpoint::Operation;
use crate::error::AmapError;
use crate::input::FieldReader;
use crate::query::QueryParams;
use crate::simplify::SimplifyContext;
use crate::validate::validate_coordinate;

/// Behavior shared by every operation's parameter record.
pub trait Parameters: Sized + Clone + Send + Sync + 'static {
    /// The operation this record feeds.
    const OPERATION: Operation;

    /// Human-readable description shown to callers.
    fn description() -> &'static str;

    /// JSON Schema of the accepted fields.
    fn schema() -> Value;

    /// Build the record from a field map, applying defaults.
    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError>;

    /// Format, bounds and non-blank checks. Runs before any request.
    fn validate(&self) -> Result<(), AmapError>;

    /// The record's own query parameters (the API key is added separately).
    fn query(&self) -> QueryParams;

    /// Per-call key, if the caller supplied one.
    fn api_key(&self) -> Option<&str>;

    /// Request facts the simplifier needs to shape the result.
    fn simplify_context(&self) -> SimplifyContext {
        SimplifyContext::default()
    }
}

// --- Shared checks ---

pub(crate) fn require_coordinate(field: &str, value: &str) -> Result<(), AmapError> {
    validate_coordinate(value)
        .map(|_| ())
        .map_err(|_| AmapError::format(value, format!("invalid {} coordinate", field)))
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), AmapError> {
    if value.trim().is_empty() {
        Err(AmapError::input(field, "must not be empty"))
    } else {
        Ok(())
    }
}

pub(crate) fn require_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), AmapError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AmapError::input(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ))
    }
}

// --- Shared schema fragments ---

pub(crate) fn key_property() -> Value {
    json!({
        "type": "string",
        "description": "API key for this call (optional, defaults to the configured key)"
    })
}

pub(crate) fn coordinate_property(description: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("{} as \"lon,lat\"", description)
    })
}

pub(crate) fn extensions_property() -> Value {
    json!({
        "type": "string",
        "enum": ["base", "all"],
        "default": "base",
        "description": "Detail level: base or all"
    })
}
