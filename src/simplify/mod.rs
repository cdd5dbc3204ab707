//! Response simplification.
//!
//! The provider's responses are verbose and nested differently for every
//! endpoint. This module reduces each one to a small, stable shape:
//!
//! - the status flag is classified once into a [`ProviderStatus`]
//! - each operation family has one projection function
//! - a projection that cannot find its expected nested key gives up, and the
//!   raw payload is returned untouched so callers still see what the
//!   provider actually sent
//!
//! Every projected record carries a fixed field set; values the provider
//! left out come back as `null`.

mod district;
mod geocode;
mod poi;
mod route;

pub use route::{truncate_polyline, MAX_POLYLINE_CHARS};

use serde_json::{Map, Value};

use crate::types::Extensions;

/// Response shape family. Several operations may share one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Geocode,
    ReverseGeocode,
    Route,
    PoiText,
    PoiAround,
    PoiPolygon,
    PoiDetail,
    AoiBoundary,
    District,
    IpLocation,
}

/// Request facts the provider does not echo back but the projection needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplifyContext {
    /// Maximum number of list entries to keep, where the family truncates.
    pub limit: Option<usize>,
    /// Detail level the request asked for.
    pub extensions: Extensions,
    /// Search center of an around query.
    pub center: Option<String>,
    /// Search area of a polygon query.
    pub polygon: Option<String>,
}

/// Classification of the provider's `status` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderStatus {
    Success,
    Failure {
        info: String,
        infocode: Option<String>,
    },
    /// No status field at all.
    Absent,
}

impl ProviderStatus {
    pub fn of(raw: &Value) -> Self {
        match raw.get("status") {
            None | Some(Value::Null) => ProviderStatus::Absent,
            Some(Value::String(s)) if s == "1" => ProviderStatus::Success,
            Some(Value::Number(n)) if n.as_i64() == Some(1) => ProviderStatus::Success,
            Some(_) => ProviderStatus::Failure {
                info: text(raw.get("info")),
                infocode: raw
                    .get("infocode")
                    .map(|v| text(Some(v)))
                    .filter(|s| !s.is_empty()),
            },
        }
    }
}

/// Project `raw` into the stable shape of `family`.
///
/// Returns `raw` unchanged when the status is not a success or the
/// expected nested key is missing.
pub fn simplify(family: Family, raw: Value, ctx: &SimplifyContext) -> Value {
    if ProviderStatus::of(&raw) != ProviderStatus::Success {
        return raw;
    }

    let projected = match family {
        Family::Geocode => geocode::simplify_geocoding(&raw),
        Family::ReverseGeocode => geocode::simplify_reverse_geocoding(&raw),
        Family::Route => route::simplify_route(&raw),
        Family::PoiText => poi::simplify_search(&raw, ctx, poi::SearchKind::Text),
        Family::PoiAround => poi::simplify_search(&raw, ctx, poi::SearchKind::Around),
        Family::PoiPolygon => poi::simplify_search(&raw, ctx, poi::SearchKind::Polygon),
        Family::PoiDetail => poi::simplify_detail(&raw),
        Family::AoiBoundary => poi::simplify_aoi(&raw),
        Family::District => district::simplify_region(&raw),
        Family::IpLocation => district::simplify_ip(&raw),
    };

    projected.unwrap_or(raw)
}

// --- Field helpers shared by the projections ---

/// Clone `key` out of `obj`, or `null`.
pub(crate) fn field(obj: &Value, key: &str) -> Value {
    obj.get(key).cloned().unwrap_or(Value::Null)
}

/// A new object holding exactly `keys`, copied from `obj`.
pub(crate) fn pick(obj: &Value, keys: &[&str]) -> Value {
    let mut out = Map::with_capacity(keys.len());
    for key in keys {
        out.insert((*key).to_string(), field(obj, key));
    }
    Value::Object(out)
}

/// Render a scalar as text. Missing values, empty arrays (the provider's
/// way of saying "no value") and other non-scalars render as "".
pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Integer from a number or numeric string.
pub(crate) fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

pub(crate) fn int_or_zero(value: Option<&Value>) -> i64 {
    value.and_then(parse_int).unwrap_or(0)
}

/// Non-empty and non-null.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
