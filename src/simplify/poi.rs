//! POI search, POI detail and AOI boundary projections.

use serde_json::{json, Map, Value};

use super::{field, pick, truthy, SimplifyContext};
use crate::types::Extensions;

const POI_FIELDS: [&str; 9] = [
    "id", "name", "type", "typecode", "address", "location", "distance", "citycode", "adcode",
];

const DETAIL_FIELDS: [&str; 12] = [
    "id", "name", "type", "typecode", "address", "location", "citycode", "adcode", "pname",
    "cityname", "adname", "biz_ext",
];

const AOI_FIELDS: [&str; 10] = [
    "id", "name", "location", "polyline", "type", "typecode", "pname", "cityname", "adname",
    "address",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SearchKind {
    Text,
    Around,
    Polygon,
}

impl SearchKind {
    fn default_limit(self) -> usize {
        match self {
            SearchKind::Text => 10,
            SearchKind::Around | SearchKind::Polygon => 20,
        }
    }
}

pub(super) fn simplify_search(raw: &Value, ctx: &SimplifyContext, kind: SearchKind) -> Option<Value> {
    let pois = raw.get("pois")?.as_array()?;
    let limit = ctx.limit.unwrap_or_else(|| kind.default_limit());

    let mut out = Map::new();
    out.insert("status".into(), json!("1"));
    out.insert("count".into(), field(raw, "count"));
    out.insert("info".into(), field(raw, "info"));

    match kind {
        SearchKind::Text => {
            if truthy(raw.get("suggestion")) {
                out.insert("suggestion".into(), suggestion(&raw["suggestion"]));
            }
        }
        SearchKind::Around => {
            let location = raw
                .get("location")
                .cloned()
                .or_else(|| ctx.center.clone().map(Value::String))
                .unwrap_or(Value::Null);
            out.insert("location".into(), location);
        }
        SearchKind::Polygon => {
            let polygon = raw
                .get("polygon")
                .cloned()
                .or_else(|| ctx.polygon.clone().map(Value::String))
                .unwrap_or(Value::Null);
            out.insert("polygon".into(), polygon);
        }
    }

    let pois: Vec<Value> = pois
        .iter()
        .take(limit)
        .map(|poi| project_poi(poi, ctx.extensions))
        .collect();
    out.insert("pois".into(), Value::Array(pois));

    Some(Value::Object(out))
}

fn project_poi(poi: &Value, extensions: Extensions) -> Value {
    let mut out = pick(poi, &POI_FIELDS);
    // biz_ext is only populated on the "all" detail level
    let detailed = extensions == Extensions::All
        || poi.get("extensions").and_then(Value::as_str) == Some("all");
    out["biz_ext"] = if detailed {
        field(poi, "biz_ext")
    } else {
        Value::Null
    };
    out
}

fn suggestion(raw: &Value) -> Value {
    let cities: Vec<Value> = raw
        .get("cities")
        .and_then(Value::as_array)
        .map(|cities| {
            cities
                .iter()
                .map(|c| pick(c, &["name", "citycode", "adcode"]))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "keywords": raw.get("keywords").cloned().unwrap_or_else(|| json!([])),
        "cities": cities,
    })
}

/// Single POI under `poi`, or the first entry of `pois`.
pub(super) fn simplify_detail(raw: &Value) -> Option<Value> {
    let poi = match raw.get("poi") {
        Some(poi) if poi.is_object() => poi,
        _ => raw.get("pois")?.as_array()?.first()?,
    };

    Some(json!({
        "status": "1",
        "info": field(raw, "info"),
        "poi": pick(poi, &DETAIL_FIELDS),
    }))
}

pub(super) fn simplify_aoi(raw: &Value) -> Option<Value> {
    let aoi = raw.get("aois")?.as_array()?.first()?;

    Some(json!({
        "status": "1",
        "info": field(raw, "info"),
        "aoi": pick(aoi, &AOI_FIELDS),
    }))
}
