//! Administrative region and IP location projections.

use serde_json::{json, Value};

use super::field;

pub(super) fn simplify_region(raw: &Value) -> Option<Value> {
    let districts = raw.get("districts")?.as_array()?;

    Some(json!({
        "status": "1",
        "info": field(raw, "info"),
        "districts": districts.iter().map(project_district).collect::<Vec<_>>(),
    }))
}

/// Sub-regions nest to whatever depth the provider returned.
fn project_district(district: &Value) -> Value {
    let children: Vec<Value> = district
        .get("districts")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(project_district).collect())
        .unwrap_or_default();

    json!({
        "name": field(district, "name"),
        "citycode": field(district, "citycode"),
        "adcode": field(district, "adcode"),
        "center": field(district, "center"),
        "level": field(district, "level"),
        "sub_districts": children,
    })
}

pub(super) fn simplify_ip(raw: &Value) -> Option<Value> {
    let result = raw.get("result").filter(|r| r.is_object())?;

    // older responses misspell the key
    let bounds = result
        .get("rectangle")
        .or_else(|| result.get("rectangel"))
        .cloned()
        .unwrap_or(Value::Null);

    Some(json!({
        "status": "1",
        "info": field(raw, "info"),
        "ip": field(result, "ip"),
        "location": {
            "province": field(result, "province"),
            "city": field(result, "city"),
            "adcode": field(result, "adcode"),
        },
        "bounds": bounds,
    }))
}
