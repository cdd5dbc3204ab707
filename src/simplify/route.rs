//! Route projections shared by every routing mode.

use serde_json::{json, Map, Value};

use super::{field, int_or_zero, parse_int, truthy};

/// Polylines longer than this many characters are cut.
pub const MAX_POLYLINE_CHARS: usize = 200;

/// Ranking value for a transit alternative with no usable duration.
const UNKNOWN_DURATION: i64 = 999_999;

/// The provider returns transit plans and road paths under different keys.
/// Which one is present is decided once here.
enum RouteShape<'a> {
    Transit(&'a [Value]),
    Paths(&'a [Value]),
    Bare,
}

impl<'a> RouteShape<'a> {
    fn of(route: &'a Value) -> Self {
        fn list(v: &Value) -> &[Value] {
            v.as_array().map(Vec::as_slice).unwrap_or(&[])
        }

        if let Some(transits) = route.get("transits") {
            RouteShape::Transit(list(transits))
        } else if let Some(paths) = route.get("paths") {
            RouteShape::Paths(list(paths))
        } else {
            RouteShape::Bare
        }
    }
}

/// Keep the first [`MAX_POLYLINE_CHARS`] characters and mark the cut.
pub fn truncate_polyline(polyline: &str) -> String {
    match polyline.char_indices().nth(MAX_POLYLINE_CHARS) {
        Some((cut, _)) => format!("{}...", &polyline[..cut]),
        None => polyline.to_string(),
    }
}

pub(super) fn simplify_route(raw: &Value) -> Option<Value> {
    let route = raw
        .get("route")
        .filter(|r| r.as_object().is_some_and(|o| !o.is_empty()))?;

    let mut out = Map::new();
    out.insert("status".into(), json!("1"));
    out.insert("info".into(), field(raw, "info"));
    out.insert("origin".into(), field(route, "origin"));
    out.insert("destination".into(), field(route, "destination"));
    out.insert("paths".into(), json!([]));

    match RouteShape::of(route) {
        RouteShape::Transit(transits) => {
            let (paths, summary) = match fastest_transit(transits) {
                Some(best) => (transit_steps(best), transit_summary(best)),
                None => (Vec::new(), json!({})),
            };
            out.insert("paths".into(), Value::Array(paths));
            out.insert("summary".into(), summary);
        }
        RouteShape::Paths(paths) => {
            // first alternative only
            let (paths, summary) = match paths.first() {
                Some(best) => (path_steps(best), path_summary(best)),
                None => (Vec::new(), json!({})),
            };
            out.insert("paths".into(), Value::Array(paths));
            out.insert("summary".into(), summary);
        }
        RouteShape::Bare => {}
    }

    Some(Value::Object(out))
}

// --- Transit ---

/// Shortest duration wins; ties keep the earliest alternative.
fn fastest_transit(transits: &[Value]) -> Option<&Value> {
    let duration = |t: &Value| {
        t.get("duration")
            .and_then(parse_int)
            .unwrap_or(UNKNOWN_DURATION)
    };

    let mut best: Option<(&Value, i64)> = None;
    for transit in transits {
        let d = duration(transit);
        match best {
            Some((_, current)) if current <= d => {}
            _ => best = Some((transit, d)),
        }
    }
    best.map(|(t, _)| t)
}

fn transit_summary(transit: &Value) -> Value {
    json!({
        "duration": int_or_zero(transit.get("duration")),
        "distance": int_or_zero(transit.get("distance")),
        "walking_distance": int_or_zero(transit.get("walking_distance")),
        "cost": transit.get("cost").map(|c| field(c, "price")).unwrap_or(Value::Null),
    })
}

/// One record per walking leg, bus line and railway leg, in segment order.
fn transit_steps(transit: &Value) -> Vec<Value> {
    let mut steps = Vec::new();
    let segments = transit
        .get("segments")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for segment in segments {
        if truthy(segment.get("walking")) {
            let walking = &segment["walking"];
            steps.push(json!({
                "type": "walking",
                "from": field(walking, "origin"),
                "to": field(walking, "destination"),
                "distance": int_or_zero(walking.get("distance")),
                "action": field(walking, "action"),
            }));
        }

        if truthy(segment.get("bus")) {
            let buslines = segment["bus"]
                .get("buslines")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            steps.extend(buslines.iter().map(|line| line_step("bus", line)));
        }

        if truthy(segment.get("railway")) {
            steps.push(line_step("subway", &segment["railway"]));
        }
    }

    steps
}

fn line_step(kind: &str, line: &Value) -> Value {
    let stop = |key: &str| {
        line.get(key)
            .map(|s| field(s, "name"))
            .unwrap_or(Value::Null)
    };
    json!({
        "type": kind,
        "line_name": field(line, "name"),
        "from_stop": stop("departure_stop"),
        "to_stop": stop("arrival_stop"),
        "distance": int_or_zero(line.get("distance")),
        "duration": int_or_zero(line.get("duration")),
    })
}

// --- Driving, walking, cycling ---

fn path_summary(path: &Value) -> Value {
    let mut summary = json!({
        "duration": int_or_zero(path.get("duration")),
        "distance": int_or_zero(path.get("distance")),
    });
    if truthy(path.get("cost")) {
        summary["cost_info"] = field(path, "cost");
    }
    summary
}

fn path_steps(path: &Value) -> Vec<Value> {
    path
        .get("steps")
        .and_then(Value::as_array)
        .map(|steps| {
            steps
                .iter()
                .map(|step| {
                    json!({
                        "instruction": field(step, "instruction"),
                        "orientation": field(step, "orientation"),
                        "road_name": field(step, "road_name"),
                        "distance": int_or_zero(step.get("step_distance")),
                        "polyline": step_polyline(step.get("polyline")),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// The polyline is a plain string, or `{"polyline": "..."}` when requested
/// through `show_fields`.
fn step_polyline(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => Value::String(truncate_polyline(s)),
        Some(Value::Object(o)) => match o.get("polyline") {
            Some(Value::String(s)) => Value::String(truncate_polyline(s)),
            _ => Value::Object(o.clone()),
        },
        Some(other) => other.clone(),
        None => Value::Null,
    }
}
