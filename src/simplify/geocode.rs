//! Geocoding and reverse-geocoding projections.

use serde_json::{json, Value};

use super::{field, pick, text};

const ADDRESS_PARTS: [&str; 6] = ["country", "province", "city", "district", "street", "number"];

const GEOCODE_FIELDS: [&str; 11] = [
    "country", "province", "city", "citycode", "district", "township", "street", "number",
    "adcode", "level", "location",
];

const REGEO_POI_FIELDS: [&str; 7] = [
    "id", "name", "type", "typecode", "address", "location", "distance",
];

/// Nearby POIs kept in a reverse-geocoding result.
const MAX_REGEO_POIS: usize = 10;

/// Every candidate is kept; geocoding does not truncate.
pub(super) fn simplify_geocoding(raw: &Value) -> Option<Value> {
    let geocodes = raw
        .get("geocodes")?
        .as_array()
        .filter(|list| !list.is_empty())?;

    let results: Vec<Value> = geocodes.iter().map(project_geocode).collect();

    Some(json!({
        "status": "1",
        "count": field(raw, "count"),
        "info": field(raw, "info"),
        "results": results,
    }))
}

fn project_geocode(geo: &Value) -> Value {
    let formatted: String = ADDRESS_PARTS
        .iter()
        .map(|part| text(geo.get(*part)))
        .collect();

    let mut out = json!({
        "location": field(geo, "location"),
        "formatted_address": formatted,
    });
    if let (Some(out), Value::Object(rest)) = (out.as_object_mut(), pick(geo, &GEOCODE_FIELDS)) {
        for (k, v) in rest {
            out.entry(k).or_insert(v);
        }
    }
    out
}

pub(super) fn simplify_reverse_geocoding(raw: &Value) -> Option<Value> {
    let regeo = raw
        .get("regeocode")
        .filter(|r| r.as_object().is_some_and(|o| !o.is_empty()))?;

    let addr = regeo.get("addressComponent").cloned().unwrap_or(Value::Null);

    // "lon,lat" order on the wire
    let (lat, lng) = match regeo.get("location").and_then(Value::as_str) {
        Some(location) => {
            let parts: Vec<&str> = location.split(',').collect();
            (
                parts.get(1).map(|s| Value::from(*s)).unwrap_or(Value::Null),
                parts.first().map(|s| Value::from(*s)).unwrap_or(Value::Null),
            )
        }
        None => (Value::Null, Value::Null),
    };

    let pois: Vec<Value> = regeo
        .get("pois")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .take(MAX_REGEO_POIS)
                .map(|poi| pick(poi, &REGEO_POI_FIELDS))
                .collect()
        })
        .unwrap_or_default();

    Some(json!({
        "status": "1",
        "info": field(raw, "info"),
        "location": { "lat": lat, "lng": lng },
        "address": {
            "country": field(&addr, "country"),
            "province": field(&addr, "province"),
            "city": field(&addr, "city"),
            "citycode": field(&addr, "citycode"),
            "district": field(&addr, "district"),
            "adcode": field(&addr, "adcode"),
            "township": field(&addr, "township"),
            "street": field(&addr, "street"),
            "street_number": field(&addr, "streetNumber"),
            "formatted": field(regeo, "formatted_address"),
        },
        "pois": pois,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geocode_payload(n: usize) -> Value {
        let geocodes: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "country": "中国",
                    "province": "北京市",
                    "city": "北京市",
                    "citycode": "010",
                    "district": "朝阳区",
                    "street": "阜通东大街",
                    "number": format!("{}号", i),
                    "adcode": "110105",
                    "location": "116.482086,39.990496",
                    "level": "门牌号",
                    "neighborhood": {"name": [], "type": []},
                })
            })
            .collect();
        json!({"status": "1", "info": "OK", "infocode": "10000", "count": n.to_string(), "geocodes": geocodes})
    }

    #[test]
    fn test_geocoding_keeps_every_candidate() {
        let out = simplify_geocoding(&geocode_payload(25)).unwrap();
        assert_eq!(out["results"].as_array().unwrap().len(), 25);
        assert_eq!(out["count"], "25");
    }

    #[test]
    fn test_geocoding_formatted_address() {
        let out = simplify_geocoding(&geocode_payload(1)).unwrap();
        let first = &out["results"][0];
        assert_eq!(first["formatted_address"], "中国北京市北京市朝阳区阜通东大街0号");
        assert_eq!(first["location"], "116.482086,39.990496");
        assert_eq!(first["level"], "门牌号");
        assert_eq!(first["township"], Value::Null);
        assert!(first.get("neighborhood").is_none());
    }

    #[test]
    fn test_geocoding_missing_parts_render_empty() {
        let raw = json!({
            "status": "1",
            "geocodes": [{"province": "北京市", "city": [], "location": "1,2"}]
        });
        let out = simplify_geocoding(&raw).unwrap();
        assert_eq!(out["results"][0]["formatted_address"], "北京市");
    }

    #[test]
    fn test_geocoding_empty_list_is_a_mismatch() {
        assert!(simplify_geocoding(&json!({"status": "1", "geocodes": []})).is_none());
    }

    fn regeo_payload(poi_count: usize) -> Value {
        let pois: Vec<Value> = (0..poi_count)
            .map(|i| {
                json!({
                    "id": format!("B{:09}", i),
                    "name": format!("POI {}", i),
                    "type": "餐饮服务",
                    "typecode": "050000",
                    "address": "阜通东大街",
                    "location": "116.48,39.99",
                    "distance": "12.3",
                    "businessarea": "望京",
                })
            })
            .collect();
        json!({
            "status": "1",
            "info": "OK",
            "regeocode": {
                "formatted_address": "北京市朝阳区望京街道阜通东大街6号",
                "location": "116.481488,39.990464",
                "addressComponent": {
                    "country": "中国",
                    "province": "北京市",
                    "city": [],
                    "citycode": "010",
                    "district": "朝阳区",
                    "adcode": "110105",
                    "township": "望京街道",
                    "streetNumber": {"street": "阜通东大街", "number": "6号"}
                },
                "pois": pois
            }
        })
    }

    #[test]
    fn test_reverse_splits_location() {
        let out = simplify_reverse_geocoding(&regeo_payload(0)).unwrap();
        assert_eq!(out["location"]["lat"], "39.990464");
        assert_eq!(out["location"]["lng"], "116.481488");
        assert_eq!(out["address"]["formatted"], "北京市朝阳区望京街道阜通东大街6号");
        assert_eq!(out["address"]["street_number"]["number"], "6号");
        assert_eq!(out["address"]["street"], Value::Null);
    }

    #[test]
    fn test_reverse_truncates_pois_to_ten() {
        let out = simplify_reverse_geocoding(&regeo_payload(15)).unwrap();
        let pois = out["pois"].as_array().unwrap();
        assert_eq!(pois.len(), 10);
        assert_eq!(pois[0]["name"], "POI 0");
        assert_eq!(pois[9]["name"], "POI 9");
        assert!(pois[0].get("businessarea").is_none());
    }

    #[test]
    fn test_reverse_without_location() {
        let raw = json!({"status": "1", "regeocode": {"formatted_address": "x"}});
        let out = simplify_reverse_geocoding(&raw).unwrap();
        assert_eq!(out["location"]["lat"], Value::Null);
        assert_eq!(out["pois"], json!([]));
    }

    #[test]
    fn test_reverse_empty_regeocode_is_a_mismatch() {
        assert!(simplify_reverse_geocoding(&json!({"status": "1", "regeocode": {}})).is_none());
        assert!(simplify_reverse_geocoding(&json!({"status": "1"})).is_none());
    }
}
