//! Geocoding and reverse-geocoding parameters.

use serde_json::{json, Value};

use super::{coordinate_property, extensions_property, key_property, require_coordinate,
            require_non_blank, Parameters};
use crate::endpoint::Operation;
use crate::error::AmapError;
use crate::input::FieldReader;
use crate::query::QueryParams;
use crate::simplify::SimplifyContext;
use crate::types::Extensions;

/// Address to coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingParams {
    pub address: String,
    pub city: Option<String>,
    pub sig: Option<String>,
    pub key: Option<String>,
}

impl Parameters for GeocodingParams {
    const OPERATION: Operation = Operation::Geocoding;

    fn description() -> &'static str {
        "Geocoding: convert a structured address (e.g. \"北京市朝阳区阜通东大街6号\") into \
         coordinates. Returns every candidate with location, adcode, citycode and level."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "Structured address to geocode"
                },
                "city": {
                    "type": "string",
                    "description": "Restrict the search to this city (name, citycode or adcode)"
                },
                "sig": { "type": "string", "description": "Request signature (optional)" },
                "key": key_property()
            },
            "required": ["address"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            address: fields.required_str("address")?,
            city: fields.optional_str("city")?,
            sig: fields.optional_str("sig")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_non_blank("address", &self.address)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("address", &self.address)
            .optional("city", self.city.as_ref())
            .optional("sig", self.sig.as_ref())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// Coordinates to address, with nearby POIs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseGeocodingParams {
    pub location: String,
    pub radius: String,
    pub poitype: Option<String>,
    pub extensions: Extensions,
    pub roadlevel: Option<String>,
    pub sig: Option<String>,
    pub key: Option<String>,
}

const DEFAULT_REGEO_RADIUS: &str = "1000";

impl Parameters for ReverseGeocodingParams {
    const OPERATION: Operation = Operation::ReverseGeocoding;

    fn description() -> &'static str {
        "Reverse geocoding: convert \"lon,lat\" coordinates into a structured address. \
         Returns the address components and at most 10 nearby POIs."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": coordinate_property("Point to resolve"),
                "radius": {
                    "type": "string",
                    "default": DEFAULT_REGEO_RADIUS,
                    "description": "Search radius in meters for nearby POIs"
                },
                "poitype": { "type": "string", "description": "POI type filter (optional)" },
                "extensions": extensions_property(),
                "roadlevel": { "type": "string", "description": "Road level filter (optional)" },
                "sig": { "type": "string", "description": "Request signature (optional)" },
                "key": key_property()
            },
            "required": ["location"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        let extensions = fields.str_or("extensions", "base")?;
        Ok(Self {
            location: fields.required_str("location")?,
            radius: fields.str_or("radius", DEFAULT_REGEO_RADIUS)?,
            poitype: fields.optional_str("poitype")?,
            extensions: Extensions::parse("extensions", &extensions)?,
            roadlevel: fields.optional_str("roadlevel")?,
            sig: fields.optional_str("sig")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_coordinate("location", &self.location)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("location", &self.location)
            .required("radius", &self.radius)
            .optional("poitype", self.poitype.as_ref())
            .required("extensions", self.extensions.as_str())
            .optional("roadlevel", self.roadlevel.as_ref())
            .optional("sig", self.sig.as_ref())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn simplify_context(&self) -> SimplifyContext {
        SimplifyContext {
            extensions: self.extensions,
            ..SimplifyContext::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn read<P: Parameters>(value: Value) -> Result<P, AmapError> {
        let map: Map<String, Value> = value.as_object().cloned().unwrap();
        P::from_fields(&FieldReader::new(&map))
    }

    #[test]
    fn test_geocoding_defaults() {
        let p: GeocodingParams = read(json!({"address": "北京市朝阳区阜通东大街6号"})).unwrap();
        assert!(p.city.is_none());
        assert!(p.validate().is_ok());
        let q = p.query();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_geocoding_blank_address() {
        let p: GeocodingParams = read(json!({"address": "  "})).unwrap();
        match p.validate().unwrap_err() {
            AmapError::Input { field, .. } => assert_eq!(field, "address"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reverse_defaults() {
        let p: ReverseGeocodingParams = read(json!({"location": "116.481488,39.990464"})).unwrap();
        assert_eq!(p.radius, "1000");
        assert_eq!(p.extensions, Extensions::Base);
        let q = p.query();
        assert_eq!(q.get("radius"), Some("1000"));
        assert_eq!(q.get("extensions"), Some("base"));
        assert!(!q.contains("poitype"));
    }

    #[test]
    fn test_reverse_numeric_radius_is_coerced() {
        let p: ReverseGeocodingParams =
            read(json!({"location": "116.48,39.99", "radius": 500})).unwrap();
        assert_eq!(p.radius, "500");
    }

    #[test]
    fn test_reverse_rejects_bad_location() {
        let p: ReverseGeocodingParams = read(json!({"location": "200,90"})).unwrap();
        let err = p.validate().unwrap_err();
        assert!(matches!(err, AmapError::Format { .. }));
        assert!(err.to_string().contains("200,90"));
    }

    #[test]
    fn test_reverse_rejects_unknown_extensions() {
        let err = read::<ReverseGeocodingParams>(
            json!({"location": "116.48,39.99", "extensions": "everything"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("extensions"));
    }
}
