//! Route planning parameters: driving, walking, bicycling, e-bike, public
//! transit and subway.

use serde_json::{json, Value};

use super::{coordinate_property, key_property, require_coordinate, require_non_blank, Parameters};
use crate::endpoint::Operation;
use crate::error::AmapError;
use crate::input::FieldReader;
use crate::query::QueryParams;

const DEFAULT_DRIVING_STRATEGY: i64 = 32;
const DEFAULT_TRANSIT_STRATEGY: i64 = 0;

fn validate_endpoints(origin: &str, destination: &str) -> Result<(), AmapError> {
    require_coordinate("origin", origin)?;
    require_coordinate("destination", destination)
}

fn show_fields_property() -> Value {
    json!({ "type": "string", "description": "Extra response fields to return (optional)" })
}

fn alternative_route_property() -> Value {
    json!({ "type": "integer", "description": "Number of alternative routes (optional)" })
}

// --- Driving ---

#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRouteParams {
    pub origin: String,
    pub destination: String,
    pub strategy: i64,
    pub show_fields: Option<String>,
    pub plate: Option<String>,
    pub cartype: i64,
    pub key: Option<String>,
}

impl Parameters for DrivingRouteParams {
    const OPERATION: Operation = Operation::DrivingRoute;

    fn description() -> &'static str {
        "Driving route planning between two \"lon,lat\" points. Returns a duration/distance \
         summary and turn-by-turn steps of the best route."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": coordinate_property("Start point"),
                "destination": coordinate_property("End point"),
                "strategy": {
                    "type": "integer",
                    "default": DEFAULT_DRIVING_STRATEGY,
                    "description": "Routing strategy"
                },
                "show_fields": show_fields_property(),
                "plate": { "type": "string", "description": "License plate, for restriction-aware routing (optional)" },
                "cartype": {
                    "type": "integer",
                    "default": 0,
                    "description": "Vehicle type: 0 fuel, 1 electric, 2 hybrid"
                },
                "key": key_property()
            },
            "required": ["origin", "destination"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            origin: fields.required_str("origin")?,
            destination: fields.required_str("destination")?,
            strategy: fields.int_or("strategy", DEFAULT_DRIVING_STRATEGY)?,
            show_fields: fields.optional_str("show_fields")?,
            plate: fields.optional_str("plate")?,
            cartype: fields.int_or("cartype", 0)?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        validate_endpoints(&self.origin, &self.destination)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("origin", &self.origin)
            .required("destination", &self.destination)
            .required("strategy", self.strategy)
            .optional("show_fields", self.show_fields.as_ref())
            .optional("plate", self.plate.as_ref())
            .required("cartype", self.cartype)
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

// --- Walking ---

#[derive(Debug, Clone, PartialEq)]
pub struct WalkingRouteParams {
    pub origin: String,
    pub destination: String,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub alternative_route: Option<i64>,
    pub show_fields: Option<String>,
    pub isindoor: i64,
    pub key: Option<String>,
}

impl Parameters for WalkingRouteParams {
    const OPERATION: Operation = Operation::WalkingRoute;

    fn description() -> &'static str {
        "Walking route planning between two \"lon,lat\" points."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": coordinate_property("Start point"),
                "destination": coordinate_property("End point"),
                "origin_id": { "type": "string", "description": "POI id of the start point (optional)" },
                "destination_id": { "type": "string", "description": "POI id of the end point (optional)" },
                "alternative_route": alternative_route_property(),
                "show_fields": show_fields_property(),
                "isindoor": {
                    "type": "integer",
                    "default": 0,
                    "description": "Plan indoor routes: 0 no, 1 yes"
                },
                "key": key_property()
            },
            "required": ["origin", "destination"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            origin: fields.required_str("origin")?,
            destination: fields.required_str("destination")?,
            origin_id: fields.optional_str("origin_id")?,
            destination_id: fields.optional_str("destination_id")?,
            alternative_route: fields.optional_int("alternative_route")?,
            show_fields: fields.optional_str("show_fields")?,
            isindoor: fields.int_or("isindoor", 0)?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        validate_endpoints(&self.origin, &self.destination)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("origin", &self.origin)
            .required("destination", &self.destination)
            .optional("origin_id", self.origin_id.as_ref())
            .optional("destination_id", self.destination_id.as_ref())
            .optional("alternative_route", self.alternative_route)
            .optional("show_fields", self.show_fields.as_ref())
            .required("isindoor", self.isindoor)
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

// --- Bicycling and e-bike ---

/// Fields shared by the bicycling and e-bike endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclingFields {
    pub origin: String,
    pub destination: String,
    pub show_fields: Option<String>,
    pub alternative_route: Option<i64>,
    pub key: Option<String>,
}

impl CyclingFields {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": coordinate_property("Start point"),
                "destination": coordinate_property("End point"),
                "show_fields": show_fields_property(),
                "alternative_route": alternative_route_property(),
                "key": key_property()
            },
            "required": ["origin", "destination"]
        })
    }

    fn read(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            origin: fields.required_str("origin")?,
            destination: fields.required_str("destination")?,
            show_fields: fields.optional_str("show_fields")?,
            alternative_route: fields.optional_int("alternative_route")?,
            key: fields.optional_str("key")?,
        })
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("origin", &self.origin)
            .required("destination", &self.destination)
            .optional("show_fields", self.show_fields.as_ref())
            .optional("alternative_route", self.alternative_route)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BicyclingRouteParams(pub CyclingFields);

impl Parameters for BicyclingRouteParams {
    const OPERATION: Operation = Operation::BicyclingRoute;

    fn description() -> &'static str {
        "Bicycling route planning between two \"lon,lat\" points."
    }

    fn schema() -> Value {
        CyclingFields::schema()
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        CyclingFields::read(fields).map(Self)
    }

    fn validate(&self) -> Result<(), AmapError> {
        validate_endpoints(&self.0.origin, &self.0.destination)
    }

    fn query(&self) -> QueryParams {
        self.0.query()
    }

    fn api_key(&self) -> Option<&str> {
        self.0.key.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElectBikeRouteParams(pub CyclingFields);

impl Parameters for ElectBikeRouteParams {
    const OPERATION: Operation = Operation::ElectBikeRoute;

    fn description() -> &'static str {
        "Electric bike route planning between two \"lon,lat\" points."
    }

    fn schema() -> Value {
        CyclingFields::schema()
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        CyclingFields::read(fields).map(Self)
    }

    fn validate(&self) -> Result<(), AmapError> {
        validate_endpoints(&self.0.origin, &self.0.destination)
    }

    fn query(&self) -> QueryParams {
        self.0.query()
    }

    fn api_key(&self) -> Option<&str> {
        self.0.key.as_deref()
    }
}

// --- Public transit ---

#[derive(Debug, Clone, PartialEq)]
pub struct PublicTransitRouteParams {
    pub origin: String,
    pub destination: String,
    pub city1: String,
    pub city2: String,
    pub strategy: i64,
    pub date: Option<String>,
    pub time: Option<String>,
    pub show_fields: Option<String>,
    pub alternative_route: Option<i64>,
    pub key: Option<String>,
}

impl Parameters for PublicTransitRouteParams {
    const OPERATION: Operation = Operation::PublicTransitRoute;

    fn description() -> &'static str {
        "Public transit route planning, possibly across cities. Picks the fastest itinerary \
         and returns its walking, bus and subway legs."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": coordinate_property("Start point"),
                "destination": coordinate_property("End point"),
                "city1": { "type": "string", "description": "City code of the start point" },
                "city2": { "type": "string", "description": "City code of the end point" },
                "strategy": {
                    "type": "integer",
                    "default": DEFAULT_TRANSIT_STRATEGY,
                    "description": "0 cheapest, 1 least walking, 2 fastest, 3 fewest transfers"
                },
                "date": { "type": "string", "description": "Departure date YYYYMMDD (optional)" },
                "time": { "type": "string", "description": "Departure time HHmm (optional)" },
                "show_fields": show_fields_property(),
                "alternative_route": alternative_route_property(),
                "key": key_property()
            },
            "required": ["origin", "destination", "city1", "city2"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            origin: fields.required_str("origin")?,
            destination: fields.required_str("destination")?,
            city1: fields.required_str("city1")?,
            city2: fields.required_str("city2")?,
            strategy: fields.int_or("strategy", DEFAULT_TRANSIT_STRATEGY)?,
            date: fields.optional_str("date")?,
            time: fields.optional_str("time")?,
            show_fields: fields.optional_str("show_fields")?,
            alternative_route: fields.optional_int("alternative_route")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_non_blank("origin", &self.origin)?;
        require_non_blank("destination", &self.destination)?;
        require_non_blank("city1", &self.city1)?;
        require_non_blank("city2", &self.city2)?;
        validate_endpoints(&self.origin, &self.destination)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("origin", &self.origin)
            .required("destination", &self.destination)
            .required("city1", &self.city1)
            .required("city2", &self.city2)
            .required("strategy", self.strategy)
            .optional("date", self.date.as_ref())
            .optional("time", self.time.as_ref())
            .optional("show_fields", self.show_fields.as_ref())
            .optional("alternative_route", self.alternative_route)
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

// --- Subway ---

#[derive(Debug, Clone, PartialEq)]
pub struct SubwayRouteParams {
    pub origin: String,
    pub destination: String,
    pub city: String,
    pub strategy: i64,
    pub date: Option<String>,
    pub time: Option<String>,
    pub show_fields: Option<String>,
    pub key: Option<String>,
}

impl Parameters for SubwayRouteParams {
    const OPERATION: Operation = Operation::SubwayRoute;

    fn description() -> &'static str {
        "Subway and bus route planning within one city. Picks the fastest itinerary."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": coordinate_property("Start point"),
                "destination": coordinate_property("End point"),
                "city": { "type": "string", "description": "City name or code" },
                "strategy": {
                    "type": "integer",
                    "default": DEFAULT_TRANSIT_STRATEGY,
                    "description": "0 cheapest, 1 least walking, 2 fastest, 3 fewest transfers"
                },
                "date": { "type": "string", "description": "Departure date YYYYMMDD (optional)" },
                "time": { "type": "string", "description": "Departure time HHmm (optional)" },
                "show_fields": show_fields_property(),
                "key": key_property()
            },
            "required": ["origin", "destination", "city"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            origin: fields.required_str("origin")?,
            destination: fields.required_str("destination")?,
            city: fields.required_str("city")?,
            strategy: fields.int_or("strategy", DEFAULT_TRANSIT_STRATEGY)?,
            date: fields.optional_str("date")?,
            time: fields.optional_str("time")?,
            show_fields: fields.optional_str("show_fields")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        validate_endpoints(&self.origin, &self.destination)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("origin", &self.origin)
            .required("destination", &self.destination)
            .required("city", &self.city)
            .required("strategy", self.strategy)
            .optional("date", self.date.as_ref())
            .optional("time", self.time.as_ref())
            .optional("show_fields", self.show_fields.as_ref())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
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

    const A: &str = "116.481028,39.989643";
    const B: &str = "116.434446,39.90816";

    #[test]
    fn test_driving_defaults() {
        let p: DrivingRouteParams = read(json!({"origin": A, "destination": B})).unwrap();
        assert_eq!(p.strategy, 32);
        assert_eq!(p.cartype, 0);
        let q = p.query();
        assert_eq!(q.get("strategy"), Some("32"));
        assert_eq!(q.get("cartype"), Some("0"));
    }

    #[test]
    fn test_driving_bad_destination() {
        let p: DrivingRouteParams = read(json!({"origin": A, "destination": "1,100"})).unwrap();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("destination"));
        assert!(err.to_string().contains("1,100"));
    }

    #[test]
    fn test_walking_optional_alternatives() {
        let p: WalkingRouteParams =
            read(json!({"origin": A, "destination": B, "alternative_route": 2})).unwrap();
        let q = p.query();
        assert_eq!(q.get("alternative_route"), Some("2"));
        assert_eq!(q.get("isindoor"), Some("0"));
        assert!(!q.contains("origin_id"));
    }

    #[test]
    fn test_cycling_variants_share_fields() {
        let bike: BicyclingRouteParams = read(json!({"origin": A, "destination": B})).unwrap();
        let ebike: ElectBikeRouteParams = read(json!({"origin": A, "destination": B})).unwrap();
        assert_eq!(bike.query(), ebike.query());
        assert_eq!(bike.query().len(), 2);
    }

    #[test]
    fn test_transit_requires_cities() {
        let err = read::<PublicTransitRouteParams>(json!({"origin": A, "destination": B, "city1": "010"}))
            .unwrap_err();
        match err {
            AmapError::Input { field, .. } => assert_eq!(field, "city2"),
            other => panic!("unexpected error: {other}"),
        }

        let p: PublicTransitRouteParams =
            read(json!({"origin": A, "destination": B, "city1": "010", "city2": " "})).unwrap();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_subway_query() {
        let p: SubwayRouteParams =
            read(json!({"origin": A, "destination": B, "city": "北京"})).unwrap();
        assert!(p.validate().is_ok());
        let q = p.query();
        assert_eq!(q.get("city"), Some("北京"));
        assert_eq!(q.get("strategy"), Some("0"));
        assert!(!q.contains("date"));
    }
}
