//! POI search parameters: keyword, around, polygon, detail and AOI boundary.

use serde_json::{json, Value};

use super::{coordinate_property, extensions_property, key_property, require_coordinate,
            require_non_blank, require_range, Parameters};
use crate::endpoint::Operation;
use crate::error::AmapError;
use crate::input::FieldReader;
use crate::query::QueryParams;
use crate::simplify::SimplifyContext;
use crate::types::Extensions;
use crate::validate::parse_polygon;

const MAX_PAGE_SIZE: i64 = 25;
const DEFAULT_TEXT_PAGE_SIZE: i64 = 10;
const DEFAULT_AREA_OFFSET: i64 = 20;
const DEFAULT_AROUND_RADIUS: i64 = 5000;
const MAX_AROUND_RADIUS: i64 = 50000;

fn extensions_field(fields: &FieldReader<'_>) -> Result<Extensions, AmapError> {
    let raw = fields.str_or("extensions", "base")?;
    Extensions::parse("extensions", &raw)
}

// --- Keyword search ---

/// Response format of the keyword search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoiParams {
    pub keywords: String,
    pub types: Option<String>,
    pub region: Option<String>,
    pub city_limit: Option<bool>,
    pub show_fields: Option<String>,
    pub page_size: i64,
    pub page_num: i64,
    pub sig: Option<String>,
    pub output: OutputFormat,
    pub callback: Option<String>,
    pub key: Option<String>,
}

impl Parameters for SearchPoiParams {
    const OPERATION: Operation = Operation::SearchPoi;

    fn description() -> &'static str {
        "Keyword POI search (e.g. \"美食\" in \"北京\"). Returns at most page_size POIs \
         with id, name, type, address and location."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "keywords": { "type": "string", "description": "Search keywords" },
                "types": { "type": "string", "description": "POI type codes, `|` separated (optional)" },
                "region": { "type": "string", "description": "Search region: citycode, adcode or city name (optional)" },
                "city_limit": { "type": "boolean", "description": "Only return results inside region (optional)" },
                "show_fields": { "type": "string", "description": "Extra response fields (optional)" },
                "page_size": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_PAGE_SIZE,
                    "default": DEFAULT_TEXT_PAGE_SIZE,
                    "description": "Results per page"
                },
                "page_num": { "type": "integer", "minimum": 1, "default": 1, "description": "Page number" },
                "sig": { "type": "string", "description": "Request signature (optional)" },
                "output": { "type": "string", "enum": ["json", "xml"], "default": "json" },
                "callback": { "type": "string", "description": "JSONP callback name (optional)" },
                "key": key_property()
            },
            "required": ["keywords"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        let output = match fields.str_or("output", "json")?.as_str() {
            "json" => OutputFormat::Json,
            "xml" => OutputFormat::Xml,
            other => {
                return Err(AmapError::input(
                    "output",
                    format!("expected \"json\" or \"xml\", got \"{}\"", other),
                ))
            }
        };
        Ok(Self {
            keywords: fields.required_str("keywords")?,
            types: fields.optional_str("types")?,
            region: fields.optional_str("region")?,
            city_limit: fields.optional_bool("city_limit")?,
            show_fields: fields.optional_str("show_fields")?,
            page_size: fields.int_or("page_size", DEFAULT_TEXT_PAGE_SIZE)?,
            page_num: fields.int_or("page_num", 1)?,
            sig: fields.optional_str("sig")?,
            output,
            callback: fields.optional_str("callback")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_non_blank("keywords", &self.keywords)?;
        require_range("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        require_range("page_num", self.page_num, 1, i64::MAX)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("keywords", &self.keywords)
            .required("page_size", self.page_size)
            .required("page_num", self.page_num)
            .required("output", self.output.as_str())
            .optional("types", self.types.as_ref())
            .optional("region", self.region.as_ref())
            .flag("city_limit", self.city_limit)
            .optional("show_fields", self.show_fields.as_ref())
            .optional("sig", self.sig.as_ref())
            .optional("callback", self.callback.as_ref())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn simplify_context(&self) -> SimplifyContext {
        SimplifyContext {
            limit: Some(self.page_size as usize),
            ..SimplifyContext::default()
        }
    }
}

// --- Around search ---

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoiAroundParams {
    pub location: String,
    pub keywords: Option<String>,
    pub types: Option<String>,
    pub radius: i64,
    pub sortrule: String,
    pub offset: i64,
    pub page: i64,
    pub extensions: Extensions,
    pub key: Option<String>,
}

impl Parameters for SearchPoiAroundParams {
    const OPERATION: Operation = Operation::SearchPoiAround;

    fn description() -> &'static str {
        "Search POIs around a \"lon,lat\" center within a radius (default 5000 m, max 50000 m). \
         Returns at most offset POIs with their distance to the center."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": coordinate_property("Search center"),
                "keywords": { "type": "string", "description": "Search keywords (optional)" },
                "types": { "type": "string", "description": "POI type codes (optional)" },
                "radius": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_AROUND_RADIUS,
                    "default": DEFAULT_AROUND_RADIUS,
                    "description": "Search radius in meters"
                },
                "sortrule": {
                    "type": "string",
                    "default": "sort",
                    "description": "sort: by distance, weight: by relevance"
                },
                "offset": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_PAGE_SIZE,
                    "default": DEFAULT_AREA_OFFSET,
                    "description": "Results per page"
                },
                "page": { "type": "integer", "default": 1, "description": "Page number" },
                "extensions": extensions_property(),
                "key": key_property()
            },
            "required": ["location"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            location: fields.required_str("location")?,
            keywords: fields.optional_str("keywords")?,
            types: fields.optional_str("types")?,
            radius: fields.int_or("radius", DEFAULT_AROUND_RADIUS)?,
            sortrule: fields.str_or("sortrule", "sort")?,
            offset: fields.int_or("offset", DEFAULT_AREA_OFFSET)?,
            page: fields.int_or("page", 1)?,
            extensions: extensions_field(fields)?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_coordinate("location", &self.location)?;
        require_range("radius", self.radius, 1, MAX_AROUND_RADIUS)?;
        require_range("offset", self.offset, 1, MAX_PAGE_SIZE)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("location", &self.location)
            .optional("keywords", self.keywords.as_ref())
            .optional("types", self.types.as_ref())
            .required("radius", self.radius)
            .required("sortrule", &self.sortrule)
            .required("offset", self.offset)
            .required("page", self.page)
            .required("extensions", self.extensions.as_str())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn simplify_context(&self) -> SimplifyContext {
        SimplifyContext {
            limit: Some(self.offset as usize),
            extensions: self.extensions,
            center: Some(self.location.clone()),
            polygon: None,
        }
    }
}

// --- Polygon search ---

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoiPolygonParams {
    pub polygon: String,
    pub keywords: Option<String>,
    pub types: Option<String>,
    pub offset: i64,
    pub page: i64,
    pub extensions: Extensions,
    pub key: Option<String>,
}

impl Parameters for SearchPoiPolygonParams {
    const OPERATION: Operation = Operation::SearchPoiPolygon;

    fn description() -> &'static str {
        "Search POIs inside a polygon given as \"lon1,lat1;lon2,lat2;lon3,lat3...\" \
         (at least 3 points)."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "polygon": {
                    "type": "string",
                    "description": "Polygon vertices as \"lon1,lat1;lon2,lat2;...\", at least 3"
                },
                "keywords": { "type": "string", "description": "Search keywords (optional)" },
                "types": { "type": "string", "description": "POI type codes (optional)" },
                "offset": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_PAGE_SIZE,
                    "default": DEFAULT_AREA_OFFSET,
                    "description": "Results per page"
                },
                "page": { "type": "integer", "default": 1, "description": "Page number" },
                "extensions": extensions_property(),
                "key": key_property()
            },
            "required": ["polygon"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            polygon: fields.required_str("polygon")?,
            keywords: fields.optional_str("keywords")?,
            types: fields.optional_str("types")?,
            offset: fields.int_or("offset", DEFAULT_AREA_OFFSET)?,
            page: fields.int_or("page", 1)?,
            extensions: extensions_field(fields)?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        parse_polygon(&self.polygon)?;
        require_range("offset", self.offset, 1, MAX_PAGE_SIZE)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("polygon", &self.polygon)
            .optional("keywords", self.keywords.as_ref())
            .optional("types", self.types.as_ref())
            .required("offset", self.offset)
            .required("page", self.page)
            .required("extensions", self.extensions.as_str())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn simplify_context(&self) -> SimplifyContext {
        SimplifyContext {
            limit: Some(self.offset as usize),
            extensions: self.extensions,
            center: None,
            polygon: Some(self.polygon.clone()),
        }
    }
}

// --- Detail lookup ---

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoiDetailParams {
    pub id: String,
    pub extensions: Extensions,
    pub key: Option<String>,
}

impl Parameters for SearchPoiDetailParams {
    const OPERATION: Operation = Operation::SearchPoiDetail;

    fn description() -> &'static str {
        "Look up one POI by its id (e.g. \"B0FFFZZZ5S\")."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "POI id" },
                "extensions": extensions_property(),
                "key": key_property()
            },
            "required": ["id"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            id: fields.required_str("id")?,
            extensions: extensions_field(fields)?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_non_blank("id", &self.id)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("id", &self.id)
            .required("extensions", self.extensions.as_str())
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

// --- AOI boundary ---

#[derive(Debug, Clone, PartialEq)]
pub struct SearchAoiBoundaryParams {
    pub id: String,
    pub key: Option<String>,
}

impl Parameters for SearchAoiBoundaryParams {
    const OPERATION: Operation = Operation::SearchAoiBoundary;

    fn description() -> &'static str {
        "Fetch the boundary polyline of an area of interest by its POI id, along with its \
         province, city and district."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "POI id of the AOI" },
                "key": key_property()
            },
            "required": ["id"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            id: fields.required_str("id")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_non_blank("id", &self.id)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new().required("id", &self.id)
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}
