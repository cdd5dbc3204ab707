//! Administrative region and IP positioning parameters.

use serde_json::{json, Value};

use super::{extensions_property, key_property, require_non_blank, require_range, Parameters};
use crate::endpoint::Operation;
use crate::error::AmapError;
use crate::input::FieldReader;
use crate::query::QueryParams;
use crate::types::Extensions;
use crate::validate::validate_ip;

const MAX_SUBDISTRICT_DEPTH: i64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AdministrativeRegionParams {
    pub keywords: String,
    pub subdistrict: i64,
    pub page: i64,
    pub offset: i64,
    pub extensions: Extensions,
    pub filter: Option<String>,
    pub key: Option<String>,
}

impl Parameters for AdministrativeRegionParams {
    const OPERATION: Operation = Operation::AdministrativeRegion;

    fn description() -> &'static str {
        "Administrative region query (province, city, district) with up to 3 levels of \
         sub-regions. Each region carries name, citycode, adcode, center and level."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "keywords": { "type": "string", "description": "Region name, citycode or adcode" },
                "subdistrict": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": MAX_SUBDISTRICT_DEPTH,
                    "default": 1,
                    "description": "Depth of sub-regions to return"
                },
                "page": { "type": "integer", "default": 1, "description": "Page number" },
                "offset": { "type": "integer", "default": 20, "description": "Results per page" },
                "extensions": extensions_property(),
                "filter": { "type": "string", "description": "Filter by adcode (optional)" },
                "key": key_property()
            },
            "required": ["keywords"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        let extensions = fields.str_or("extensions", "base")?;
        Ok(Self {
            keywords: fields.required_str("keywords")?,
            subdistrict: fields.int_or("subdistrict", 1)?,
            page: fields.int_or("page", 1)?,
            offset: fields.int_or("offset", 20)?,
            extensions: Extensions::parse("extensions", &extensions)?,
            filter: fields.optional_str("filter")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        require_non_blank("keywords", &self.keywords)?;
        require_range("subdistrict", self.subdistrict, 0, MAX_SUBDISTRICT_DEPTH)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("keywords", &self.keywords)
            .required("subdistrict", self.subdistrict)
            .required("page", self.page)
            .required("offset", self.offset)
            .required("extensions", self.extensions.as_str())
            .optional("filter", self.filter.as_ref())
    }

    fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IpPositioningParams {
    pub ip: String,
    pub sig: Option<String>,
    pub key: Option<String>,
}

impl Parameters for IpPositioningParams {
    const OPERATION: Operation = Operation::IpPositioning;

    fn description() -> &'static str {
        "Locate an IPv4 address: returns province, city, adcode and the city's bounding box."
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "ip": { "type": "string", "description": "IPv4 address, e.g. 114.114.114.114" },
                "sig": { "type": "string", "description": "Request signature (optional)" },
                "key": key_property()
            },
            "required": ["ip"]
        })
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self, AmapError> {
        Ok(Self {
            ip: fields.required_str("ip")?,
            sig: fields.optional_str("sig")?,
            key: fields.optional_str("key")?,
        })
    }

    fn validate(&self) -> Result<(), AmapError> {
        validate_ip(&self.ip)
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("ip", &self.ip)
            .optional("sig", self.sig.as_ref())
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

    #[test]
    fn test_region_defaults() {
        let p: AdministrativeRegionParams = read(json!({"keywords": "北京"})).unwrap();
        assert_eq!(p.subdistrict, 1);
        let q = p.query();
        assert_eq!(q.get("subdistrict"), Some("1"));
        assert_eq!(q.get("offset"), Some("20"));
        assert!(!q.contains("filter"));
    }

    #[test]
    fn test_region_depth_bounds() {
        let p: AdministrativeRegionParams =
            read(json!({"keywords": "北京", "subdistrict": 0})).unwrap();
        assert!(p.validate().is_ok());
        assert_eq!(p.query().get("subdistrict"), Some("0"));

        let p: AdministrativeRegionParams =
            read(json!({"keywords": "北京", "subdistrict": 4})).unwrap();
        assert!(p.validate().unwrap_err().to_string().contains("subdistrict"));
    }

    #[test]
    fn test_ip_validation() {
        let p: IpPositioningParams = read(json!({"ip": "114.114.114.114"})).unwrap();
        assert!(p.validate().is_ok());
        let p: IpPositioningParams = read(json!({"ip": "localhost"})).unwrap();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }
}
