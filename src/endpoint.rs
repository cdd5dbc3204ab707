//! Endpoint registry.
//!
//! A static table mapping each logical operation to its provider URL, HTTP
//! verb, response family and parameter names. URLs here are the production
//! defaults; [`AppConfig::endpoint_url`](crate::config::AppConfig::endpoint_url)
//! layers overrides on top.

use crate::simplify::Family;
use crate::types::Method;

/// One logical capability, mapped to exactly one provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Geocoding,
    ReverseGeocoding,
    DrivingRoute,
    WalkingRoute,
    BicyclingRoute,
    ElectBikeRoute,
    PublicTransitRoute,
    SubwayRoute,
    SearchPoi,
    SearchPoiAround,
    SearchPoiPolygon,
    SearchPoiDetail,
    SearchAoiBoundary,
    AdministrativeRegion,
    IpPositioning,
}

#[derive(Debug)]
pub struct Endpoint {
    pub operation: Operation,
    /// Tool name exposed to callers.
    pub name: &'static str,
    pub url: &'static str,
    pub method: Method,
    /// Environment variable that overrides `url`.
    pub env_var: &'static str,
    pub family: Family,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

const TRANSIT_URL: &str = "https://restapi.amap.com/v5/direction/transit/integrated";

static ENDPOINTS: [Endpoint; 15] = [
    Endpoint {
        operation: Operation::Geocoding,
        name: "geocoding",
        url: "https://restapi.amap.com/v3/geocode/geo",
        method: Method::Get,
        env_var: "AMAP_GEO_URL",
        family: Family::Geocode,
        required: &["address"],
        optional: &["city", "sig", "key"],
    },
    Endpoint {
        operation: Operation::ReverseGeocoding,
        name: "reverse_geocoding",
        url: "https://restapi.amap.com/v3/geocode/regeo",
        method: Method::Get,
        env_var: "AMAP_REGEO_URL",
        family: Family::ReverseGeocode,
        required: &["location"],
        optional: &["radius", "poitype", "extensions", "roadlevel", "sig", "key"],
    },
    Endpoint {
        operation: Operation::DrivingRoute,
        name: "driving_route_planning",
        url: "https://restapi.amap.com/v5/direction/driving",
        method: Method::Get,
        env_var: "AMAP_DRIVING_URL",
        family: Family::Route,
        required: &["origin", "destination"],
        optional: &["strategy", "show_fields", "plate", "cartype", "key"],
    },
    Endpoint {
        operation: Operation::WalkingRoute,
        name: "walking_route_planning",
        url: "https://restapi.amap.com/v5/direction/walking",
        method: Method::Get,
        env_var: "AMAP_WALKING_URL",
        family: Family::Route,
        required: &["origin", "destination"],
        optional: &[
            "origin_id",
            "destination_id",
            "alternative_route",
            "show_fields",
            "isindoor",
            "key",
        ],
    },
    Endpoint {
        operation: Operation::BicyclingRoute,
        name: "bicycling_route_planning",
        url: "https://restapi.amap.com/v5/direction/bicycling",
        method: Method::Get,
        env_var: "AMAP_BICYCLING_URL",
        family: Family::Route,
        required: &["origin", "destination"],
        optional: &["show_fields", "alternative_route", "key"],
    },
    Endpoint {
        operation: Operation::ElectBikeRoute,
        name: "elect_bike_route_planning",
        url: "https://restapi.amap.com/v5/direction/electrobike",
        method: Method::Get,
        env_var: "AMAP_EBIKE_URL",
        family: Family::Route,
        required: &["origin", "destination"],
        optional: &["show_fields", "alternative_route", "key"],
    },
    Endpoint {
        operation: Operation::PublicTransitRoute,
        name: "public_transit_route_planning",
        url: TRANSIT_URL,
        method: Method::Post,
        env_var: "AMAP_BUS_URL",
        family: Family::Route,
        required: &["origin", "destination", "city1", "city2"],
        optional: &[
            "strategy",
            "date",
            "time",
            "show_fields",
            "alternative_route",
            "key",
        ],
    },
    Endpoint {
        operation: Operation::SubwayRoute,
        name: "subway_route_planning",
        url: TRANSIT_URL,
        method: Method::Get,
        env_var: "AMAP_SUBWAY_TRANSIT",
        family: Family::Route,
        required: &["origin", "destination", "city"],
        optional: &["strategy", "date", "time", "show_fields", "key"],
    },
    Endpoint {
        operation: Operation::SearchPoi,
        name: "search_poi",
        url: "https://restapi.amap.com/v5/place/text",
        method: Method::Get,
        env_var: "AMAP_SEARCH_POI_URL",
        family: Family::PoiText,
        required: &["keywords"],
        optional: &[
            "types",
            "region",
            "city_limit",
            "show_fields",
            "page_size",
            "page_num",
            "sig",
            "output",
            "callback",
            "key",
        ],
    },
    Endpoint {
        operation: Operation::SearchPoiAround,
        name: "search_poi_around",
        url: "https://restapi.amap.com/v5/place/around",
        method: Method::Get,
        env_var: "AMAP_SEARCH_POI_AROUND_URL",
        family: Family::PoiAround,
        required: &["location"],
        optional: &[
            "keywords",
            "types",
            "radius",
            "sortrule",
            "offset",
            "page",
            "extensions",
            "key",
        ],
    },
    Endpoint {
        operation: Operation::SearchPoiPolygon,
        name: "search_poi_polygon",
        url: "https://restapi.amap.com/v5/place/polygon",
        method: Method::Get,
        env_var: "AMAP_SEARCH_POI_POLYGON_URL",
        family: Family::PoiPolygon,
        required: &["polygon"],
        optional: &["keywords", "types", "offset", "page", "extensions", "key"],
    },
    Endpoint {
        operation: Operation::SearchPoiDetail,
        name: "search_poi_detail",
        url: "https://restapi.amap.com/v5/place/detail",
        method: Method::Get,
        env_var: "AMAP_SEARCH_POI_DETAIL_URL",
        family: Family::PoiDetail,
        required: &["id"],
        optional: &["extensions", "key"],
    },
    Endpoint {
        operation: Operation::SearchAoiBoundary,
        name: "search_aoi_boundary",
        url: "https://restapi.amap.com/v5/aoi/polyline",
        method: Method::Get,
        env_var: "AMAP_AOI_POLYLINE_URL",
        family: Family::AoiBoundary,
        required: &["id"],
        optional: &["key"],
    },
    Endpoint {
        operation: Operation::AdministrativeRegion,
        name: "administrative_region_query",
        url: "https://restapi.amap.com/v3/config/district",
        method: Method::Get,
        env_var: "AMAP_REGION_QUERY_URL",
        family: Family::District,
        required: &["keywords"],
        optional: &["subdistrict", "page", "offset", "extensions", "filter", "key"],
    },
    Endpoint {
        operation: Operation::IpPositioning,
        name: "ip_positioning",
        url: "https://restapi.amap.com/v3/ip",
        method: Method::Get,
        env_var: "AMAP_IP_URL",
        family: Family::IpLocation,
        required: &["ip"],
        optional: &["sig", "key"],
    },
];

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::Geocoding,
        Operation::ReverseGeocoding,
        Operation::DrivingRoute,
        Operation::WalkingRoute,
        Operation::BicyclingRoute,
        Operation::ElectBikeRoute,
        Operation::PublicTransitRoute,
        Operation::SubwayRoute,
        Operation::SearchPoi,
        Operation::SearchPoiAround,
        Operation::SearchPoiPolygon,
        Operation::SearchPoiDetail,
        Operation::SearchAoiBoundary,
        Operation::AdministrativeRegion,
        Operation::IpPositioning,
    ];

    pub fn endpoint(self) -> &'static Endpoint {
        // The table is declared in variant order.
        &ENDPOINTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.endpoint().name
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        ENDPOINTS.iter().find(|e| e.name == name).map(|e| e.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_operation_order() {
        for op in Operation::ALL {
            assert_eq!(op.endpoint().operation, op);
        }
    }

    #[test]
    fn test_name_lookup_round_trips() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("teleport"), None);
    }

    #[test]
    fn test_only_public_transit_posts() {
        for op in Operation::ALL {
            let expected = if op == Operation::PublicTransitRoute {
                Method::Post
            } else {
                Method::Get
            };
            assert_eq!(op.endpoint().method, expected, "{}", op.name());
        }
    }

    #[test]
    fn test_all_route_operations_share_family() {
        let routes = [
            Operation::DrivingRoute,
            Operation::WalkingRoute,
            Operation::BicyclingRoute,
            Operation::ElectBikeRoute,
            Operation::PublicTransitRoute,
            Operation::SubwayRoute,
        ];
        for op in routes {
            assert_eq!(op.endpoint().family, Family::Route);
        }
    }
}
