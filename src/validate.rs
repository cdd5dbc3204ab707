//! Format validators for coordinates, IP addresses and polygons.
//!
//! These are pure checks over already-typed strings. They run after input
//! normalization and before any request is built.

use crate::error::AmapError;
use crate::types::{Coordinate, Polygon};

const MIN_POLYGON_POINTS: usize = 3;

/// Parse a `"lon,lat"` pair, rejecting anything out of range.
pub fn validate_coordinate(s: &str) -> Result<Coordinate, AmapError> {
    let invalid = || AmapError::format(s, "invalid coordinate, expected \"lon,lat\"");

    let mut parts = s.split(',');
    let (lon, lat) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lon), Some(lat), None) => (lon, lat),
        _ => return Err(invalid()),
    };

    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;

    if !lon.is_finite() || !lat.is_finite() {
        return Err(invalid());
    }
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(AmapError::format(s, "coordinate out of range"));
    }

    Ok(Coordinate { lon, lat })
}

pub fn is_valid_coordinate(s: &str) -> bool {
    validate_coordinate(s).is_ok()
}

/// Syntactic IPv4 check: four dot-separated groups of 1-3 digits.
///
/// Octets above 255 pass. The provider tolerates them and so do we.
pub fn validate_ip(s: &str) -> Result<(), AmapError> {
    let groups: Vec<&str> = s.split('.').collect();
    let ok = groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));

    if ok {
        Ok(())
    } else {
        Err(AmapError::format(s, "invalid IP address"))
    }
}

/// Parse a `;`-separated polygon into typed points.
pub fn parse_polygon(s: &str) -> Result<Polygon, AmapError> {
    let segments: Vec<&str> = s.split(';').collect();
    if segments.len() < MIN_POLYGON_POINTS {
        return Err(AmapError::format(
            s,
            format!(
                "polygon requires at least {} coordinate points, got {}",
                MIN_POLYGON_POINTS,
                segments.len()
            ),
        ));
    }

    let points = segments
        .iter()
        .map(|segment| {
            validate_coordinate(segment)
                .map_err(|_| AmapError::format(*segment, "invalid polygon coordinate"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon {
        points,
        raw: s.to_string(),
    })
}

/// Polygon check that reports a human-readable reason alongside the verdict.
///
/// The reason is empty when the polygon is valid.
pub fn validate_polygon(s: &str) -> (bool, String) {
    match parse_polygon(s) {
        Ok(_) => (true, String::new()),
        Err(e) => (false, e.to_string()),
    }
}
