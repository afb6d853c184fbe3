//! Great-circle distance helpers for radius filtering.
//!
//! The cache radius is specified in meters, so the spatial filter has to
//! use spherical distance rather than raw lat/lng deltas. SQLite has no
//! spatial index, so queries prefilter with a bounding box (index-friendly)
//! and apply the exact haversine check in Rust.

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Haversine distance between two coordinates, in meters
pub fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Bounding box `(min_lat, max_lat, min_lng, max_lng)` that fully contains
/// the circle of `radius_meters` around the center. Intentionally generous:
/// rows inside the box still go through the exact haversine filter.
pub fn bounding_box(lat: f64, lng: f64, radius_meters: f64) -> (f64, f64, f64, f64) {
    let lat_delta = radius_meters / METERS_PER_DEGREE;
    // Longitude degrees shrink with latitude; clamp the cosine so the box
    // stays finite near the poles.
    let lng_delta = radius_meters / (METERS_PER_DEGREE * lat.to_radians().cos().max(0.01));

    (
        (lat - lat_delta).max(-90.0),
        (lat + lat_delta).min(90.0),
        (lng - lng_delta).max(-180.0),
        (lng + lng_delta).min(180.0),
    )
}
