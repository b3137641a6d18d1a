//! Great-circle distance math on a spherical Earth.
//!
//! Functions here use a spherical approximation with a fixed mean radius.
//! Inputs are latitude/longitude in decimal degrees; distances are in
//! kilometers.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//!
//! Inputs are not range-validated here; callers own validation. Out-of-range
//! values still produce a finite, deterministic result from the same formula.

use std::f64::consts::PI;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Calculate the great-circle distance between two positions.
///
/// Uses the haversine formula, which is numerically stable for both nearby
/// and antipodal points. The intermediate is clamped before `asin` so
/// floating-point rounding can never produce NaN.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First position in decimal degrees
/// * `lat2`, `lon2` - Second position in decimal degrees
///
/// # Returns
///
/// Distance in kilometers, always finite and non-negative.
///
/// # Example
///
/// ```
/// use geonear::geodesic::distance_km;
///
/// // 1 degree of latitude is approximately 111.19 km
/// let dist = distance_km(0.0, 0.0, 1.0, 0.0);
/// assert!((dist - 111.19).abs() < 0.01);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    // Haversine formula
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1.0 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Embed a position on the unit sphere as 3-D Cartesian coordinates.
///
/// Straight-line (chordal) distance between two embedded points is a
/// strictly monotonic function of their great-circle separation, so
/// nearest-neighbor ordering under the Euclidean metric matches the
/// ordering under [`distance_km`]. This lets a standard Euclidean spatial
/// index answer geodesic nearest-neighbor queries.
///
/// # Example
///
/// ```
/// use geonear::geodesic::unit_vector;
///
/// let [x, y, z] = unit_vector(90.0, 0.0);
/// assert!(x.abs() < 1e-10 && y.abs() < 1e-10);
/// assert!((z - 1.0).abs() < 1e-10);
/// ```
pub fn unit_vector(lat: f64, lon: f64) -> [f64; 3] {
    let lat_rad = lat * DEG_TO_RAD;
    let lon_rad = lon * DEG_TO_RAD;

    let cos_lat = lat_rad.cos();
    [
        cos_lat * lon_rad.cos(),
        cos_lat * lon_rad.sin(),
        lat_rad.sin(),
    ]
}
