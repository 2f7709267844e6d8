//! Spherical forward geodesic and compass-bearing helpers.
//!
//! Bearings are in degrees, 0 = north, increasing clockwise.
//! Formula reference: <http://www.movable-type.co.uk/scripts/latlon.html>

use crate::station::LonLat;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Destination reached travelling `distance_m` meters from `origin` on
/// bearing `azimuth_deg`.
pub fn forward_position(origin: LonLat, azimuth_deg: f64, distance_m: f64) -> LonLat {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let brng = azimuth_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * brng.cos()).asin();
    let lon2 = lon1
        + (brng.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    LonLat::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Bisector of two sightings of the same leg.
///
/// When one bearing sits in the north-west quadrant [270, 360) and the other
/// in the north-east quadrant [0, 90), the bisector goes through north
/// instead of the naive midpoint, which would point south.
pub fn average_azimuth(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a < b { (b, a) } else { (a, b) };
    if (270.0..360.0).contains(&hi) && (0.0..90.0).contains(&lo) {
        let mid = hi + (360.0 - hi + lo) / 2.0;
        return if mid >= 360.0 { mid - 360.0 } else { mid };
    }
    hi - (hi - lo) / 2.0
}

/// The opposite bearing.
pub fn reverse_azimuth(a: f64) -> f64 {
    if a < 180.0 { a + 180.0 } else { a - 180.0 }
}
