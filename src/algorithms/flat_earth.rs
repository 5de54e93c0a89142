//! Flat-earth conversions between travelled distance and degree offsets
//!
//! Uses a fixed meters-per-degree figure for latitude and scales longitude by
//! the cosine of the origin latitude. Accuracy degrades with distance and
//! towards the poles; at ±90° the longitude offset diverges and is returned
//! unguarded.

use crate::core::GeoPoint;
use nalgebra::Vector2;

/// Unit vector for a compass heading, as (north, east)
///
/// Headings outside 0..360 are accepted; the trigonometry wraps them.
pub fn heading_unit_vector(heading_deg: f64) -> Vector2<f64> {
    let theta = heading_deg.to_radians();
    Vector2::new(theta.cos(), theta.sin())
}

/// Degree offset (Δlat, Δlon) for a distance travelled along a heading
pub fn displacement_offset(
    origin_latitude: f64,
    distance: f64,
    heading_deg: f64,
    meters_per_degree: f64,
) -> (f64, f64) {
    let north_east = heading_unit_vector(heading_deg) * distance;
    let delta_lat = north_east.x / meters_per_degree;
    let delta_lon = north_east.y / (meters_per_degree * origin_latitude.to_radians().cos());
    (delta_lat, delta_lon)
}

/// Move `origin` by `distance` along `heading_deg`
pub fn offset_point(
    origin: GeoPoint,
    distance: f64,
    heading_deg: f64,
    meters_per_degree: f64,
) -> GeoPoint {
    let (delta_lat, delta_lon) =
        displacement_offset(origin.latitude, distance, heading_deg, meters_per_degree);
    GeoPoint::new(origin.latitude + delta_lat, origin.longitude + delta_lon)
}

/// Approximate ground distance between two points (meters)
pub fn separation_m(a: GeoPoint, b: GeoPoint, meters_per_degree: f64) -> f64 {
    let mean_lat = (a.latitude + b.latitude) / 2.0;
    let north = (b.latitude - a.latitude) * meters_per_degree;
    let east = (b.longitude - a.longitude) * meters_per_degree * mean_lat.to_radians().cos();
    Vector2::new(north, east).norm()
}
