//! Great-circle distance between two points given in degrees.

/// Mean earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Spherical law of cosines distance in miles.
pub fn great_circle_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let delta = (lon2 - lon1).to_radians();

    // Rounding can push the cosine a hair outside [-1, 1] for identical points.
    let cos_angle = (phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta.cos()).clamp(-1.0, 1.0);
    EARTH_RADIUS_MILES * cos_angle.acos()
}
