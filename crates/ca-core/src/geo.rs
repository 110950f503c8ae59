//! Geographic coordinate type.
//!
//! Distances feed the gravity model's ring bucketing, which works on whole
//! metres up to 200 km, so coordinates are kept in `f64`.

use serde::{Deserialize, Serialize};

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree of latitude (and of longitude at the equator).
pub const METRES_PER_DEGREE: f64 = 111_195.0;

/// A WGS-84 coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Half-widths `(lat_deg, lon_deg)` of a box that contains every point
    /// within `radius_m` of `self`.  Used to pre-filter R-tree queries before
    /// the exact haversine check.
    pub fn degree_span(self, radius_m: f64) -> (f64, f64) {
        let d_lat = radius_m / METRES_PER_DEGREE;
        let cos_lat = self.lat.to_radians().cos().abs().max(1e-6);
        let d_lon = (radius_m / (METRES_PER_DEGREE * cos_lat)).min(180.0);
        (d_lat, d_lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
