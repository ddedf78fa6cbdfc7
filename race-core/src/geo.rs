use libm::{atan2, cos, sin, sqrt};

use crate::config::EARTH_RADIUS_M;

/// Signed decimal degrees, north/east positive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Position {
    pub const fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Position) -> f64 {
        haversine_m(
            self.latitude_deg,
            self.longitude_deg,
            other.latitude_deg,
            other.longitude_deg,
        )
    }
}

/// Haversine great-circle distance in metres on a sphere of radius
/// [`EARTH_RADIUS_M`].
///
/// Spherical model: within about 0.5 % of the ellipsoidal distance. Inputs are
/// not range-checked. The result is exactly symmetric in its two points and exactly zero for
/// identical points.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let sin_dlat = sin((lat2 - lat1).to_radians() / 2.0);
    let sin_dlon = sin((lon2 - lon1).to_radians() / 2.0);
    // cos·cos first: the product commutes, keeping A→B and B→A bit-identical.
    let cos_lat = cos(lat1.to_radians()) * cos(lat2.to_radians());

    let a = sin_dlat * sin_dlat + cos_lat * sin_dlon * sin_dlon;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));
    EARTH_RADIUS_M * c
}
