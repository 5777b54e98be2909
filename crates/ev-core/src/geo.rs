//! Geographic coordinate type and planar distance helpers.
//!
//! All matching in the pipeline measures distance directly in raw
//! `(lat, lon)` degrees.  This is not geodesic: one degree of longitude
//! shrinks with latitude.  The error is accepted at the resolution the
//! matchers work at, and thresholds are expressed in the same raw units.

use serde::{Deserialize, Serialize};

/// A WGS-84 coordinate stored as double-precision degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared planar distance in degrees².  Use for comparisons.
    #[inline]
    pub fn planar_distance_2(self, other: GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    /// Planar Euclidean distance in raw degrees.
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        self.planar_distance_2(other).sqrt()
    }

    /// Both components are finite (no NaN / ±∞).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// `[lat, lon]` array, the point layout used by the R-tree indexes.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
