//! Local-metric geometry for fire front propagation.
//!
//! All spread math runs in a tangent plane centered on the ignition point:
//! x grows east, y grows north, both in meters. Geographic coordinates only
//! appear at the input (ignition) and output (frame perimeter) boundaries.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D vector type for positions and displacements in the local metric frame.
pub type Vec2 = Vector2<f64>;

/// WGS-84 equatorial radius (m).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Tangent-plane projection centered on a reference geographic point.
///
/// Uses the equirectangular approximation, which is accurate to well under
/// 0.1% over the few-kilometer extents a single fire run covers:
///
/// ```text
/// x = (lng - lng0) * cos(lat0) * R * pi/180
/// y = (lat - lat0) * R * pi/180
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// Reference latitude (degrees).
    pub lat0: f64,
    /// Reference longitude (degrees).
    pub lng0: f64,
    /// Meters per degree of latitude at the reference point.
    m_per_deg_lat: f64,
    /// Meters per degree of longitude at the reference point.
    m_per_deg_lng: f64,
}

impl LocalFrame {
    /// Create a projection centered on the given geographic point.
    pub fn new(lat0: f64, lng0: f64) -> Self {
        let m_per_deg = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        Self {
            lat0,
            lng0,
            m_per_deg_lat: m_per_deg,
            m_per_deg_lng: m_per_deg * lat0.to_radians().cos(),
        }
    }

    /// Project a geographic coordinate into local meters.
    pub fn to_local(&self, lat: f64, lng: f64) -> Vec2 {
        Vec2::new(
            (lng - self.lng0) * self.m_per_deg_lng,
            (lat - self.lat0) * self.m_per_deg_lat,
        )
    }

    /// Unproject a local-metric position back to (lat, lng) degrees.
    pub fn to_geographic(&self, p: Vec2) -> (f64, f64) {
        (
            self.lat0 + p.y / self.m_per_deg_lat,
            self.lng0 + p.x / self.m_per_deg_lng,
        )
    }
}

/// Unit vector for a compass azimuth (degrees, 0 = north, clockwise) in the
/// local frame (x east, y north).
pub fn azimuth_to_unit(azimuth_deg: f64) -> Vec2 {
    let rad = azimuth_deg.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Compass azimuth (degrees in [0, 360)) of a local-frame direction vector.
/// Zero-length vectors map to 0.
pub fn unit_to_azimuth(v: Vec2) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    let deg = v.x.atan2(v.y).to_degrees();
    (deg + 360.0) % 360.0
}
