//! Elliptical wavelet geometry for Huygens front propagation.
//!
//! Every front vertex emits an elemental ellipse per step: semi-major axis
//! along the spread direction sized by head and back rates, semi-minor by
//! the flank rate, center shifted downwind so the ignition point sits at
//! the ellipse focus region. The vertex advances to the wavelet boundary
//! along its outward normal.
//!
//! # Scientific References
//! - Richards, G.D. (1990). "An elliptical growth model of forest fire
//!   fronts and its numerical solution."
//! - Tymstra, C. et al. (2010). "Development and structure of Prometheus:
//!   the Canadian Wildland Fire Growth Simulation Model." NOR-X-417.

use crate::core_types::geom::{azimuth_to_unit, Vec2};

/// Shape of one elemental wavelet over a single timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavelet {
    /// Semi-major axis (m), along the spread direction.
    pub semi_major: f64,
    /// Semi-minor axis (m).
    pub semi_minor: f64,
    /// Center offset from the emitting vertex (m), along the spread
    /// direction.
    pub offset: f64,
    /// Spread azimuth (degrees, compass).
    pub spread_azimuth: f64,
}

impl Wavelet {
    /// Build the wavelet for per-minute spread rates over `dt_min` minutes.
    pub fn new(ros_head: f64, ros_back: f64, ros_flank: f64, spread_azimuth: f64, dt_min: f64) -> Self {
        Self {
            semi_major: (ros_head + ros_back) / 2.0 * dt_min,
            semi_minor: ros_flank * dt_min,
            offset: (ros_head - ros_back) / 2.0 * dt_min,
            spread_azimuth,
        }
    }

    /// Displacement of the emitting vertex when it advances to the wavelet
    /// boundary along the given outward-normal azimuth.
    pub fn displacement(&self, normal_azimuth: f64) -> Vec2 {
        let radius = elliptical_radius(
            self.semi_major,
            self.semi_minor,
            (normal_azimuth - self.spread_azimuth).to_radians(),
        );
        azimuth_to_unit(self.spread_azimuth) * self.offset + azimuth_to_unit(normal_azimuth) * radius
    }
}

/// Radius of an axis-aligned ellipse in the direction `angle` radians from
/// the major axis: r = a*b / sqrt((b cos)^2 + (a sin)^2).
pub fn elliptical_radius(a: f64, b: f64, angle: f64) -> f64 {
    let (sin, cos) = angle.sin_cos();
    let denom = ((b * cos).powi(2) + (a * sin).powi(2)).sqrt();
    if denom < 1e-12 {
        return a;
    }
    a * b / denom
}

/// Ellipse eccentricity from the length-to-breadth ratio:
/// e = sqrt(1 - 1/LBR^2); zero for a circular (calm-wind) fire.
pub fn eccentricity(lbr: f64) -> f64 {
    if lbr <= 1.0 {
        return 0.0;
    }
    (1.0 - 1.0 / (lbr * lbr)).sqrt()
}

/// Closed-form area (hectares) of the single-ellipse fire after
/// `time_min` minutes, for cross-checking the front integrator.
pub fn ellipse_area_ha(ros_head: f64, ros_back: f64, lbr: f64, time_min: f64) -> f64 {
    let head_dist = ros_head * time_min;
    let back_dist = ros_back * time_min;
    let a = (head_dist + back_dist) / 2.0;
    let b = if lbr > 0.0 { a / lbr } else { a };
    std::f64::consts::PI * a * b / 10_000.0
}
