//! Time-stamped fire snapshots emitted by the simulation driver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fire behavior classification (Van Wagner 1977).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireType {
    /// Fire confined to surface fuels.
    Surface,
    /// Intermittent crown involvement (torching).
    PassiveCrown,
    /// Continuous crown fire spread.
    ActiveCrown,
}

/// A single snapshot of the fire at a point in time.
///
/// Emitted by value into the output sequence and immutable thereafter.
/// The perimeter ring is closed: the first point is repeated at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Simulated time since ignition (hours).
    pub time_hours: f64,
    /// Closed fire perimeter as [lat, lng] pairs.
    pub perimeter: Vec<[f64; 2]>,
    /// Burned area (hectares).
    pub area_ha: f64,
    /// Effective head fire rate of spread this step (m/min), including the
    /// strongest directional slope effect on the front.
    pub head_ros_m_min: f64,
    /// Maximum head fire intensity along the front (kW/m).
    pub max_hfi_kw_m: f64,
    /// Fire behavior classification.
    pub fire_type: FireType,
    /// Byram flame length (m).
    pub flame_length_m: f64,
    /// Fraction of the burning front in each fuel type; fractions sum to 1.
    pub fuel_breakdown: BTreeMap<String, f64>,
}

impl Frame {
    /// True when the ring is explicitly closed (first point repeated).
    pub fn is_closed(&self) -> bool {
        match (self.perimeter.first(), self.perimeter.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}
