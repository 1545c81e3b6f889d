//! Simulation configuration: weather, FWI overrides, and run parameters.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FireSimError;
use crate::fbp::fuel::FuelCode;

/// Daily noon weather observation driving the run.
///
/// Weather is held constant for the duration of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// 10-m open wind speed (km/h, >= 0).
    pub wind_speed: f64,
    /// Wind direction (degrees, meteorological: the direction the wind
    /// blows FROM; 0 = north, clockwise).
    pub wind_direction: f64,
    /// Noon temperature (degrees Celsius).
    pub temperature: f64,
    /// Noon relative humidity (%). Values above 100 are capped before use.
    pub relative_humidity: f64,
    /// Rainfall over the previous 24 hours (mm, >= 0).
    pub precipitation_24h: f64,
}

/// Explicit FWI component overrides.
///
/// A present key replaces the computed component; derived components
/// recompute from overridden inputs unless also overridden.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FwiOverrides {
    pub ffmc: Option<f64>,
    pub dmc: Option<f64>,
    pub dc: Option<f64>,
    pub isi: Option<f64>,
    pub bui: Option<f64>,
    pub fwi: Option<f64>,
}

/// Default percent conifer for the M1/M2 mixedwood blend.
pub const DEFAULT_PERCENT_CONIFER: f64 = 50.0;
/// Default percent dead balsam fir for M3/M4.
pub const DEFAULT_PERCENT_DEAD_FIR: f64 = 35.0;
/// Default degree of grass curing for O1a/O1b (%).
pub const DEFAULT_GRASS_CURING: f64 = 60.0;
/// Foliar moisture content used when no ignition date is supplied (%).
pub const DEFAULT_FMC: f64 = 97.0;

/// Full configuration for a point-ignition fire spread run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Ignition latitude (degrees).
    pub ignition_lat: f64,
    /// Ignition longitude (degrees).
    pub ignition_lng: f64,
    /// Constant weather for the run.
    pub weather: Weather,
    /// Optional FWI component overrides.
    #[serde(default)]
    pub fwi_overrides: FwiOverrides,
    /// FBP fuel type, uniform over the landscape.
    pub fuel_type: FuelCode,
    /// Run length in hours (> 0).
    pub duration_hours: f64,
    /// Snapshot cadence in minutes (> 0, <= duration).
    pub snapshot_interval_minutes: f64,
    /// Terrain slope (%, >= 0). Absent means flat.
    #[serde(default)]
    pub slope_pct: Option<f64>,
    /// Upslope azimuth (degrees, direction of ascent). Required meaning
    /// only when `slope_pct` is present.
    #[serde(default)]
    pub aspect_deg: Option<f64>,
    /// Ignition date, feeding the foliar moisture curve and the DMC/DC
    /// day-length month. Absent means FMC 97 and July day lengths.
    #[serde(default)]
    pub ignition_date: Option<NaiveDate>,
    /// Crown base height override (m); replaces the fuel-table value.
    #[serde(default)]
    pub cbh_override: Option<f64>,
    /// Percent conifer for M1/M2 (default 50).
    #[serde(default)]
    pub percent_conifer: Option<f64>,
    /// Percent dead balsam fir for M3/M4 (default 35).
    #[serde(default)]
    pub percent_dead_fir: Option<f64>,
    /// Degree of grass curing for O1a/O1b (%, default 60).
    #[serde(default)]
    pub grass_curing: Option<f64>,
}

impl SimulationConfig {
    /// Reject configurations the driver cannot run. Weather range checks
    /// live with the FWI calculator; this covers everything else.
    pub fn validate(&self) -> Result<(), FireSimError> {
        if !self.ignition_lat.is_finite() || self.ignition_lat.abs() > 90.0 {
            return Err(FireSimError::InvalidConfig(format!(
                "ignition_lat {} outside [-90, 90]",
                self.ignition_lat
            )));
        }
        if !self.ignition_lng.is_finite() || self.ignition_lng.abs() > 180.0 {
            return Err(FireSimError::InvalidConfig(format!(
                "ignition_lng {} outside [-180, 180]",
                self.ignition_lng
            )));
        }
        if !self.weather.wind_direction.is_finite() {
            return Err(FireSimError::InvalidConfig(format!(
                "wind_direction must be finite, got {}",
                self.weather.wind_direction
            )));
        }
        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(FireSimError::InvalidConfig(format!(
                "duration_hours must be positive, got {}",
                self.duration_hours
            )));
        }
        if !self.snapshot_interval_minutes.is_finite() || self.snapshot_interval_minutes <= 0.0 {
            return Err(FireSimError::InvalidConfig(format!(
                "snapshot_interval_minutes must be positive, got {}",
                self.snapshot_interval_minutes
            )));
        }
        if self.snapshot_interval_minutes > self.duration_hours * 60.0 {
            return Err(FireSimError::InvalidConfig(format!(
                "snapshot_interval_minutes {} exceeds duration of {} hours",
                self.snapshot_interval_minutes, self.duration_hours
            )));
        }
        if let Some(slope) = self.slope_pct {
            if !slope.is_finite() || slope < 0.0 {
                return Err(FireSimError::InvalidConfig(format!(
                    "slope_pct must be >= 0, got {slope}"
                )));
            }
        }
        if let Some(cbh) = self.cbh_override {
            if !cbh.is_finite() || cbh <= 0.0 {
                return Err(FireSimError::InvalidConfig(format!(
                    "cbh_override must be positive, got {cbh}"
                )));
            }
        }
        for (name, value) in [
            ("percent_conifer", self.percent_conifer),
            ("percent_dead_fir", self.percent_dead_fir),
            ("grass_curing", self.grass_curing),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                    return Err(FireSimError::InvalidConfig(format!(
                        "{name} must be within [0, 100], got {v}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Month (1-12) for the FWI day-length tables: from the ignition date
    /// when given, otherwise July.
    pub fn month(&self) -> u32 {
        self.ignition_date.map_or(7, |d| d.month())
    }

    /// Percent conifer with the M1/M2 default applied.
    pub fn percent_conifer(&self) -> f64 {
        self.percent_conifer.unwrap_or(DEFAULT_PERCENT_CONIFER)
    }

    /// Percent dead fir with the M3/M4 default applied.
    pub fn percent_dead_fir(&self) -> f64 {
        self.percent_dead_fir.unwrap_or(DEFAULT_PERCENT_DEAD_FIR)
    }

    /// Grass curing with the O1 default applied.
    pub fn grass_curing(&self) -> f64 {
        self.grass_curing.unwrap_or(DEFAULT_GRASS_CURING)
    }

    /// Terrain slope with flat default.
    pub fn slope_pct(&self) -> f64 {
        self.slope_pct.unwrap_or(0.0)
    }

    /// Upslope azimuth with north default, normalized to [0, 360).
    pub fn aspect_deg(&self) -> f64 {
        self.aspect_deg.unwrap_or(0.0).rem_euclid(360.0)
    }
}
