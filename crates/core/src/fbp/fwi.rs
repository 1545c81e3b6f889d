//! Canadian Fire Weather Index (FWI) System calculator.
//!
//! Computes all six FWI components from standard noon weather observations.
//!
//! # Scientific References
//! - Van Wagner, C.E. (1987). "Development and structure of the Canadian
//!   Forest Fire Weather Index System." Forestry Technical Report 35.
//! - Van Wagner, C.E. and Pickett, T.L. (1985). "Equations and FORTRAN
//!   program for the Canadian Forest Fire Weather Index System."

use serde::{Deserialize, Serialize};

use crate::core_types::config::{FwiOverrides, Weather};
use crate::error::FireSimError;

/// Spring startup value for FFMC when no prior state is given.
pub const FFMC_STARTUP: f64 = 85.0;
/// Spring startup value for DMC.
pub const DMC_STARTUP: f64 = 6.0;
/// Spring startup value for DC.
pub const DC_STARTUP: f64 = 15.0;

/// Day length factors for DMC by month (~46N, standard FWI tables).
/// Index 0 is unused; months are 1-12.
const DMC_DAY_LENGTH: [f64; 13] = [
    0.0, 6.5, 7.5, 9.0, 12.8, 13.9, 13.9, 12.4, 10.9, 9.4, 8.0, 7.0, 6.0,
];

/// Day length factors for DC by month.
const DC_DAY_LENGTH: [f64; 13] = [
    0.0, -1.6, -1.6, -1.6, 0.9, 3.8, 5.8, 6.4, 5.0, 2.4, 0.4, -1.6, -1.6,
];

/// The six FWI System components for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FwiState {
    /// Fine Fuel Moisture Code, saturated to [0, 101].
    pub ffmc: f64,
    /// Duff Moisture Code (>= 0).
    pub dmc: f64,
    /// Drought Code (>= 0).
    pub dc: f64,
    /// Initial Spread Index (>= 0).
    pub isi: f64,
    /// Buildup Index (>= 0).
    pub bui: f64,
    /// Fire Weather Index (>= 0).
    pub fwi: f64,
}

/// FWI System calculator.
///
/// Holds the previous day's moisture codes for sequential daily
/// calculations. A fresh calculator starts from the spring startup values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FwiCalculator {
    ffmc_prev: f64,
    dmc_prev: f64,
    dc_prev: f64,
}

impl Default for FwiCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl FwiCalculator {
    /// Calculator seeded with spring startup values (FFMC 85, DMC 6, DC 15).
    pub fn new() -> Self {
        Self {
            ffmc_prev: FFMC_STARTUP,
            dmc_prev: DMC_STARTUP,
            dc_prev: DC_STARTUP,
        }
    }

    /// Calculator seeded with explicit previous-day codes.
    pub fn with_startup(ffmc: f64, dmc: f64, dc: f64) -> Self {
        Self {
            ffmc_prev: ffmc,
            dmc_prev: dmc,
            dc_prev: dc,
        }
    }

    /// Compute all six components for one day and roll the moisture codes
    /// forward. RH above 100% is capped before use; weather outside the
    /// physical range is rejected.
    pub fn calculate_daily(
        &mut self,
        weather: &Weather,
        month: u32,
    ) -> Result<FwiState, FireSimError> {
        validate_weather(weather)?;
        let month = month.clamp(1, 12) as usize;
        let rh = weather.relative_humidity.min(100.0);
        let temp = weather.temperature;
        let wind = weather.wind_speed;
        let rain = weather.precipitation_24h;

        let ffmc = ffmc(temp, rh, wind, rain, self.ffmc_prev);
        let dmc = dmc(temp, rh, rain, month, self.dmc_prev);
        let dc = dc(temp, rain, month, self.dc_prev);
        let isi = isi(ffmc, wind);
        let bui = bui(dmc, dc);
        let fwi = fwi(isi, bui);

        self.ffmc_prev = ffmc;
        self.dmc_prev = dmc;
        self.dc_prev = dc;

        Ok(FwiState {
            ffmc,
            dmc,
            dc,
            isi,
            bui,
            fwi,
        })
    }

    /// Daily calculation with override substitution: present override keys
    /// replace the computed component, and derived components (ISI, BUI,
    /// FWI) recompute from the overridden inputs unless also overridden.
    pub fn calculate_with_overrides(
        &mut self,
        weather: &Weather,
        month: u32,
        overrides: &FwiOverrides,
    ) -> Result<FwiState, FireSimError> {
        let computed = self.calculate_daily(weather, month)?;

        let ffmc = overrides.ffmc.unwrap_or(computed.ffmc).clamp(0.0, 101.0);
        let dmc = overrides.dmc.unwrap_or(computed.dmc).max(0.0);
        let dc = overrides.dc.unwrap_or(computed.dc).max(0.0);
        let isi = overrides
            .isi
            .unwrap_or_else(|| isi(ffmc, weather.wind_speed))
            .max(0.0);
        let bui = overrides.bui.unwrap_or_else(|| bui(dmc, dc)).max(0.0);
        let fwi = overrides.fwi.unwrap_or_else(|| fwi(isi, bui)).max(0.0);

        Ok(FwiState {
            ffmc,
            dmc,
            dc,
            isi,
            bui,
            fwi,
        })
    }
}

/// Reject weather outside the physically meaningful range.
///
/// RH above 100% is not an error here: it is capped before use, the one
/// recoverable weather defect with a safe default.
pub fn validate_weather(weather: &Weather) -> Result<(), FireSimError> {
    if !weather.wind_speed.is_finite() || weather.wind_speed < 0.0 {
        return Err(FireSimError::InvalidWeather {
            field: "wind_speed",
            value: weather.wind_speed,
            constraint: "must be >= 0 km/h",
        });
    }
    if !weather.relative_humidity.is_finite() || weather.relative_humidity < 0.0 {
        return Err(FireSimError::InvalidWeather {
            field: "relative_humidity",
            value: weather.relative_humidity,
            constraint: "must be >= 0 %",
        });
    }
    if !weather.temperature.is_finite() || weather.temperature < -50.0 {
        return Err(FireSimError::InvalidWeather {
            field: "temperature",
            value: weather.temperature,
            constraint: "must be above -50 C",
        });
    }
    if !weather.precipitation_24h.is_finite() || weather.precipitation_24h < 0.0 {
        return Err(FireSimError::InvalidWeather {
            field: "precipitation_24h",
            value: weather.precipitation_24h,
            constraint: "must be >= 0 mm",
        });
    }
    Ok(())
}

/// Fine Fuel Moisture Code: moisture of the top 1-2 cm of surface litter,
/// time lag 2/3 day. Saturated to [0, 101].
pub fn ffmc(temp: f64, rh: f64, wind: f64, rain: f64, ffmc_prev: f64) -> f64 {
    let mut mo = 147.2 * (101.0 - ffmc_prev) / (59.5 + ffmc_prev);

    if rain > 0.5 {
        let rf = rain - 0.5;
        // Moisture after rain; the 251 denominator saturates near mo = 250.
        let mut mr = mo + 42.5 * rf * (-100.0 / (251.0 - mo)).exp() * (1.0 - (-6.93 / rf).exp());
        if mo > 150.0 {
            mr += 0.0015 * (mo - 150.0).powi(2) * rf.sqrt();
        }
        mo = mr.min(250.0);
    }

    // Equilibrium moisture content for drying.
    let ed = 0.942 * rh.powf(0.679)
        + 11.0 * ((rh - 100.0) / 10.0).exp()
        + 0.18 * (21.1 - temp) * (1.0 - (-0.115 * rh).exp());

    let m = if mo > ed {
        let ko = 0.424 * (1.0 - (rh / 100.0).powf(1.7))
            + 0.0694 * wind.sqrt() * (1.0 - (rh / 100.0).powi(8));
        let kd = ko * 0.581 * (0.0365 * temp).exp();
        ed + (mo - ed) * 10f64.powf(-kd)
    } else {
        // Wetting toward the (lower) wetting equilibrium.
        let ew = 0.618 * rh.powf(0.753)
            + 10.0 * ((rh - 100.0) / 10.0).exp()
            + 0.18 * (21.1 - temp) * (1.0 - (-0.115 * rh).exp());
        if mo < ew {
            let kl = 0.424 * (1.0 - ((100.0 - rh) / 100.0).powf(1.7))
                + 0.0694 * wind.sqrt() * (1.0 - ((100.0 - rh) / 100.0).powi(8));
            let kw = kl * 0.581 * (0.0365 * temp).exp();
            ew - (ew - mo) * 10f64.powf(-kw)
        } else {
            mo
        }
    };

    (59.5 * (250.0 - m) / (147.2 + m)).clamp(0.0, 101.0)
}

/// Duff Moisture Code: moisture of loosely compacted organic layers
/// (7-10 cm), time lag ~15 days.
pub fn dmc(temp: f64, rh: f64, rain: f64, month: usize, dmc_prev: f64) -> f64 {
    let mut dmc_prev = dmc_prev;

    if rain > 1.5 {
        let re = 0.92 * rain - 1.27;
        let mo = 20.0 + (5.6348 - dmc_prev / 43.43).exp();
        let b = if dmc_prev <= 33.0 {
            100.0 / (0.5 + 0.3 * dmc_prev)
        } else if dmc_prev <= 65.0 {
            14.0 - 1.3 * dmc_prev.ln()
        } else {
            6.2 * dmc_prev.ln() - 17.2
        };
        let mr = mo + 1000.0 * re / (48.77 + b * re);
        dmc_prev = (244.72 - 43.43 * (mr - 20.0).ln()).max(0.0);
    }

    let dl = DMC_DAY_LENGTH[month];

    if temp > -1.1 {
        let k = 1.894 * (temp + 1.1) * (100.0 - rh) * dl * 1e-4;
        (dmc_prev + 100.0 * k).max(0.0)
    } else {
        dmc_prev.max(0.0)
    }
}

/// Drought Code: moisture of deep compact organic layers (10-20 cm),
/// time lag ~52 days.
pub fn dc(temp: f64, rain: f64, month: usize, dc_prev: f64) -> f64 {
    let mut dc_prev = dc_prev;

    if rain > 2.8 {
        let rd = 0.83 * rain - 1.27;
        let qo = 800.0 * (-dc_prev / 400.0).exp();
        let qr = qo + 3.937 * rd;
        dc_prev = (400.0 * (800.0 / qr).ln()).max(0.0);
    }

    let lf = DC_DAY_LENGTH[month];

    if temp > -2.8 {
        let v = (0.36 * (temp + 2.8) + lf).max(0.0);
        (dc_prev + 0.5 * v).max(0.0)
    } else {
        dc_prev.max(0.0)
    }
}

/// Initial Spread Index: wind combined with fine-fuel moisture.
///
/// ISI = 0.208 * f(W) * f(F), f(W) = exp(0.05039 * ws).
pub fn isi(ffmc: f64, wind: f64) -> f64 {
    let m = 147.2 * (101.0 - ffmc) / (59.5 + ffmc);
    let f_f = 91.9 * (-0.1386 * m).exp() * (1.0 + m.powf(5.31) / 4.93e7);
    let f_w = (0.05039 * wind).exp();
    0.208 * f_w * f_f
}

/// Buildup Index from DMC and DC.
pub fn bui(dmc: f64, dc: f64) -> f64 {
    if dmc == 0.0 && dc == 0.0 {
        return 0.0;
    }
    let bui = if dmc <= 0.4 * dc {
        0.8 * dmc * dc / (dmc + 0.4 * dc)
    } else {
        dmc - (1.0 - 0.8 * dc / (dmc + 0.4 * dc)) * (0.92 + (0.0114 * dmc).powf(1.7))
    };
    bui.max(0.0)
}

/// Fire Weather Index from ISI and BUI.
pub fn fwi(isi: f64, bui: f64) -> f64 {
    let fd = if bui <= 80.0 {
        0.626 * bui.powf(0.809) + 2.0
    } else {
        1000.0 / (25.0 + 108.64 * (-0.023 * bui).exp())
    };

    let b = 0.1 * isi * fd;

    if b <= 1.0 {
        b
    } else {
        (2.72 * (0.434 * b.ln()).powf(0.647)).exp()
    }
}
