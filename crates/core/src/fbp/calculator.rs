//! Canadian Fire Behavior Prediction (FBP) System calculator.
//!
//! Turns fire weather (ISI, BUI, FFMC), wind, and a fuel type into rate of
//! spread, fuel consumption, fire intensity, and the elliptical shape
//! parameters that drive front growth.
//!
//! # Scientific References
//! - Forestry Canada Fire Danger Group (1992). "Development and Structure
//!   of the Canadian Forest Fire Behavior Prediction System." ST-X-3.
//! - Byram, G.M. (1959). "Combustion of forest fuels." In Forest Fire:
//!   Control and Use, McGraw-Hill.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core_types::frame::FireType;
use crate::error::FireSimError;
use crate::fbp::crown;
use crate::fbp::fuel::{FuelCode, FuelParams};
use crate::fbp::fwi::FwiState;

/// Low heat of combustion for forest fuels (kJ/kg). With ROS in m/min,
/// H * w * ROS / 60 reduces to Byram's 300 * w * ROS in kW/m.
const HEAT_OF_COMBUSTION: f64 = 18_000.0;

/// Wind coefficient shared by the ISI wind function and the backing
/// spread attenuation.
const WIND_COEFF: f64 = 0.05039;

/// Inputs that modify the base fuel behavior. `Default` gives the
/// standard FBP assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FbpOptions {
    /// Foliar moisture content (%).
    pub fmc: f64,
    /// Percent conifer for the M1/M2 blend.
    pub percent_conifer: f64,
    /// Percent dead balsam fir for M3/M4.
    pub percent_dead_fir: f64,
    /// Degree of grass curing for O1a/O1b (%).
    pub grass_curing: f64,
    /// Crown base height override (m); replaces the table value.
    pub cbh_override: Option<f64>,
    /// Uniform terrain slope (%), applied as the non-directional ST-X-3
    /// spread factor. Directional slope belongs to the front propagator.
    pub slope_pct: f64,
}

impl Default for FbpOptions {
    fn default() -> Self {
        Self {
            fmc: 97.0,
            percent_conifer: 50.0,
            percent_dead_fir: 35.0,
            grass_curing: 60.0,
            cbh_override: None,
            slope_pct: 0.0,
        }
    }
}

/// Complete output of one FBP evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FbpResult {
    /// Fuel type the result was computed for.
    pub fuel_type: FuelCode,
    /// Surface rate of spread before crowning (m/min).
    pub ros_surface: f64,
    /// Head rate of spread with crown contribution (m/min).
    pub ros_head: f64,
    /// Backing rate of spread (m/min).
    pub ros_back: f64,
    /// Flank rate of spread (m/min).
    pub ros_flank: f64,
    /// Length-to-breadth ratio of the fire ellipse.
    pub lbr: f64,
    /// Surface fuel consumption (kg/m^2).
    pub sfc: f64,
    /// Crown fuel consumption (kg/m^2).
    pub cfc: f64,
    /// Total fuel consumption (kg/m^2).
    pub tfc: f64,
    /// Surface fire intensity (kW/m).
    pub sfi: f64,
    /// Head fire intensity (kW/m).
    pub hfi: f64,
    /// Crown fraction burned (0-1).
    pub cfb: f64,
    /// Fire behavior classification.
    pub fire_type: FireType,
    /// Byram flame length (m).
    pub flame_length: f64,
}

/// Evaluate the full FBP stack for one fuel type and weather state.
///
/// Fails with `InvalidInputs` on negative ISI/BUI/wind or non-positive
/// foliar moisture.
pub fn calculate(
    fuel: FuelCode,
    fwi: &FwiState,
    wind_speed: f64,
    options: &FbpOptions,
) -> Result<FbpResult, FireSimError> {
    if fwi.isi < 0.0 || fwi.bui < 0.0 {
        return Err(FireSimError::InvalidInputs(format!(
            "ISI ({}) and BUI ({}) must be non-negative",
            fwi.isi, fwi.bui
        )));
    }
    if wind_speed < 0.0 {
        return Err(FireSimError::InvalidInputs(format!(
            "wind speed must be non-negative, got {wind_speed}"
        )));
    }
    if options.fmc <= 0.0 {
        return Err(FireSimError::InvalidInputs(format!(
            "foliar moisture content must be positive, got {}",
            options.fmc
        )));
    }

    let params = fuel.params();
    let mut ros_surface = surface_ros(params, fwi.isi, fwi.bui, options);

    if options.slope_pct > 0.0 {
        ros_surface *= slope_spread_factor(options.slope_pct);
    }

    let sfc = surface_fuel_consumption(params, fwi.ffmc, fwi.bui, options.percent_conifer);
    let sfi = byram_intensity(sfc, ros_surface);

    let cbh = options.cbh_override.unwrap_or(params.cbh);
    let crown = crown::assess(params, cbh, ros_surface, sfc, fwi.isi, options.fmc);

    let cfc = crown.cfb * params.cfl;
    let tfc = sfc + cfc;
    let ros_head = crown.ros;
    let hfi = byram_intensity(tfc, ros_head);

    let lbr = length_to_breadth_ratio(wind_speed);
    let ros_back = back_ros(ros_head, wind_speed);
    let ros_flank = flank_ros(ros_head, ros_back, lbr);

    let result = FbpResult {
        fuel_type: fuel,
        ros_surface,
        ros_head,
        ros_back,
        ros_flank,
        lbr,
        sfc,
        cfc,
        tfc,
        sfi,
        hfi,
        cfb: crown.cfb,
        fire_type: crown.fire_type,
        flame_length: flame_length(hfi),
    };

    if !result.ros_head.is_finite() || !result.hfi.is_finite() || !result.tfc.is_finite() {
        return Err(FireSimError::NumericError(format!(
            "non-finite FBP output for {fuel}: ros_head={}, hfi={}",
            result.ros_head, result.hfi
        )));
    }
    Ok(result)
}

/// Byram (1959) fireline intensity: I = H * w * ROS / 60 = 300 * w * ROS.
fn byram_intensity(fuel_consumed: f64, ros: f64) -> f64 {
    HEAT_OF_COMBUSTION * fuel_consumed * ros / 60.0
}

/// Basic rate-of-spread curve: RSI = a * (1 - exp(-b * ISI))^c.
fn rsi(params: &FuelParams, isi: f64) -> f64 {
    params.a * (1.0 - (-params.b * isi).exp()).powf(params.c)
}

/// Surface rate of spread (m/min) with all fuel-specific modifications
/// and the BUI effect applied.
pub fn surface_ros(params: &FuelParams, isi: f64, bui: f64, options: &FbpOptions) -> f64 {
    let c2 = FuelCode::C2.params();
    let d1 = FuelCode::D1.params();

    match params.code {
        // Mixedwood M1/M2: conifer/deciduous blend weighted by percent
        // conifer; the BUI effect acts on the conifer component only, and
        // the green (M2) stand suppresses the deciduous share.
        FuelCode::M1 | FuelCode::M2 => {
            let pc = options.percent_conifer / 100.0;
            let ros_c = rsi(c2, isi) * bui_effect(bui, c2.q, c2.bui0, c2.be_max);
            let mut ros_d = rsi(d1, isi);
            if params.code == FuelCode::M2 {
                ros_d *= 0.2;
            }
            pc * ros_c + (1.0 - pc) * ros_d
        }

        // Dead balsam fir mixedwoods: weight the full-kill curve by the
        // percent dead fir, the remainder spreading like aspen (green
        // stands keep only a fifth of the aspen share).
        FuelCode::M3 | FuelCode::M4 => {
            let pdf = options.percent_dead_fir / 100.0;
            let mut ros_d = rsi(d1, isi);
            if params.code == FuelCode::M4 {
                ros_d *= 0.2;
            }
            let blended = pdf * rsi(params, isi) + (1.0 - pdf) * ros_d;
            blended * bui_effect(bui, params.q, params.bui0, params.be_max)
        }

        // Leafed-out aspen spreads at a fifth of the leafless rate.
        FuelCode::D2 => 0.2 * rsi(params, isi) * bui_effect(bui, params.q, params.bui0, params.be_max),

        // Grass: curing factor instead of a BUI effect.
        FuelCode::O1a | FuelCode::O1b => rsi(params, isi) * grass_curing_factor(options.grass_curing),

        _ => rsi(params, isi) * bui_effect(bui, params.q, params.bui0, params.be_max),
    }
}

/// BUI effect on rate of spread, clamped to the fuel's published maximum.
///
/// BE = exp(50 * ln(q) * (1/BUI - 1/BUI_0))
pub fn bui_effect(bui: f64, q: f64, bui0: f64, be_max: f64) -> f64 {
    if bui <= 0.0 || q >= 1.0 {
        return 1.0;
    }
    (50.0 * q.ln() * (1.0 / bui - 1.0 / bui0)).exp().min(be_max)
}

/// Grass curing factor for O1a/O1b.
///
/// Piecewise ST-X-3 form around the 58.8% inflection; fully green grass
/// (curing 0) does not carry fire.
pub fn grass_curing_factor(curing: f64) -> f64 {
    let pc = curing;
    let cf = if pc < 58.8 {
        0.176 + 0.020 * (pc - 58.8)
    } else {
        let delta = pc - 58.8;
        0.176 + 0.020 * delta * (1.0 - 0.008 * delta)
    };
    cf.clamp(0.0, 1.0)
}

/// Non-directional slope spread factor, SF = exp(3.533 * (s/100)^1.2),
/// capped at 5. The front propagator applies the directional version.
pub fn slope_spread_factor(slope_pct: f64) -> f64 {
    if slope_pct <= 0.0 {
        return 1.0;
    }
    (3.533 * (slope_pct / 100.0).powf(1.2)).exp().min(5.0)
}

/// Surface fuel consumption (kg/m^2).
///
/// Grass consumes its standing load; woody groups follow the FFMC/BUI
/// consumption equations.
pub fn surface_fuel_consumption(params: &FuelParams, ffmc: f64, bui: f64, percent_conifer: f64) -> f64 {
    match params.code {
        FuelCode::C1 => (1.5 * (1.0 - (-0.230 * (ffmc - 81.0)).exp())).max(0.0),
        FuelCode::C2 | FuelCode::M3 | FuelCode::M4 => 5.0 * (1.0 - (-0.0115 * bui).exp()),
        FuelCode::C3 | FuelCode::C4 => 5.0 * (1.0 - (-0.0164 * bui).exp()).powf(2.24),
        FuelCode::C5 | FuelCode::C6 => 5.0 * (1.0 - (-0.0149 * bui).exp()).powf(2.48),
        FuelCode::C7 => {
            let ffc = (2.0 * (1.0 - (-0.104 * (ffmc - 70.0)).exp())).max(0.0);
            let wfc = 1.5 * (1.0 - (-0.0201 * bui).exp());
            ffc + wfc
        }
        FuelCode::D1 | FuelCode::D2 => 1.5 * (1.0 - (-0.0183 * bui).exp()),
        FuelCode::M1 | FuelCode::M2 => {
            let pc = percent_conifer / 100.0;
            let sfc_c2 = surface_fuel_consumption(FuelCode::C2.params(), ffmc, bui, percent_conifer);
            let sfc_d1 = surface_fuel_consumption(FuelCode::D1.params(), ffmc, bui, percent_conifer);
            pc * sfc_c2 + (1.0 - pc) * sfc_d1
        }
        FuelCode::O1a | FuelCode::O1b => params.sfl,
        FuelCode::S1 => {
            let ffc = 4.0 * (1.0 - (-0.025 * bui).exp());
            let wfc = 4.0 * (1.0 - (-0.034 * bui).exp());
            ffc + wfc
        }
        FuelCode::S2 => {
            let ffc = 10.0 * (1.0 - (-0.013 * bui).exp());
            let wfc = 6.0 * (1.0 - (-0.060 * bui).exp());
            ffc + wfc
        }
        FuelCode::S3 => {
            let ffc = 12.0 * (1.0 - (-0.0166 * bui).exp());
            let wfc = 20.0 * (1.0 - (-0.0210 * bui).exp());
            ffc + wfc
        }
    }
}

/// Length-to-breadth ratio of the fire ellipse (ST-X-3 Eq. 80).
///
/// LBR = 1 + 8.729 * (1 - exp(-0.030 * ws))^2.155; circular at calm.
pub fn length_to_breadth_ratio(wind_speed: f64) -> f64 {
    if wind_speed <= 0.0 {
        return 1.0;
    }
    1.0 + 8.729 * (1.0 - (-0.030 * wind_speed).exp()).powf(2.155)
}

/// Backing rate of spread (m/min): the head rate attenuated by the
/// inverse of the ISI wind function.
pub fn back_ros(ros_head: f64, wind_speed: f64) -> f64 {
    ros_head * (-WIND_COEFF * wind_speed).exp()
}

/// Flank rate of spread (m/min) from head, back, and ellipse shape.
pub fn flank_ros(ros_head: f64, ros_back: f64, lbr: f64) -> f64 {
    (ros_head + ros_back) / (2.0 * lbr.max(1.0))
}

/// Byram (1959) flame length: L = 0.0775 * I^0.46.
pub fn flame_length(hfi: f64) -> f64 {
    if hfi <= 0.0 {
        return 0.0;
    }
    0.0775 * hfi.powf(0.46)
}

/// Foliar moisture content (%) from ignition position and date.
///
/// Elevation-free ST-X-3 form: normalized latitude
/// LATN = 43 + 33.7 * exp(-0.0351 * (150 - |lng|)), minimum-FMC date
/// D0 = 151 * lat / LATN, then a quadratic in the day offset ND:
/// FMC = 85 + 0.0189 ND^2 (ND < 30), 32.9 + 3.17 ND - 0.0288 ND^2
/// (30 <= ND < 50), 120 beyond.
pub fn foliar_moisture(lat: f64, lng: f64, date: NaiveDate) -> f64 {
    let latn = 43.0 + 33.7 * (-0.0351 * (150.0 - lng.abs())).exp();
    let d0 = 151.0 * (lat / latn);
    let nd = (f64::from(date.ordinal()) - d0).abs();

    if nd < 30.0 {
        85.0 + 0.0189 * nd * nd
    } else if nd < 50.0 {
        32.9 + 3.17 * nd - 0.0288 * nd * nd
    } else {
        120.0
    }
}
