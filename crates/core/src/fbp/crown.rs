//! Van Wagner crown fire initiation and spread model.
//!
//! Determines when a surface fire transitions into the canopy and how much
//! faster the combined fire moves:
//! - Critical surface intensity for crown involvement
//! - Critical (threshold) spread rate RSO
//! - Crown fraction burned and surface/passive/active classification
//! - Crown rate of spread for C6 and other canopied conifers
//!
//! # Scientific References
//! - Van Wagner, C.E. (1977). "Conditions for the start and spread of crown
//!   fire." Canadian Journal of Forest Research, 7(1), 23-34.
//! - Forestry Canada Fire Danger Group (1992). ST-X-3, Eqs. 56-64.

use crate::core_types::frame::FireType;
use crate::fbp::fuel::{FuelCode, FuelParams};

/// Crown fire assessment for one fuel/weather combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrownAssessment {
    /// Fire behavior classification.
    pub fire_type: FireType,
    /// Critical surface intensity for crown involvement (kW/m).
    pub csi: f64,
    /// Critical spread rate RSO (m/min).
    pub rso: f64,
    /// Crown fraction burned (0-1).
    pub cfb: f64,
    /// Final rate of spread with crown contribution blended in (m/min).
    pub ros: f64,
}

impl CrownAssessment {
    /// Assessment for a fuel that cannot crown: pure surface spread.
    fn surface(surface_ros: f64) -> Self {
        Self {
            fire_type: FireType::Surface,
            csi: 0.0,
            rso: 0.0,
            cfb: 0.0,
            ros: surface_ros,
        }
    }
}

/// Critical surface fire intensity for crown fire initiation (kW/m).
///
/// Van Wagner (1977): CSI = 0.001 * CBH^1.5 * (460 + 25.9 * FMC)^1.5
pub fn critical_surface_intensity(cbh: f64, fmc: f64) -> f64 {
    if cbh <= 0.0 {
        return 0.0;
    }
    0.001 * cbh.powf(1.5) * (460.0 + 25.9 * fmc).powf(1.5)
}

/// Critical spread rate RSO (m/min): the surface spread rate whose Byram
/// intensity equals the critical surface intensity.
///
/// RSO = CSI / (300 * SFC)
pub fn critical_spread_rate(csi: f64, sfc: f64) -> f64 {
    if sfc <= 0.0 {
        return f64::INFINITY;
    }
    csi / (300.0 * sfc)
}

/// Crown fraction burned for a surface spread rate at or above RSO.
///
/// CFB = 1 - exp(-0.23 * (ROS - RSO))
pub fn crown_fraction_burned(ros_surface: f64, rso: f64) -> f64 {
    if ros_surface < rso {
        return 0.0;
    }
    (1.0 - (-0.23 * (ros_surface - rso)).exp()).clamp(0.0, 1.0)
}

/// Foliar moisture effect for the C6 crown spread equation.
///
/// FME = 1000 * (1.5 - 0.00275 * FMC)^4 / (460 + 25.9 * FMC)
pub fn foliar_moisture_effect(fmc: f64) -> f64 {
    1000.0 * (1.5 - 0.00275 * fmc).powi(4) / (460.0 + 25.9 * fmc)
}

/// Average foliar moisture effect used to normalize the C6 crown equation.
const FME_AVG: f64 = 0.778;

/// Crown rate of spread (m/min) for the given fuel.
///
/// C6 uses the ST-X-3 plantation crown equation
/// RSC = 60 * (1 - exp(-0.0497 * ISI)) * FME / 0.778; other canopied
/// conifers scale the surface rate by a crown-bulk-density factor
/// (1 + (CBD - 0.05) / 0.1, at most 3).
pub fn crown_spread_rate(params: &FuelParams, surface_ros: f64, isi: f64, fmc: f64) -> f64 {
    if params.code == FuelCode::C6 {
        return 60.0 * (1.0 - (-0.0497 * isi).exp()) * foliar_moisture_effect(fmc) / FME_AVG;
    }

    const CBD_CRITICAL: f64 = 0.05;
    if params.cbd < CBD_CRITICAL {
        return surface_ros;
    }
    let crown_factor = (1.0 + (params.cbd - CBD_CRITICAL) / 0.1).min(3.0);
    surface_ros * crown_factor
}

/// Assess crown involvement and blend the final rate of spread.
///
/// Classification:
/// - surface when the surface spread rate is below RSO
/// - active crown when CFB >= 0.9
/// - passive (intermittent) crown otherwise
///
/// Final ROS = RSS + CFB * (RSC - RSS).
pub fn assess(
    params: &FuelParams,
    cbh: f64,
    surface_ros: f64,
    sfc: f64,
    isi: f64,
    fmc: f64,
) -> CrownAssessment {
    if cbh <= 0.0 || params.cfl <= 0.0 {
        return CrownAssessment::surface(surface_ros);
    }

    let csi = critical_surface_intensity(cbh, fmc);
    let rso = critical_spread_rate(csi, sfc);

    if surface_ros < rso {
        return CrownAssessment {
            fire_type: FireType::Surface,
            csi,
            rso,
            cfb: 0.0,
            ros: surface_ros,
        };
    }

    let cfb = crown_fraction_burned(surface_ros, rso);
    let rsc = crown_spread_rate(params, surface_ros, isi, fmc);
    let ros = surface_ros + cfb * (rsc - surface_ros);
    let fire_type = if cfb >= 0.9 {
        FireType::ActiveCrown
    } else {
        FireType::PassiveCrown
    };

    CrownAssessment {
        fire_type,
        csi,
        rso,
        cfb,
        ros,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fbp::fuel::FuelCode;

    #[test]
    fn critical_intensity_reference_point() {
        // CBH 7 m, FMC 97: 0.001 * 7^1.5 * (460 + 25.9*97)^1.5
        let csi = critical_surface_intensity(7.0, 97.0);
        let expected = 0.001 * 7f64.powf(1.5) * (460.0f64 + 25.9 * 97.0).powf(1.5);
        assert!((csi - expected).abs() < 1e-9);
        assert!(
            csi > 2500.0 && csi < 3500.0,
            "C6-like CSI out of expected band: {csi}"
        );
    }

    #[test]
    fn no_canopy_means_no_critical_intensity() {
        assert_eq!(critical_surface_intensity(0.0, 97.0), 0.0);
    }

    #[test]
    fn cfb_grows_with_spread_margin() {
        let rso = 2.0;
        assert_eq!(crown_fraction_burned(1.0, rso), 0.0);
        let low = crown_fraction_burned(3.0, rso);
        let high = crown_fraction_burned(15.0, rso);
        assert!(low > 0.0 && low < high && high <= 1.0);
        // 10 m/min above RSO: 1 - exp(-2.3) ~ 0.9
        let ten_over = crown_fraction_burned(12.0, rso);
        assert!((ten_over - 0.9).abs() < 0.01, "CFB was {ten_over}");
    }

    #[test]
    fn classification_thresholds() {
        let c2 = FuelCode::C2.params();
        // Slow surface fire stays on the surface.
        let calm = assess(c2, c2.cbh, 0.5, 2.0, 5.0, 97.0);
        assert_eq!(calm.fire_type, FireType::Surface);
        assert_eq!(calm.cfb, 0.0);

        // Fast spread with plenty of margin over RSO goes active.
        let extreme = assess(c2, c2.cbh, 30.0, 2.0, 12.0, 97.0);
        assert_eq!(extreme.fire_type, FireType::ActiveCrown);
        assert!(extreme.cfb >= 0.9);
        assert!(extreme.ros >= 30.0);
    }

    #[test]
    fn deciduous_fuels_never_crown() {
        let d1 = FuelCode::D1.params();
        let result = assess(d1, d1.cbh, 25.0, 1.0, 10.0, 97.0);
        assert_eq!(result.fire_type, FireType::Surface);
        assert_eq!(result.ros, 25.0);
    }

    #[test]
    fn c6_crown_rate_uses_plantation_equation() {
        let c6 = FuelCode::C6.params();
        let rsc = crown_spread_rate(c6, 5.0, 10.0, 97.0);
        let fme = foliar_moisture_effect(97.0);
        let expected = 60.0 * (1.0 - (-0.497f64).exp()) * fme / 0.778;
        assert!((rsc - expected).abs() < 1e-9, "C6 RSC was {rsc}");
        // Independent of the surface rate.
        assert_eq!(rsc, crown_spread_rate(c6, 50.0, 10.0, 97.0));
    }

    #[test]
    fn dense_canopy_boosts_crown_rate() {
        let c2 = FuelCode::C2.params(); // CBD 0.18
        let rsc = crown_spread_rate(c2, 10.0, 10.0, 97.0);
        // Factor 1 + (0.18-0.05)/0.1 = 2.3
        assert!((rsc - 23.0).abs() < 1e-9, "C2 RSC was {rsc}");

        let c7 = FuelCode::C7.params(); // CBD 0.07
        let rsc7 = crown_spread_rate(c7, 10.0, 10.0, 97.0);
        assert!(rsc7 < rsc, "sparser canopy should spread slower");
    }

    #[test]
    fn drier_foliage_accelerates_c6_crowning() {
        let dry = foliar_moisture_effect(85.0);
        let moist = foliar_moisture_effect(120.0);
        assert!(dry > moist, "FME should fall with moisture: {dry} vs {moist}");
    }
}
