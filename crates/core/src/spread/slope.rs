//! Directional slope effects on fire spread.
//!
//! The spread rate of each front vertex is modulated by the angle between
//! its propagation heading and the upslope direction:
//! - Upslope: ST-X-3 spread factor SF = exp(3.533 * (s/100)^1.2), capped
//!   at 5.0 per the strongest slope effects observed by Butler et al.
//! - Downslope: mild attenuation reaching 30% at a 30% grade, floored at
//!   0.3, following Anderson's backing-fire observations.
//!
//! # Scientific References
//! - Forestry Canada Fire Danger Group (1992). ST-X-3, Eq. 39.
//! - Butler, B.W. et al. (2007). "A method for evaluating the effectiveness
//!   of firefighter escape routes."
//! - Anderson, H.E. (1983). "Predicting wind-driven wild land fire size and
//!   shape." USDA Forest Service Research Paper INT-305.

/// Maximum upslope spread factor (Butler 2007 cap).
pub const MAX_SLOPE_FACTOR: f64 = 5.0;

/// Minimum downslope spread factor.
pub const MIN_SLOPE_FACTOR: f64 = 0.3;

/// Slopes below this grade have no measurable directional effect (%).
const FLAT_THRESHOLD_PCT: f64 = 1.0;

/// Directional slope factor for a vertex spreading along `heading_deg` on
/// terrain of grade `slope_pct` whose direction of ascent is `upslope_deg`.
///
/// All azimuths are compass degrees (0 = north, clockwise). Returns a
/// multiplier for the head rate of spread in [0.3, 5.0].
pub fn directional_slope_factor(slope_pct: f64, upslope_deg: f64, heading_deg: f64) -> f64 {
    if slope_pct < FLAT_THRESHOLD_PCT {
        return 1.0;
    }

    // Angle between heading and ascent, normalized to [-180, 180].
    let mut diff = heading_deg - upslope_deg;
    diff = diff.rem_euclid(360.0);
    if diff > 180.0 {
        diff -= 360.0;
    }
    let cos_diff = diff.to_radians().cos();

    if cos_diff >= 0.0 {
        let sf = max_upslope_factor(slope_pct);
        1.0 + (sf - 1.0) * cos_diff
    } else {
        (1.0 - 0.3 * (slope_pct / 30.0) * cos_diff.abs()).max(MIN_SLOPE_FACTOR)
    }
}

/// Full upslope spread factor for a grade, before directional projection.
pub fn max_upslope_factor(slope_pct: f64) -> f64 {
    if slope_pct <= 0.0 {
        return 1.0;
    }
    (3.533 * (slope_pct / 100.0).powf(1.2))
        .exp()
        .min(MAX_SLOPE_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_terrain_has_no_directional_effect() {
        for heading in [0.0, 90.0, 180.0, 270.0] {
            let f = directional_slope_factor(0.0, 90.0, heading);
            assert_eq!(f, 1.0, "flat terrain factor at heading {heading} was {f}");
        }
        // Sub-percent grades are treated as flat.
        assert_eq!(directional_slope_factor(0.5, 0.0, 0.0), 1.0);
    }

    #[test]
    fn straight_upslope_gets_full_factor() {
        let f = directional_slope_factor(30.0, 90.0, 90.0);
        let expected = max_upslope_factor(30.0);
        assert!((f - expected).abs() < 1e-12, "upslope factor was {f}");
        assert!(f > 2.0 && f <= MAX_SLOPE_FACTOR);
    }

    #[test]
    fn cross_slope_is_neutral() {
        let f = directional_slope_factor(30.0, 90.0, 0.0);
        assert!((f - 1.0).abs() < 1e-9, "cross-slope factor was {f}");
        let f = directional_slope_factor(30.0, 90.0, 180.0);
        assert!((f - 1.0).abs() < 1e-9, "cross-slope factor was {f}");
    }

    #[test]
    fn straight_downslope_attenuates() {
        // At a 30% grade straight downslope: 1 - 0.3 = 0.7.
        let f = directional_slope_factor(30.0, 90.0, 270.0);
        assert!((f - 0.7).abs() < 1e-9, "downslope factor was {f}");

        // Steeper grades keep attenuating but never below the floor.
        let steep = directional_slope_factor(120.0, 90.0, 270.0);
        assert!((steep - MIN_SLOPE_FACTOR).abs() < 1e-9, "steep downslope was {steep}");
    }

    #[test]
    fn upslope_factor_caps_at_butler_limit() {
        // exp(3.533 * (s/100)^1.2) passes 5.0 somewhere above a 100% grade.
        assert!(max_upslope_factor(30.0) < MAX_SLOPE_FACTOR);
        assert_eq!(max_upslope_factor(250.0), MAX_SLOPE_FACTOR);
    }

    #[test]
    fn azimuth_wraparound() {
        // Upslope at 350, heading 10: 20 degrees apart, nearly full effect.
        let f = directional_slope_factor(30.0, 350.0, 10.0);
        let full = max_upslope_factor(30.0);
        let expected = 1.0 + (full - 1.0) * 20f64.to_radians().cos();
        assert!((f - expected).abs() < 1e-9, "wraparound factor was {f}");
    }

    #[test]
    fn factor_is_continuous_across_the_crossslope_boundary() {
        // Just uphill of perpendicular vs just downhill of perpendicular.
        let up = directional_slope_factor(30.0, 0.0, 89.9);
        let down = directional_slope_factor(30.0, 0.0, 90.1);
        assert!((up - down).abs() < 0.02, "discontinuity at cross-slope: {up} vs {down}");
    }
}
