//! FBP fuel type codes and parameter table.
//!
//! Single source of truth for the 18 Canadian FBP fuel types. Every module
//! that needs fuel parameters looks them up here.
//!
//! Parameters from:
//!     Forestry Canada Fire Danger Group (1992). Development and Structure
//!     of the Canadian Forest Fire Behavior Prediction System. Information
//!     Report ST-X-3, Tables 4-6.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FireSimError;

/// Canadian FBP fuel type codes.
///
/// A closed enumeration: unknown codes cannot be constructed, so every
/// downstream calculation is guaranteed a parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum FuelCode {
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    C7,
    D1,
    D2,
    M1,
    M2,
    M3,
    M4,
    O1a,
    O1b,
    S1,
    S2,
    S3,
}

/// Broad fuel group, used to dispatch group-specific branches of the
/// spread and consumption equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelGroup {
    Conifer,
    Deciduous,
    Mixedwood,
    Grass,
    Slash,
}

/// Complete parameter record for a single FBP fuel type.
///
/// Immutable after construction; one record per code, owned by the static
/// table below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelParams {
    /// FBP fuel type code.
    pub code: FuelCode,
    /// Full descriptive name.
    pub name: &'static str,
    /// Broad fuel group.
    pub group: FuelGroup,
    /// ROS equation parameter a (m/min).
    pub a: f64,
    /// ROS equation parameter b.
    pub b: f64,
    /// ROS equation parameter c.
    pub c: f64,
    /// BUI effect parameter q (dimensionless).
    pub q: f64,
    /// BUI effect reference BUI_0.
    pub bui0: f64,
    /// Maximum BUI effect multiplier.
    pub be_max: f64,
    /// Crown base height (m). Zero for fuels without a canopy.
    pub cbh: f64,
    /// Crown fuel load (kg/m^2). Zero for fuels without a canopy.
    pub cfl: f64,
    /// Surface fuel load (kg/m^2). Consumed as-is for grass; woody groups
    /// use the FFMC/BUI consumption equations instead.
    pub sfl: f64,
    /// Crown bulk density (kg/m^3), for crown fire spread.
    pub cbd: f64,
}

impl FuelParams {
    /// True when the fuel carries canopy parameters and can sustain
    /// crown fire.
    pub fn has_crown(&self) -> bool {
        self.cbh > 0.0 && self.cfl > 0.0
    }
}

// ST-X-3 Tables 4-6. D2 carries D1's ROS coefficients; the leafed-out 0.2
// reduction is applied in the calculator, not baked into `a`.
static FUEL_TABLE: [FuelParams; 18] = [
    FuelParams {
        code: FuelCode::C1,
        name: "Spruce-Lichen Woodland",
        group: FuelGroup::Conifer,
        a: 90.0,
        b: 0.0649,
        c: 4.5,
        q: 0.90,
        bui0: 72.0,
        be_max: 1.076,
        cbh: 2.0,
        cfl: 0.75,
        sfl: 0.75,
        cbd: 0.11,
    },
    FuelParams {
        code: FuelCode::C2,
        name: "Boreal Spruce",
        group: FuelGroup::Conifer,
        a: 110.0,
        b: 0.0282,
        c: 1.5,
        q: 0.70,
        bui0: 64.0,
        be_max: 1.321,
        cbh: 3.0,
        cfl: 0.80,
        sfl: 0.80,
        cbd: 0.18,
    },
    FuelParams {
        code: FuelCode::C3,
        name: "Mature Jack or Lodgepole Pine",
        group: FuelGroup::Conifer,
        a: 110.0,
        b: 0.0444,
        c: 3.0,
        q: 0.75,
        bui0: 62.0,
        be_max: 1.261,
        cbh: 8.0,
        cfl: 1.15,
        sfl: 1.15,
        cbd: 0.09,
    },
    FuelParams {
        code: FuelCode::C4,
        name: "Immature Jack or Lodgepole Pine",
        group: FuelGroup::Conifer,
        a: 110.0,
        b: 0.0293,
        c: 1.5,
        q: 0.75,
        bui0: 66.0,
        be_max: 1.184,
        cbh: 4.0,
        cfl: 1.20,
        sfl: 1.20,
        cbd: 0.13,
    },
    FuelParams {
        code: FuelCode::C5,
        name: "Red and White Pine",
        group: FuelGroup::Conifer,
        a: 30.0,
        b: 0.0697,
        c: 4.0,
        q: 0.80,
        bui0: 56.0,
        be_max: 1.220,
        cbh: 18.0,
        cfl: 1.20,
        sfl: 1.20,
        cbd: 0.14,
    },
    FuelParams {
        code: FuelCode::C6,
        name: "Conifer Plantation",
        group: FuelGroup::Conifer,
        a: 30.0,
        b: 0.0800,
        c: 3.0,
        q: 0.80,
        bui0: 62.0,
        be_max: 1.197,
        cbh: 7.0,
        cfl: 1.80,
        sfl: 1.80,
        cbd: 0.17,
    },
    FuelParams {
        code: FuelCode::C7,
        name: "Ponderosa Pine/Douglas-fir",
        group: FuelGroup::Conifer,
        a: 45.0,
        b: 0.0305,
        c: 2.0,
        q: 0.85,
        bui0: 106.0,
        be_max: 1.134,
        cbh: 10.0,
        cfl: 0.50,
        sfl: 0.50,
        cbd: 0.07,
    },
    FuelParams {
        code: FuelCode::D1,
        name: "Leafless Aspen",
        group: FuelGroup::Deciduous,
        a: 30.0,
        b: 0.0232,
        c: 1.6,
        q: 0.90,
        bui0: 32.0,
        be_max: 1.179,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 0.35,
        cbd: 0.0,
    },
    FuelParams {
        code: FuelCode::D2,
        name: "Green Aspen",
        group: FuelGroup::Deciduous,
        a: 30.0,
        b: 0.0232,
        c: 1.6,
        q: 0.90,
        bui0: 32.0,
        be_max: 1.179,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 0.35,
        cbd: 0.0,
    },
    FuelParams {
        code: FuelCode::M1,
        name: "Boreal Mixedwood - Leafless",
        group: FuelGroup::Mixedwood,
        a: 0.0,
        b: 0.0,
        c: 0.0,
        q: 0.80,
        bui0: 50.0,
        be_max: 1.250,
        cbh: 6.0,
        cfl: 0.80,
        sfl: 0.60,
        cbd: 0.10,
    },
    FuelParams {
        code: FuelCode::M2,
        name: "Boreal Mixedwood - Green",
        group: FuelGroup::Mixedwood,
        a: 0.0,
        b: 0.0,
        c: 0.0,
        q: 0.80,
        bui0: 50.0,
        be_max: 1.250,
        cbh: 6.0,
        cfl: 0.80,
        sfl: 0.60,
        cbd: 0.10,
    },
    FuelParams {
        code: FuelCode::M3,
        name: "Dead Balsam Fir Mixedwood - Leafless",
        group: FuelGroup::Mixedwood,
        a: 120.0,
        b: 0.0572,
        c: 1.4,
        q: 0.80,
        bui0: 50.0,
        be_max: 1.250,
        cbh: 6.0,
        cfl: 0.80,
        sfl: 0.80,
        cbd: 0.10,
    },
    FuelParams {
        code: FuelCode::M4,
        name: "Dead Balsam Fir Mixedwood - Green",
        group: FuelGroup::Mixedwood,
        a: 100.0,
        b: 0.0404,
        c: 3.0,
        q: 0.80,
        bui0: 50.0,
        be_max: 1.250,
        cbh: 6.0,
        cfl: 0.80,
        sfl: 0.80,
        cbd: 0.10,
    },
    FuelParams {
        code: FuelCode::O1a,
        name: "Matted Grass",
        group: FuelGroup::Grass,
        a: 190.0,
        b: 0.0310,
        c: 1.4,
        q: 1.0,
        bui0: 1.0,
        be_max: 1.0,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 0.35,
        cbd: 0.0,
    },
    FuelParams {
        code: FuelCode::O1b,
        name: "Standing Grass",
        group: FuelGroup::Grass,
        a: 250.0,
        b: 0.0350,
        c: 1.7,
        q: 1.0,
        bui0: 1.0,
        be_max: 1.0,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 0.35,
        cbd: 0.0,
    },
    FuelParams {
        code: FuelCode::S1,
        name: "Jack or Lodgepole Pine Slash",
        group: FuelGroup::Slash,
        a: 75.0,
        b: 0.0297,
        c: 1.3,
        q: 0.75,
        bui0: 38.0,
        be_max: 1.460,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 4.5,
        cbd: 0.0,
    },
    FuelParams {
        code: FuelCode::S2,
        name: "White Spruce/Balsam Slash",
        group: FuelGroup::Slash,
        a: 40.0,
        b: 0.0438,
        c: 1.7,
        q: 0.75,
        bui0: 63.0,
        be_max: 1.308,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 4.5,
        cbd: 0.0,
    },
    FuelParams {
        code: FuelCode::S3,
        name: "Coastal Cedar/Hemlock/Douglas-fir Slash",
        group: FuelGroup::Slash,
        a: 55.0,
        b: 0.0829,
        c: 3.2,
        q: 0.75,
        bui0: 31.0,
        be_max: 1.322,
        cbh: 0.0,
        cfl: 0.0,
        sfl: 4.5,
        cbd: 0.0,
    },
];

impl FuelCode {
    /// All 18 fuel codes, in table order.
    pub const ALL: [FuelCode; 18] = [
        FuelCode::C1,
        FuelCode::C2,
        FuelCode::C3,
        FuelCode::C4,
        FuelCode::C5,
        FuelCode::C6,
        FuelCode::C7,
        FuelCode::D1,
        FuelCode::D2,
        FuelCode::M1,
        FuelCode::M2,
        FuelCode::M3,
        FuelCode::M4,
        FuelCode::O1a,
        FuelCode::O1b,
        FuelCode::S1,
        FuelCode::S2,
        FuelCode::S3,
    ];

    /// Parameter record for this fuel type.
    pub fn params(self) -> &'static FuelParams {
        &FUEL_TABLE[self as usize]
    }

    /// String form of the code, e.g. `"C2"`.
    pub fn as_str(self) -> &'static str {
        match self {
            FuelCode::C1 => "C1",
            FuelCode::C2 => "C2",
            FuelCode::C3 => "C3",
            FuelCode::C4 => "C4",
            FuelCode::C5 => "C5",
            FuelCode::C6 => "C6",
            FuelCode::C7 => "C7",
            FuelCode::D1 => "D1",
            FuelCode::D2 => "D2",
            FuelCode::M1 => "M1",
            FuelCode::M2 => "M2",
            FuelCode::M3 => "M3",
            FuelCode::M4 => "M4",
            FuelCode::O1a => "O1a",
            FuelCode::O1b => "O1b",
            FuelCode::S1 => "S1",
            FuelCode::S2 => "S2",
            FuelCode::S3 => "S3",
        }
    }
}

impl fmt::Display for FuelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelCode {
    type Err = FireSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the grass sub-codes case-insensitively ("O1A" / "O1a").
        let code = FuelCode::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s));
        code.copied()
            .ok_or_else(|| FireSimError::UnknownFuel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_code_in_order() {
        for (i, code) in FuelCode::ALL.iter().enumerate() {
            let params = code.params();
            assert_eq!(params.code, *code, "table row {i} mismatched");
        }
    }

    #[test]
    fn crown_fuels_have_canopy_parameters() {
        // All seven conifers plus the mixedwoods carry a canopy.
        for code in [
            FuelCode::C1,
            FuelCode::C2,
            FuelCode::C6,
            FuelCode::M1,
            FuelCode::M3,
        ] {
            assert!(code.params().has_crown(), "{code} should have a canopy");
        }
        for code in [FuelCode::D1, FuelCode::O1a, FuelCode::S1] {
            assert!(!code.params().has_crown(), "{code} should not crown");
        }
    }

    #[test]
    fn parse_round_trips_all_codes() {
        for code in FuelCode::ALL {
            let parsed: FuelCode = code.as_str().parse().unwrap();
            assert_eq!(parsed, code);
        }
        assert_eq!("o1B".parse::<FuelCode>().unwrap(), FuelCode::O1b);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = "C9".parse::<FuelCode>().unwrap_err();
        assert!(matches!(err, FireSimError::UnknownFuel(_)));
    }

    #[test]
    fn serde_uses_plain_codes() {
        let json = serde_json::to_string(&FuelCode::O1a).unwrap();
        assert_eq!(json, "\"O1a\"");
        let back: FuelCode = serde_json::from_str("\"C2\"").unwrap();
        assert_eq!(back, FuelCode::C2);
    }

    #[test]
    fn d2_shares_d1_ros_coefficients() {
        let d1 = FuelCode::D1.params();
        let d2 = FuelCode::D2.params();
        assert_eq!(d1.a, d2.a);
        assert_eq!(d1.b, d2.b);
        assert_eq!(d1.c, d2.c);
    }
}
