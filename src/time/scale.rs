//! Time scales

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{Result, TimeError};

/// Time scale in which an instant can be expressed
///
/// Only `TT`, `TAI`, `UTC` and `GPST` convert. `UT1` needs a DUT1 correction
/// and the remaining scales have no closed-form offset here, so any conversion
/// that names them fails with [`TimeError::NotImplemented`].
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    Undefined,
    /// Coordinated Universal Time
    UTC,
    /// Terrestrial Time
    TT,
    /// International Atomic Time
    TAI,
    /// Universal Time
    UT1,
    /// Geocentric Coordinate Time
    TCG,
    /// Barycentric Coordinate Time
    TCB,
    /// Barycentric Dynamical Time
    TDB,
    /// Greenwich Mean Sidereal Time
    GMST,
    /// GPS Time
    GPST,
    /// Galileo System Time
    GST,
    /// GLONASS Time
    GLST,
    /// BeiDou Time
    BDT,
    /// Quasi-Zenith Satellite System Time
    QZSST,
    /// Indian Regional Navigation Satellite System Time
    IRNSST,
}

impl Scale {
    /// All defined scales, in declaration order
    pub const ALL: [Scale; 14] = [
        Scale::UTC,
        Scale::TT,
        Scale::TAI,
        Scale::UT1,
        Scale::TCG,
        Scale::TCB,
        Scale::TDB,
        Scale::GMST,
        Scale::GPST,
        Scale::GST,
        Scale::GLST,
        Scale::BDT,
        Scale::QZSST,
        Scale::IRNSST,
    ];

    /// Scales with a working conversion to and from TT
    pub const SUPPORTED: [Scale; 4] = [Scale::TT, Scale::TAI, Scale::UTC, Scale::GPST];

    pub fn is_defined(&self) -> bool {
        *self != Scale::Undefined
    }

    /// Whether instants can be converted into and out of this scale
    pub fn is_supported(&self) -> bool {
        Scale::SUPPORTED.contains(self)
    }

    /// Short name of the scale, as used in instant strings
    pub fn name(&self) -> &'static str {
        match self {
            Scale::Undefined => "Undefined",
            Scale::UTC => "UTC",
            Scale::TT => "TT",
            Scale::TAI => "TAI",
            Scale::UT1 => "UT1",
            Scale::TCG => "TCG",
            Scale::TCB => "TCB",
            Scale::TDB => "TDB",
            Scale::GMST => "GMST",
            Scale::GPST => "GPST",
            Scale::GST => "GST",
            Scale::GLST => "GLST",
            Scale::BDT => "BDT",
            Scale::QZSST => "QZSST",
            Scale::IRNSST => "IRNSST",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "Undefined" {
            return Ok(Scale::Undefined);
        }
        Scale::ALL
            .iter()
            .copied()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| TimeError::parse("Scale", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for scale in Scale::ALL {
            assert_eq!(scale.to_string().parse::<Scale>().unwrap(), scale);
        }
        assert_eq!("Undefined".parse::<Scale>().unwrap(), Scale::Undefined);
    }

    #[test]
    fn test_unknown_name() {
        assert!("utc".parse::<Scale>().is_err());
        assert!("".parse::<Scale>().is_err());
        assert!("GPS".parse::<Scale>().is_err());
    }

    #[test]
    fn test_support() {
        assert!(Scale::UTC.is_supported());
        assert!(Scale::GPST.is_supported());
        assert!(!Scale::UT1.is_supported());
        assert!(!Scale::TDB.is_supported());
        assert!(!Scale::Undefined.is_defined());
        assert!(!Scale::Undefined.is_supported());
    }
}
