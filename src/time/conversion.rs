//! Conversion of epoch counts between time scales
//!
//! Every conversion goes through TT. Each supported scale only needs a rule
//! into TT and a rule out of it:
//!
//! * TT = TAI + 32.184 s
//! * TAI = GPST + 19 s
//! * TAI = UTC + ΔAT, with ΔAT from the leap-second tables
//!
//! UT1 needs a DUT1 correction that is not available, and the remaining
//! scales have no closed-form relation here. Both fail instead of
//! approximating.

use log::trace;

use super::count::EpochCount;
use super::errors::{Result, TimeError};
use super::leap_seconds::{tai_minus_utc_at_tai, tai_minus_utc_at_utc};
use super::scale::Scale;
use crate::constants::{NS_PER_S, TAI_MINUS_GPST_NS, TT_MINUS_TAI_NS};

/// Re-express a count given in `from` as a count in `to`
pub fn convert(count: EpochCount, from: Scale, to: Scale) -> Result<EpochCount> {
    let tt = to_tt(count, from)?;
    let converted = from_tt(tt, to)?;
    trace!("{} {} -> {} {}", count, from, converted, to);
    Ok(converted)
}

fn to_tt(count: EpochCount, scale: Scale) -> Result<EpochCount> {
    match scale {
        Scale::TT => Ok(count),
        Scale::TAI => tt_from_tai(count),
        Scale::UTC => tt_from_tai(tai_from_utc(count)?),
        Scale::GPST => tt_from_tai(tai_from_gpst(count)?),
        Scale::UT1 => tt_from_tai(tai_from_utc(utc_from_ut1(count)?)?),
        Scale::Undefined => Err(TimeError::wrong("Scale")),
        other => Err(not_implemented(other, Scale::TT)),
    }
}

fn from_tt(tt: EpochCount, scale: Scale) -> Result<EpochCount> {
    match scale {
        Scale::TT => Ok(tt),
        Scale::TAI => tai_from_tt(tt),
        Scale::UTC => utc_from_tai(tai_from_tt(tt)?),
        Scale::GPST => gpst_from_tai(tai_from_tt(tt)?),
        Scale::UT1 => ut1_from_utc(utc_from_tai(tai_from_tt(tt)?)?),
        Scale::Undefined => Err(TimeError::wrong("Scale")),
        other => Err(not_implemented(Scale::TT, other)),
    }
}

fn not_implemented(from: Scale, to: Scale) -> TimeError {
    TimeError::NotImplemented(format!("Conversion from {} to {}", from, to))
}

fn tt_from_tai(tai: EpochCount) -> Result<EpochCount> {
    tai.shifted(TT_MINUS_TAI_NS, true)
}

fn tai_from_tt(tt: EpochCount) -> Result<EpochCount> {
    tt.shifted(TT_MINUS_TAI_NS, false)
}

fn tai_from_gpst(gpst: EpochCount) -> Result<EpochCount> {
    gpst.shifted(TAI_MINUS_GPST_NS, true)
}

fn gpst_from_tai(tai: EpochCount) -> Result<EpochCount> {
    tai.shifted(TAI_MINUS_GPST_NS, false)
}

fn tai_from_utc(utc: EpochCount) -> Result<EpochCount> {
    let offset_s = tai_minus_utc_at_utc(utc)?;
    utc.checked_add_nanoseconds(offset_s * NS_PER_S)
}

fn utc_from_tai(tai: EpochCount) -> Result<EpochCount> {
    let offset_s = tai_minus_utc_at_tai(tai)?;
    tai.checked_sub_nanoseconds(offset_s * NS_PER_S)
}

fn utc_from_ut1(_ut1: EpochCount) -> Result<EpochCount> {
    Err(TimeError::NotImplemented("UT1 -> UTC (DUT1 correction)".to_string()))
}

fn ut1_from_utc(_utc: EpochCount) -> Result<EpochCount> {
    Err(TimeError::NotImplemented("UTC -> UT1 (DUT1 correction)".to_string()))
}
