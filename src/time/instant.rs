//! Points in time across time scales
//!
//! An [`Instant`] stores its position as an [`EpochCount`] from J2000 in TT,
//! whatever scale it was built in. The scale it was built in (or last
//! re-expressed in) is kept as a tag for display. Comparison and subtraction
//! work on the TT counts directly, so they are exact between instants tagged
//! with different scales.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use super::conversion::convert;
use super::count::EpochCount;
use super::date_time::{DateTime, DateTimeFormat};
use super::duration::Duration;
use super::errors::{Result, TimeError};
use super::leap_seconds::tai_minus_utc_at_utc;
use super::scale::Scale;
use crate::constants::{MAX_CALENDAR_YEAR, MIN_CALENDAR_YEAR};

lazy_static! {
    static ref LABELLED_PATTERN: Regex = Regex::new(r"^(.+) \[([A-Za-z0-9]+)\]$").unwrap();
}

/// A point in time
///
/// # Examples
///
/// ```
/// use astrotime::time::{DateTime, Duration, Instant, Scale};
///
/// let before_leap = DateTime::from_ymd_hms(2016, 12, 31, 23, 59, 59).unwrap();
/// let t = Instant::from_date_time(&before_leap, Scale::UTC).unwrap();
/// let after = (t + Duration::from_seconds(1.0)).unwrap();
///
/// // 2016-12-31 23:59:60 has no civil representation and shows as the
/// // preceding second
/// assert_eq!(after.to_date_time(Scale::UTC).unwrap(), before_leap);
/// assert_eq!((after - t).unwrap(), Duration::from_seconds(1.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    /// Position in TT
    count: EpochCount,
    scale: Scale,
}

impl Instant {
    pub fn undefined() -> Self {
        Self {
            count: EpochCount::EPOCH,
            scale: Scale::Undefined,
        }
    }

    /// J2000.0, 2000-01-01 12:00:00 TT
    pub fn epoch() -> Self {
        Self {
            count: EpochCount::EPOCH,
            scale: Scale::TT,
        }
    }

    /// Current wall-clock time, read as UTC
    pub fn now() -> Result<Self> {
        let now = Utc::now().naive_utc();
        let offset = (now - DateTime::j2000().as_naive())
            .num_nanoseconds()
            .ok_or_else(|| TimeError::out_of_range("Wall clock"))?;
        if offset < 0 {
            return Err(TimeError::OutOfRange(format!(
                "Wall clock [{}] before J2000",
                now
            )));
        }
        Self::from_count(EpochCount::After(offset as u64), Scale::UTC)
    }

    /// Instant from a raw epoch count expressed in `scale`
    pub fn from_count(count: EpochCount, scale: Scale) -> Result<Self> {
        if !scale.is_defined() {
            return Err(TimeError::wrong("Scale"));
        }
        Ok(Self {
            count: convert(count, scale, Scale::TT)?,
            scale,
        })
    }

    /// Instant at a calendar date and time read in `scale`
    ///
    /// Only years 1970 through 2030 are accepted.
    pub fn from_date_time(date_time: &DateTime, scale: Scale) -> Result<Self> {
        if !scale.is_defined() {
            return Err(TimeError::wrong("Scale"));
        }
        let year = date_time.year();
        if !(MIN_CALENDAR_YEAR..=MAX_CALENDAR_YEAR).contains(&year) {
            return Err(TimeError::OutOfRange(format!(
                "Year [{}] outside [{}, {}]",
                year, MIN_CALENDAR_YEAR, MAX_CALENDAR_YEAR
            )));
        }

        let offset = (date_time.as_naive() - DateTime::j2000().as_naive())
            .num_nanoseconds()
            .ok_or_else(|| TimeError::out_of_range("Date time"))?;
        Self::from_count(EpochCount::from_nanoseconds(offset), scale)
    }

    pub fn from_julian_date(julian_date: f64, scale: Scale) -> Result<Self> {
        Self::from_date_time(&DateTime::from_julian_date(julian_date)?, scale)
    }

    pub fn from_modified_julian_date(modified_julian_date: f64, scale: Scale) -> Result<Self> {
        Self::from_date_time(
            &DateTime::from_modified_julian_date(modified_julian_date)?,
            scale,
        )
    }

    pub fn is_defined(&self) -> bool {
        self.scale.is_defined()
    }

    /// Scale the instant was built in or last re-expressed in
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Whether the instant is at or after J2000 (TT)
    pub fn is_post_epoch(&self) -> Result<bool> {
        Ok(self.tt()?.is_post_epoch())
    }

    /// Raw epoch count in `scale`
    pub fn count_in(&self, scale: Scale) -> Result<EpochCount> {
        convert(self.tt()?, Scale::TT, scale)
    }

    /// The same instant, tagged with `scale`
    pub fn in_scale(&self, scale: Scale) -> Result<Instant> {
        self.tt()?;
        if scale == self.scale {
            return Ok(*self);
        }
        self.count_in(scale)?;
        Ok(Self {
            count: self.count,
            scale,
        })
    }

    pub fn to_date_time(&self, scale: Scale) -> Result<DateTime> {
        let offset = self.count_in(scale)?.to_nanoseconds()?;
        DateTime::j2000()
            .as_naive()
            .checked_add_signed(chrono::Duration::nanoseconds(offset))
            .map(DateTime::from)
            .ok_or_else(|| TimeError::out_of_range("Date time"))
    }

    pub fn julian_date(&self, scale: Scale) -> Result<f64> {
        Ok(self.to_date_time(scale)?.julian_date())
    }

    pub fn modified_julian_date(&self, scale: Scale) -> Result<f64> {
        Ok(self.to_date_time(scale)?.modified_julian_date())
    }

    /// TAI − UTC at this instant, in whole seconds
    ///
    /// Read off the UTC count, so an inserted leap second still reports the
    /// offset in force before it.
    pub fn leap_second_count(&self) -> Result<i64> {
        tai_minus_utc_at_utc(self.count_in(Scale::UTC)?)
    }

    /// Calendar string in `scale` followed by the scale label
    ///
    /// ISO 8601 strings in UTC end in `Z` instead of a label.
    pub fn to_string_in(&self, scale: Scale, format: DateTimeFormat) -> Result<String> {
        let date_time = self.to_date_time(scale)?.to_string_with(format);
        Ok(match (format, scale) {
            (DateTimeFormat::ISO8601, Scale::UTC) => format!("{}Z", date_time),
            _ => format!("{} [{}]", date_time, scale),
        })
    }

    /// Ordering that fails when either side is undefined
    pub fn compare(&self, other: &Instant) -> Result<Ordering> {
        Ok(self.tt()?.cmp(&other.tt()?))
    }

    /// Whether the two instants are at most `tolerance` apart
    pub fn is_near(&self, other: &Instant, tolerance: &Duration) -> Result<bool> {
        if !tolerance.is_positive()? {
            return Err(TimeError::Wrong(format!("Tolerance [{}]", tolerance)));
        }
        let difference = (*self - *other)?.absolute()?;
        Ok(difference.compare(tolerance)? != Ordering::Greater)
    }

    /// Parse `"<date time> [SCALE]"` or an ISO 8601 string ending in `Z` (UTC)
    ///
    /// Parsing goes through [`Instant::from_date_time`], so dates outside
    /// 1970 through 2030 fail with [`TimeError::OutOfRange`]. An instant moved
    /// past that window by arithmetic or built with [`Instant::from_count`]
    /// still displays, but its string form does not parse back.
    pub fn parse(s: &str) -> Result<Instant> {
        if s == "Undefined" {
            return Ok(Instant::undefined());
        }

        if let Some(caps) = LABELLED_PATTERN.captures(s) {
            let scale: Scale = caps[2].parse()?;
            let date_time = DateTime::parse(&caps[1], None)?;
            return Instant::from_date_time(&date_time, scale);
        }

        match s.strip_suffix('Z') {
            Some(utc) => {
                let date_time = DateTime::parse(utc, Some(DateTimeFormat::ISO8601))?;
                Instant::from_date_time(&date_time, Scale::UTC)
            }
            None => Err(TimeError::parse("Instant", s)),
        }
    }

    fn tt(&self) -> Result<EpochCount> {
        if self.is_defined() {
            Ok(self.count)
        } else {
            Err(TimeError::undefined("Instant"))
        }
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ok(Ordering::Equal)
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl Add<Duration> for Instant {
    type Output = Result<Instant>;

    fn add(self, duration: Duration) -> Self::Output {
        let count = self.tt()?.checked_add_nanoseconds(duration.total_nanoseconds()?)?;
        Ok(Self {
            count,
            scale: self.scale,
        })
    }
}

impl Sub<Duration> for Instant {
    type Output = Result<Instant>;

    fn sub(self, duration: Duration) -> Self::Output {
        let count = self.tt()?.checked_sub_nanoseconds(duration.total_nanoseconds()?)?;
        Ok(Self {
            count,
            scale: self.scale,
        })
    }
}

impl Sub<Instant> for Instant {
    type Output = Result<Duration>;

    fn sub(self, other: Instant) -> Self::Output {
        let nanoseconds = self.tt()?.nanoseconds_since(other.tt()?)?;
        Ok(Duration::from_nanoseconds(nanoseconds))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_defined() {
            return f.write_str("Undefined");
        }
        match self.to_string_in(self.scale, DateTimeFormat::Standard) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "J2000 {} ns [TT]", self.count),
        }
    }
}

impl FromStr for Instant {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        Instant::parse(s)
    }
}

// Serialized as the `Display` string, so only instants inside the calendar
// window accepted by `Instant::parse` read back.
impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
