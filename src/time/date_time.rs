//! Civil calendar date and time of day
//!
//! [`DateTime`] is the calendar-side value handed to and from
//! [`Instant`](super::Instant): a proleptic Gregorian date with a time of
//! day down to the nanosecond, carrying no time scale of its own. Validation
//! and day arithmetic are delegated to `chrono`; Julian dates go through the
//! Julian Day Number routines in [`calendar`](super::calendar).

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::calendar::{compute_calendar_date, compute_julian_day};
use super::errors::{Result, TimeError};
use crate::constants::{
    DAY_S, MJD_EPOCH_JDN, NS_PER_DAY, NS_PER_S, UNIX_TO_GPS_EPOCH_S, UNIX_TO_J2000_S,
    UNIX_TO_MJD_EPOCH_S,
};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Largest Julian or Modified Julian date accepted, well inside chrono's range
const MAX_DAY_COUNT: f64 = 1.0e8;

lazy_static! {
    static ref STANDARD_PATTERN: Regex = Regex::new(
        r"^(-?\d+)-(\d{2})-(\d{2}) (\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,3}))?(?:\.(\d{1,3}))?(?:\.(\d{1,3}))?(?:Z|\+0000)?$"
    )
    .unwrap();
    static ref ISO8601_PATTERN: Regex = Regex::new(
        r"^(-?\d+)-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?(?:Z|\+0000)?$"
    )
    .unwrap();
    static ref STK_PATTERN: Regex =
        Regex::new(r"^(\d{1,2}) ([A-Z][a-z]{2}) (\d{4}) (\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?$")
            .unwrap();
}

/// String layouts for [`DateTime`]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeFormat {
    /// `2018-01-02 12:34:56.123.456.789`, trailing zero groups dropped
    Standard,
    /// `2018-01-02T12:34:56.123456789`, fraction in groups of three digits
    ISO8601,
    /// `2 Jan 2018 12:34:56.123456789`
    STK,
}

/// Calendar date and time of day, at nanosecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime {
    inner: NaiveDateTime,
}

impl DateTime {
    /// Build and validate a date and time
    ///
    /// Sub-second fields are each limited to 0..=999. Leap seconds (second 60)
    /// cannot be represented and are rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        microsecond: u32,
        nanosecond: u32,
    ) -> Result<Self> {
        if millisecond > 999 || microsecond > 999 || nanosecond > 999 {
            return Err(TimeError::Wrong(format!(
                "Sub-second fields [{}.{}.{}]",
                millisecond, microsecond, nanosecond
            )));
        }
        let nanos = millisecond * 1_000_000 + microsecond * 1_000 + nanosecond;

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nanos))
            .map(|inner| Self { inner })
            .ok_or_else(|| {
                TimeError::Wrong(format!(
                    "Date time [{:04}-{:02}-{:02} {:02}:{:02}:{:02}]",
                    year, month, day, hour, minute, second
                ))
            })
    }

    /// Date and time with whole seconds
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        Self::new(year, month, day, hour, minute, second, 0, 0, 0)
    }

    /// 2000-01-01 12:00:00
    pub fn j2000() -> Self {
        Self::from_unix_seconds(UNIX_TO_J2000_S)
    }

    /// 1980-01-06 00:00:00
    pub fn gps_epoch() -> Self {
        Self::from_unix_seconds(UNIX_TO_GPS_EPOCH_S)
    }

    /// 1970-01-01 00:00:00
    pub fn unix_epoch() -> Self {
        Self::from_unix_seconds(0)
    }

    /// 1858-11-17 00:00:00
    pub fn modified_julian_date_epoch() -> Self {
        Self::from_unix_seconds(UNIX_TO_MJD_EPOCH_S)
    }

    fn from_unix_seconds(seconds: i64) -> Self {
        Self {
            inner: NaiveDateTime::default() + chrono::Duration::seconds(seconds),
        }
    }

    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    pub fn month(&self) -> u32 {
        self.inner.month()
    }

    pub fn day(&self) -> u32 {
        self.inner.day()
    }

    pub fn hour(&self) -> u32 {
        self.inner.hour()
    }

    pub fn minute(&self) -> u32 {
        self.inner.minute()
    }

    pub fn second(&self) -> u32 {
        self.inner.second()
    }

    pub fn millisecond(&self) -> u32 {
        self.inner.nanosecond() / 1_000_000
    }

    pub fn microsecond(&self) -> u32 {
        self.inner.nanosecond() / 1_000 % 1_000
    }

    pub fn nanosecond(&self) -> u32 {
        self.inner.nanosecond() % 1_000
    }

    /// Underlying `chrono` value
    pub fn as_naive(&self) -> NaiveDateTime {
        self.inner
    }

    /// Julian date, counting days from noon
    pub fn julian_date(&self) -> f64 {
        let jdn = compute_julian_day(self.year(), self.month(), self.day());
        jdn as f64 + (self.seconds_of_day() - DAY_S / 2.0) / DAY_S
    }

    /// Modified Julian date, counting days from midnight of 1858-11-17
    pub fn modified_julian_date(&self) -> f64 {
        let jdn = compute_julian_day(self.year(), self.month(), self.day());
        (jdn - MJD_EPOCH_JDN) as f64 + self.seconds_of_day() / DAY_S
    }

    pub fn from_julian_date(julian_date: f64) -> Result<Self> {
        check_day_count(julian_date, "Julian date")?;
        // Julian days start at noon, civil days at midnight
        Self::from_day_count(julian_date + 0.5, 0)
    }

    pub fn from_modified_julian_date(modified_julian_date: f64) -> Result<Self> {
        check_day_count(modified_julian_date, "Modified Julian date")?;
        Self::from_day_count(modified_julian_date, MJD_EPOCH_JDN)
    }

    // `days` counts civil days (midnight based) from Julian Day Number `origin_jdn`
    fn from_day_count(days: f64, origin_jdn: i64) -> Result<Self> {
        let whole_days = days.floor();
        let nanos_of_day = ((days - whole_days) * NS_PER_DAY as f64).round() as i64;
        let (year, month, day) = compute_calendar_date(origin_jdn + whole_days as i64);

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|midnight| {
                midnight.checked_add_signed(chrono::Duration::nanoseconds(nanos_of_day))
            })
            .map(|inner| Self { inner })
            .ok_or_else(|| TimeError::out_of_range("Day count"))
    }

    fn seconds_of_day(&self) -> f64 {
        let whole = self.hour() * 3600 + self.minute() * 60 + self.second();
        whole as f64 + self.inner.nanosecond() as f64 / NS_PER_S as f64
    }

    pub fn to_string_with(&self, format: DateTimeFormat) -> String {
        match format {
            DateTimeFormat::Standard => {
                let mut out = format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    self.year(),
                    self.month(),
                    self.day(),
                    self.hour(),
                    self.minute(),
                    self.second()
                );
                let (ms, us, ns) = (self.millisecond(), self.microsecond(), self.nanosecond());
                if ms > 0 || us > 0 || ns > 0 {
                    out.push_str(&format!(".{:03}", ms));
                }
                if us > 0 || ns > 0 {
                    out.push_str(&format!(".{:03}", us));
                }
                if ns > 0 {
                    out.push_str(&format!(".{:03}", ns));
                }
                out
            }
            DateTimeFormat::ISO8601 => format!(
                "{:04}-{:02}-{:02}T{}",
                self.year(),
                self.month(),
                self.day(),
                self.iso8601_time()
            ),
            DateTimeFormat::STK => format!(
                "{} {} {} {}",
                self.day(),
                MONTH_ABBREVIATIONS[self.month0()],
                self.year(),
                self.iso8601_time()
            ),
        }
    }

    fn month0(&self) -> usize {
        self.inner.month0() as usize
    }

    fn iso8601_time(&self) -> String {
        let time = format!("{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second());
        let nanos = self.inner.nanosecond();
        if nanos == 0 {
            time
        } else if nanos % 1_000_000 == 0 {
            format!("{}.{:03}", time, nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            format!("{}.{:06}", time, nanos / 1_000)
        } else {
            format!("{}.{:09}", time, nanos)
        }
    }

    /// Parse a date-time string, detecting the layout when `format` is `None`
    pub fn parse(s: &str, format: Option<DateTimeFormat>) -> Result<Self> {
        let format = match format {
            Some(format) => format,
            None if ISO8601_PATTERN.is_match(s) => DateTimeFormat::ISO8601,
            None if STK_PATTERN.is_match(s) => DateTimeFormat::STK,
            None => DateTimeFormat::Standard,
        };

        match format {
            DateTimeFormat::Standard => {
                let caps = STANDARD_PATTERN
                    .captures(s)
                    .ok_or_else(|| TimeError::parse("Standard date-time", s))?;
                let sub = |i: usize| caps.get(i).map_or(0, |m| padded(m.as_str(), 3));
                Self::new(
                    number(&caps, 1, s)?,
                    number(&caps, 2, s)?,
                    number(&caps, 3, s)?,
                    number(&caps, 4, s)?,
                    number(&caps, 5, s)?,
                    number(&caps, 6, s)?,
                    sub(7),
                    sub(8),
                    sub(9),
                )
            }
            DateTimeFormat::ISO8601 => {
                let caps = ISO8601_PATTERN
                    .captures(s)
                    .ok_or_else(|| TimeError::parse("ISO 8601 date-time", s))?;
                Self::with_fraction(
                    number(&caps, 1, s)?,
                    number(&caps, 2, s)?,
                    number(&caps, 3, s)?,
                    &caps,
                    s,
                )
            }
            DateTimeFormat::STK => {
                let caps = STK_PATTERN
                    .captures(s)
                    .ok_or_else(|| TimeError::parse("STK date-time", s))?;
                let month = MONTH_ABBREVIATIONS
                    .iter()
                    .position(|name| *name == &caps[2])
                    .ok_or_else(|| TimeError::parse("STK date-time", s))?;
                Self::with_fraction(
                    number(&caps, 3, s)?,
                    month as u32 + 1,
                    number(&caps, 1, s)?,
                    &caps,
                    s,
                )
            }
        }
    }

    // Time of day in capture groups 4 to 6, optional 1-9 digit fraction in 7
    fn with_fraction(year: i32, month: u32, day: u32, caps: &Captures<'_>, s: &str) -> Result<Self> {
        let nanos = caps.get(7).map_or(0, |m| padded(m.as_str(), 9));
        Self::new(
            year,
            month,
            day,
            number(caps, 4, s)?,
            number(caps, 5, s)?,
            number(caps, 6, s)?,
            nanos / 1_000_000,
            nanos / 1_000 % 1_000,
            nanos % 1_000,
        )
    }
}

fn check_day_count(value: f64, what: &str) -> Result<()> {
    if value.is_nan() {
        Err(TimeError::undefined(what))
    } else if !value.is_finite() || !(0.0..=MAX_DAY_COUNT).contains(&value) {
        Err(TimeError::OutOfRange(format!("{} [{}]", what, value)))
    } else {
        Ok(())
    }
}

fn number<T: FromStr>(caps: &Captures<'_>, index: usize, s: &str) -> Result<T> {
    caps.get(index)
        .and_then(|m| m.as_str().parse::<T>().ok())
        .ok_or_else(|| TimeError::parse("date-time", s))
}

/// Read a fraction's digits as if right-padded with zeros to `width`
fn padded(digits: &str, width: usize) -> u32 {
    format!("{:0<width$}", digits, width = width)
        .parse()
        .unwrap_or(0)
}

impl From<NaiveDateTime> for DateTime {
    fn from(inner: NaiveDateTime) -> Self {
        Self { inner }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(DateTimeFormat::Standard))
    }
}

impl FromStr for DateTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        DateTime::parse(s, None)
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
