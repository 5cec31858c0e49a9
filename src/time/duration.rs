//! Signed elapsed time at nanosecond resolution

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use super::errors::{Result, TimeError};
use super::instant::Instant;
use crate::constants::{
    NS_PER_DAY, NS_PER_HOUR, NS_PER_MIN, NS_PER_MS, NS_PER_S, NS_PER_US, NS_PER_WEEK,
};

lazy_static! {
    static ref STANDARD_PATTERN: Regex = Regex::new(
        r"(?x)
        ^(-)?                           # sign
        (?:(\d+)\x20)?                  # days
        (?:(?:(\d{2}):)?(\d{2}):)?      # hours, minutes
        (\d{2})                         # seconds
        \.(\d{3})\.(\d{3})\.(\d{3})$    # milli, micro, nano
        "
    )
    .unwrap();
    static ref ISO8601_PATTERN: Regex = Regex::new(
        r"(?x)
        ^(-)?P
        (?:(\d+)W)?
        (?:(\d+)D)?
        (?:T
            (?:(\d+)H)?
            (?:(\d+)M)?
            (?:(\d+)(?:\.(\d{1,9}))?S)?
        )?$
        "
    )
    .unwrap();
}

/// String layouts for [`Duration`]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFormat {
    /// `[-][D ][hh:][mm:]ss.mmm.uuu.nnn`
    Standard,
    /// `[-]P[nW][nD][T[nH][nM][n[.f]S]]`
    ISO8601,
}

/// Signed span of time counted in nanoseconds
///
/// A duration is either defined, holding a count that may be negative, or
/// undefined. Arithmetic on an undefined duration fails, equality with it is
/// always `false`, and ordering against it is `None`.
///
/// # Examples
///
/// ```
/// use astrotime::time::Duration;
///
/// let d = Duration::from_minutes(-90.0);
/// assert_eq!(d.hours().unwrap(), 1);
/// assert_eq!(d.minutes().unwrap(), 30);
/// assert!(!d.is_positive().unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    count: Option<i64>,
}

impl Duration {
    pub fn undefined() -> Self {
        Self { count: None }
    }

    pub fn zero() -> Self {
        Self { count: Some(0) }
    }

    /// Exact duration from a nanosecond count
    pub fn from_nanoseconds(nanoseconds: i64) -> Self {
        Self {
            count: Some(nanoseconds),
        }
    }

    pub fn from_microseconds(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_US)
    }

    pub fn from_milliseconds(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_MS)
    }

    pub fn from_seconds(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_S)
    }

    pub fn from_minutes(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_MIN)
    }

    pub fn from_hours(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_HOUR)
    }

    pub fn from_days(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_DAY)
    }

    pub fn from_weeks(value: f64) -> Self {
        Self::from_scaled(value, NS_PER_WEEK)
    }

    /// Duration from `start` to `end`
    pub fn between(start: &Instant, end: &Instant) -> Result<Self> {
        *end - *start
    }

    // Rounded to the nearest nanosecond; NaN, infinities and counts beyond
    // the i64 range give the undefined duration.
    fn from_scaled(value: f64, nanoseconds_per_unit: i64) -> Self {
        Self {
            count: round_to_count(value * nanoseconds_per_unit as f64),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.count.is_some()
    }

    pub fn is_zero(&self) -> Result<bool> {
        Ok(self.defined()? == 0)
    }

    /// True for zero and positive durations
    pub fn is_positive(&self) -> Result<bool> {
        Ok(self.defined()? >= 0)
    }

    pub fn is_strictly_positive(&self) -> Result<bool> {
        Ok(self.defined()? > 0)
    }

    /// Whether `self` and `other` differ by at most `tolerance`
    pub fn is_near(&self, other: &Duration, tolerance: &Duration) -> Result<bool> {
        if !tolerance.is_positive()? {
            return Err(TimeError::Wrong(format!("Tolerance [{}]", tolerance)));
        }
        let a = self.defined()? as i128;
        let b = other.defined()? as i128;
        let tolerance = tolerance.defined()? as i128;
        Ok((a - b).abs() <= tolerance)
    }

    /// Total signed nanosecond count
    pub fn total_nanoseconds(&self) -> Result<i64> {
        self.defined()
    }

    /// Nanosecond part, 0 to 999
    pub fn nanoseconds(&self) -> Result<i64> {
        Ok((self.magnitude()? % 1_000) as i64)
    }

    /// Microsecond part, 0 to 999
    pub fn microseconds(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_US as u64 % 1_000) as i64)
    }

    /// Millisecond part, 0 to 999
    pub fn milliseconds(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_MS as u64 % 1_000) as i64)
    }

    /// Second part, 0 to 59
    pub fn seconds(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_S as u64 % 60) as i64)
    }

    /// Minute part, 0 to 59
    pub fn minutes(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_MIN as u64 % 60) as i64)
    }

    /// Hour part, 0 to 23
    pub fn hours(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_HOUR as u64 % 24) as i64)
    }

    /// Whole days in the magnitude
    pub fn days(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_DAY as u64) as i64)
    }

    /// Whole weeks in the magnitude
    pub fn weeks(&self) -> Result<i64> {
        Ok((self.magnitude()? / NS_PER_WEEK as u64) as i64)
    }

    pub fn in_nanoseconds(&self) -> Result<f64> {
        Ok(self.defined()? as f64)
    }

    pub fn in_microseconds(&self) -> Result<f64> {
        self.in_units_of(NS_PER_US)
    }

    pub fn in_milliseconds(&self) -> Result<f64> {
        self.in_units_of(NS_PER_MS)
    }

    pub fn in_seconds(&self) -> Result<f64> {
        self.in_units_of(NS_PER_S)
    }

    pub fn in_minutes(&self) -> Result<f64> {
        self.in_units_of(NS_PER_MIN)
    }

    pub fn in_hours(&self) -> Result<f64> {
        self.in_units_of(NS_PER_HOUR)
    }

    pub fn in_days(&self) -> Result<f64> {
        self.in_units_of(NS_PER_DAY)
    }

    pub fn in_weeks(&self) -> Result<f64> {
        self.in_units_of(NS_PER_WEEK)
    }

    pub fn absolute(&self) -> Result<Duration> {
        self.defined()?
            .checked_abs()
            .map(Duration::from_nanoseconds)
            .ok_or_else(|| TimeError::out_of_range("Duration"))
    }

    /// Ordering that fails when either side is undefined
    pub fn compare(&self, other: &Duration) -> Result<Ordering> {
        Ok(self.defined()?.cmp(&other.defined()?))
    }

    pub fn to_string_with(&self, format: DurationFormat) -> Result<String> {
        match format {
            DurationFormat::Standard => self.to_standard_string(),
            DurationFormat::ISO8601 => self.to_iso8601_string(),
        }
    }

    /// Parse a duration string, detecting the layout when `format` is `None`
    pub fn parse(s: &str, format: Option<DurationFormat>) -> Result<Duration> {
        let format = match format {
            Some(format) => format,
            None if STANDARD_PATTERN.is_match(s) => DurationFormat::Standard,
            None if ISO8601_PATTERN.is_match(s) => DurationFormat::ISO8601,
            None => return Err(TimeError::parse("Duration", s)),
        };

        match format {
            DurationFormat::Standard => parse_standard(s),
            DurationFormat::ISO8601 => parse_iso8601(s),
        }
    }

    fn defined(&self) -> Result<i64> {
        self.count.ok_or_else(|| TimeError::undefined("Duration"))
    }

    fn magnitude(&self) -> Result<u64> {
        self.defined().map(i64::unsigned_abs)
    }

    fn in_units_of(&self, nanoseconds_per_unit: i64) -> Result<f64> {
        Ok(self.defined()? as f64 / nanoseconds_per_unit as f64)
    }

    fn sign(&self) -> Result<&'static str> {
        Ok(if self.defined()? < 0 { "-" } else { "" })
    }

    fn to_standard_string(&self) -> Result<String> {
        let sign = self.sign()?;
        let (days, hours, minutes) = (self.days()?, self.hours()?, self.minutes()?);
        let tail = format!(
            "{:02}.{:03}.{:03}.{:03}",
            self.seconds()?,
            self.milliseconds()?,
            self.microseconds()?,
            self.nanoseconds()?
        );

        Ok(if days > 0 {
            format!("{}{} {:02}:{:02}:{}", sign, days, hours, minutes, tail)
        } else if hours > 0 {
            format!("{}{:02}:{:02}:{}", sign, hours, minutes, tail)
        } else if minutes > 0 {
            format!("{}{:02}:{}", sign, minutes, tail)
        } else {
            format!("{}{}", sign, tail)
        })
    }

    fn to_iso8601_string(&self) -> Result<String> {
        if self.is_zero()? {
            return Ok("PT0H0M0S".to_string());
        }

        let (days, hours, minutes, seconds) =
            (self.days()?, self.hours()?, self.minutes()?, self.seconds()?);
        let subsecond = self.magnitude()? % NS_PER_S as u64;

        let mut out = format!("{}P", self.sign()?);
        if days > 0 {
            out.push_str(&format!("{}D", days));
        }
        if hours > 0 || minutes > 0 || seconds > 0 || subsecond > 0 {
            out.push('T');
            if hours > 0 {
                out.push_str(&format!("{}H", hours));
            }
            if minutes > 0 {
                out.push_str(&format!("{}M", minutes));
            }
            if seconds > 0 || subsecond > 0 {
                out.push_str(&seconds.to_string());
                if subsecond > 0 {
                    let fraction = format!("{:09}", subsecond);
                    out.push('.');
                    out.push_str(fraction.trim_end_matches('0'));
                }
                out.push('S');
            }
        }
        Ok(out)
    }
}

fn round_to_count(nanoseconds: f64) -> Option<i64> {
    let rounded = nanoseconds.round();
    // i64::MIN as f64 is exact (-2^63); i64::MAX as f64 rounds up to 2^63
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

fn group(s: &str, captures: &Captures<'_>, index: usize) -> Result<i128> {
    match captures.get(index) {
        Some(m) => m
            .as_str()
            .parse::<i128>()
            .map_err(|_| TimeError::OutOfRange(format!("Duration [{}]", s))),
        None => Ok(0),
    }
}

/// Sum of each captured component times its unit, failing on overflow
fn total_of(s: &str, captures: &Captures<'_>, units: &[(usize, i64)]) -> Result<i128> {
    units.iter().try_fold(0i128, |total, &(index, unit)| {
        group(s, captures, index)?
            .checked_mul(unit as i128)
            .and_then(|part| total.checked_add(part))
            .ok_or_else(|| TimeError::OutOfRange(format!("Duration [{}]", s)))
    })
}

fn assemble(s: &str, negative: bool, total: i128) -> Result<Duration> {
    let signed = if negative { -total } else { total };
    i64::try_from(signed)
        .map(Duration::from_nanoseconds)
        .map_err(|_| TimeError::OutOfRange(format!("Duration [{}]", s)))
}

fn parse_standard(s: &str) -> Result<Duration> {
    let caps = STANDARD_PATTERN
        .captures(s)
        .ok_or_else(|| TimeError::parse("Duration", s))?;

    let total = total_of(
        s,
        &caps,
        &[
            (2, NS_PER_DAY),
            (3, NS_PER_HOUR),
            (4, NS_PER_MIN),
            (5, NS_PER_S),
            (6, NS_PER_MS),
            (7, NS_PER_US),
            (8, 1),
        ],
    )?;

    assemble(s, caps.get(1).is_some(), total)
}

fn parse_iso8601(s: &str) -> Result<Duration> {
    let caps = ISO8601_PATTERN
        .captures(s)
        .ok_or_else(|| TimeError::parse("Duration", s))?;

    // "P" alone carries no component and "T" needs at least one after it
    if (2..=6).all(|i| caps.get(i).is_none())
        || (s.contains('T') && (4..=6).all(|i| caps.get(i).is_none()))
    {
        return Err(TimeError::parse("Duration", s));
    }

    // at most nine digits, always fits
    let fraction = match caps.get(7) {
        Some(m) => format!("{:0<9}", m.as_str())
            .parse::<i128>()
            .map_err(|_| TimeError::parse("Duration", s))?,
        None => 0,
    };

    let total = total_of(
        s,
        &caps,
        &[
            (2, NS_PER_WEEK),
            (3, NS_PER_DAY),
            (4, NS_PER_HOUR),
            (5, NS_PER_MIN),
            (6, NS_PER_S),
        ],
    )?
    .checked_add(fraction)
    .ok_or_else(|| TimeError::OutOfRange(format!("Duration [{}]", s)))?;

    assemble(s, caps.get(1).is_some(), total)
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.count, other.count), (Some(a), Some(b)) if a == b)
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl Add for Duration {
    type Output = Result<Duration>;

    fn add(self, other: Duration) -> Self::Output {
        self.defined()?
            .checked_add(other.defined()?)
            .map(Duration::from_nanoseconds)
            .ok_or_else(|| TimeError::out_of_range("Duration"))
    }
}

impl Sub for Duration {
    type Output = Result<Duration>;

    fn sub(self, other: Duration) -> Self::Output {
        self.defined()?
            .checked_sub(other.defined()?)
            .map(Duration::from_nanoseconds)
            .ok_or_else(|| TimeError::out_of_range("Duration"))
    }
}

impl Neg for Duration {
    type Output = Result<Duration>;

    fn neg(self) -> Self::Output {
        self.defined()?
            .checked_neg()
            .map(Duration::from_nanoseconds)
            .ok_or_else(|| TimeError::out_of_range("Duration"))
    }
}

impl Mul<f64> for Duration {
    type Output = Result<Duration>;

    fn mul(self, multiplier: f64) -> Self::Output {
        let count = self.defined()?;
        if multiplier.is_nan() {
            return Err(TimeError::undefined("Multiplier"));
        }

        // Whole multipliers stay in integer arithmetic
        if multiplier.fract() == 0.0 && multiplier.abs() < i64::MAX as f64 {
            return count
                .checked_mul(multiplier as i64)
                .map(Duration::from_nanoseconds)
                .ok_or_else(|| TimeError::out_of_range("Duration"));
        }

        round_to_count(count as f64 * multiplier)
            .map(Duration::from_nanoseconds)
            .ok_or_else(|| TimeError::out_of_range("Duration"))
    }
}

impl Mul<Duration> for f64 {
    type Output = Result<Duration>;

    fn mul(self, duration: Duration) -> Self::Output {
        duration * self
    }
}

impl Div<f64> for Duration {
    type Output = Result<Duration>;

    fn div(self, divider: f64) -> Self::Output {
        let count = self.defined()?;
        if divider.is_nan() {
            return Err(TimeError::undefined("Divider"));
        }
        if divider == 0.0 {
            return Err(TimeError::wrong("Divider"));
        }

        if divider.fract() == 0.0 && divider.abs() < i64::MAX as f64 {
            let divider = divider as i128;
            let count = count as i128;
            let quotient = count / divider;
            let remainder = count % divider;
            // round half away from zero
            let quotient = if 2 * remainder.abs() >= divider.abs() {
                quotient + (count.signum() * divider.signum())
            } else {
                quotient
            };
            return i64::try_from(quotient)
                .map(Duration::from_nanoseconds)
                .map_err(|_| TimeError::out_of_range("Duration"));
        }

        round_to_count(count as f64 / divider)
            .map(Duration::from_nanoseconds)
            .ok_or_else(|| TimeError::out_of_range("Duration"))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_standard_string() {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("Undefined"),
        }
    }
}

impl FromStr for Duration {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "Undefined" {
            return Ok(Duration::undefined());
        }
        Duration::parse(s, None)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
