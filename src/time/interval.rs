//! Time intervals bounded by two instants

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::date_time::{DateTime, DateTimeFormat};
use super::duration::Duration;
use super::errors::{Result, TimeError};
use super::instant::Instant;
use super::scale::Scale;

lazy_static! {
    static ref INTERVAL_PATTERN: Regex =
        Regex::new(r"^([\[\]])(.+) - (.+)([\[\]]) \[([A-Za-z0-9]+)\]$").unwrap();
}

/// Which ends of an interval belong to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalType {
    /// `[start, end]`
    Closed,
    /// `]start, end[`
    Open,
    /// `]start, end]`
    HalfOpenLeft,
    /// `[start, end[`
    HalfOpenRight,
}

impl IntervalType {
    fn from_bounds(lower_closed: bool, upper_closed: bool) -> Self {
        match (lower_closed, upper_closed) {
            (true, true) => IntervalType::Closed,
            (false, false) => IntervalType::Open,
            (false, true) => IntervalType::HalfOpenLeft,
            (true, false) => IntervalType::HalfOpenRight,
        }
    }

    fn lower_closed(&self) -> bool {
        matches!(self, IntervalType::Closed | IntervalType::HalfOpenRight)
    }

    fn upper_closed(&self) -> bool {
        matches!(self, IntervalType::Closed | IntervalType::HalfOpenLeft)
    }
}

/// Span of time between two defined instants, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    start: Instant,
    end: Instant,
    interval_type: IntervalType,
}

impl Interval {
    pub fn new(start: Instant, end: Instant, interval_type: IntervalType) -> Result<Self> {
        if !start.is_defined() {
            return Err(TimeError::undefined("Lower bound"));
        }
        if !end.is_defined() {
            return Err(TimeError::undefined("Upper bound"));
        }
        if start.compare(&end)? == Ordering::Greater {
            return Err(TimeError::Wrong(format!(
                "Interval bounds [{} > {}]",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            interval_type,
        })
    }

    pub fn closed(start: Instant, end: Instant) -> Result<Self> {
        Self::new(start, end, IntervalType::Closed)
    }

    pub fn open(start: Instant, end: Instant) -> Result<Self> {
        Self::new(start, end, IntervalType::Open)
    }

    pub fn half_open_left(start: Instant, end: Instant) -> Result<Self> {
        Self::new(start, end, IntervalType::HalfOpenLeft)
    }

    pub fn half_open_right(start: Instant, end: Instant) -> Result<Self> {
        Self::new(start, end, IntervalType::HalfOpenRight)
    }

    /// Interval of length `duration` centered on `center`
    pub fn centered(center: Instant, duration: Duration, interval_type: IntervalType) -> Result<Self> {
        if !center.is_defined() {
            return Err(TimeError::undefined("Central instant"));
        }
        if !duration.is_positive()? {
            return Err(TimeError::Wrong(format!("Duration [{}]", duration)));
        }
        let half = (duration / 2.0)?;
        Self::new((center - half)?, (center + half)?, interval_type)
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn interval_type(&self) -> IntervalType {
        self.interval_type
    }

    pub fn duration(&self) -> Result<Duration> {
        Duration::between(&self.start, &self.end)
    }

    pub fn center(&self) -> Result<Instant> {
        self.start + (self.duration()? / 2.0)?
    }

    pub fn contains_instant(&self, instant: &Instant) -> Result<bool> {
        let after_start = match instant.compare(&self.start)? {
            Ordering::Greater => true,
            Ordering::Equal => self.interval_type.lower_closed(),
            Ordering::Less => false,
        };
        let before_end = match instant.compare(&self.end)? {
            Ordering::Less => true,
            Ordering::Equal => self.interval_type.upper_closed(),
            Ordering::Greater => false,
        };
        Ok(after_start && before_end)
    }

    pub fn contains_interval(&self, other: &Interval) -> Result<bool> {
        let lower_ok = match other.start.compare(&self.start)? {
            Ordering::Greater => true,
            Ordering::Equal => {
                self.interval_type.lower_closed() || !other.interval_type.lower_closed()
            }
            Ordering::Less => false,
        };
        let upper_ok = match other.end.compare(&self.end)? {
            Ordering::Less => true,
            Ordering::Equal => {
                self.interval_type.upper_closed() || !other.interval_type.upper_closed()
            }
            Ordering::Greater => false,
        };
        Ok(lower_ok && upper_ok)
    }

    pub fn intersects(&self, other: &Interval) -> Result<bool> {
        Ok(self.intersection(other)?.is_some())
    }

    /// Overlap of the two intervals, `None` when they share no instant
    pub fn intersection(&self, other: &Interval) -> Result<Option<Interval>> {
        let (start, lower_closed) = match self.start.compare(&other.start)? {
            Ordering::Greater => (self.start, self.interval_type.lower_closed()),
            Ordering::Less => (other.start, other.interval_type.lower_closed()),
            Ordering::Equal => (
                self.start,
                self.interval_type.lower_closed() && other.interval_type.lower_closed(),
            ),
        };
        let (end, upper_closed) = match self.end.compare(&other.end)? {
            Ordering::Less => (self.end, self.interval_type.upper_closed()),
            Ordering::Greater => (other.end, other.interval_type.upper_closed()),
            Ordering::Equal => (
                self.end,
                self.interval_type.upper_closed() && other.interval_type.upper_closed(),
            ),
        };

        Self::spanning(start, lower_closed, end, upper_closed)
    }

    /// Single interval covering both, `None` when they leave a gap
    ///
    /// Intervals meeting at one instant join when either of them holds it.
    pub fn union_with(&self, other: &Interval) -> Result<Option<Interval>> {
        let (first, second) = match self.start.compare(&other.start)? {
            Ordering::Greater => (other, self),
            _ => (self, other),
        };
        let joined = match first.end.compare(&second.start)? {
            Ordering::Greater => true,
            Ordering::Equal => {
                first.interval_type.upper_closed() || second.interval_type.lower_closed()
            }
            Ordering::Less => false,
        };
        if !joined {
            return Ok(None);
        }

        let lower_closed = match first.start.compare(&second.start)? {
            Ordering::Equal => {
                first.interval_type.lower_closed() || second.interval_type.lower_closed()
            }
            _ => first.interval_type.lower_closed(),
        };
        let (end, upper_closed) = match first.end.compare(&second.end)? {
            Ordering::Greater => (first.end, first.interval_type.upper_closed()),
            Ordering::Less => (second.end, second.interval_type.upper_closed()),
            Ordering::Equal => (
                first.end,
                first.interval_type.upper_closed() || second.interval_type.upper_closed(),
            ),
        };

        Ok(Some(Self {
            start: first.start,
            end,
            interval_type: IntervalType::from_bounds(lower_closed, upper_closed),
        }))
    }

    /// Parts of `intervals` inside `clip`, sorted by start
    pub fn clip(intervals: &[Interval], clip: &Interval) -> Result<Vec<Interval>> {
        let mut clipped = Vec::with_capacity(intervals.len());
        for interval in intervals {
            if let Some(part) = interval.intersection(clip)? {
                clipped.push(part);
            }
        }
        Ok(Self::sort(&clipped, true, true))
    }

    /// Stable sort on the start (`by_start`) or end bound
    pub fn sort(intervals: &[Interval], by_start: bool, ascending: bool) -> Vec<Interval> {
        let bound = |interval: &Interval| {
            if by_start {
                interval.start
            } else {
                interval.end
            }
        };

        let mut sorted = intervals.to_vec();
        // bounds are always defined, so `partial_cmp` is never `None`
        sorted.sort_by(|a, b| {
            let ordering = bound(a).partial_cmp(&bound(b)).unwrap_or(Ordering::Equal);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        sorted
    }

    /// Smallest set of disjoint intervals covering the same instants, sorted by start
    pub fn merge(intervals: &[Interval]) -> Result<Vec<Interval>> {
        let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
        for interval in Self::sort(intervals, true, true) {
            if let Some(last) = merged.last_mut() {
                if let Some(union) = last.union_with(&interval)? {
                    *last = union;
                    continue;
                }
            }
            merged.push(interval);
        }
        Ok(merged)
    }

    /// Spans not covered by any of `intervals`
    ///
    /// Without `analysis` only the gaps between intervals are returned. With
    /// it, the intervals are first clipped to `analysis` and the uncovered
    /// spans at either end of it are included too. Gap bounds are closed where
    /// the neighbouring interval is open, so gaps and intervals partition time.
    pub fn gaps(intervals: &[Interval], analysis: Option<&Interval>) -> Result<Vec<Interval>> {
        let merged = match analysis {
            Some(analysis) => Self::merge(&Self::clip(intervals, analysis)?)?,
            None => Self::merge(intervals)?,
        };

        let mut cursor = analysis.map(|a| (a.start, a.interval_type.lower_closed()));
        let mut gaps = Vec::new();
        for interval in &merged {
            if let Some((start, lower_closed)) = cursor {
                let gap = Self::spanning(
                    start,
                    lower_closed,
                    interval.start,
                    !interval.interval_type.lower_closed(),
                )?;
                gaps.extend(gap);
            }
            cursor = Some((interval.end, !interval.interval_type.upper_closed()));
        }

        if let (Some(analysis), Some((start, lower_closed))) = (analysis, cursor) {
            let tail = Self::spanning(
                start,
                lower_closed,
                analysis.end,
                analysis.interval_type.upper_closed(),
            )?;
            gaps.extend(tail);
        }
        Ok(gaps)
    }

    /// Instants covered by either list, merged
    pub fn logical_or(intervals: &[Interval], others: &[Interval]) -> Result<Vec<Interval>> {
        let all: Vec<Interval> = intervals.iter().chain(others).copied().collect();
        Self::merge(&all)
    }

    /// Every pairwise overlap between the two lists, unmerged
    pub fn logical_and(intervals: &[Interval], others: &[Interval]) -> Result<Vec<Interval>> {
        let mut overlaps = Vec::new();
        for interval in intervals {
            for other in others {
                overlaps.extend(interval.intersection(other)?);
            }
        }
        Ok(overlaps)
    }

    // `None` when the bounds enclose no instant
    fn spanning(
        start: Instant,
        lower_closed: bool,
        end: Instant,
        upper_closed: bool,
    ) -> Result<Option<Interval>> {
        let non_empty = match start.compare(&end)? {
            Ordering::Less => true,
            Ordering::Equal => lower_closed && upper_closed,
            Ordering::Greater => false,
        };
        if !non_empty {
            return Ok(None);
        }
        Ok(Some(Self {
            start,
            end,
            interval_type: IntervalType::from_bounds(lower_closed, upper_closed),
        }))
    }

    /// Instants from one bound to the other, `step` apart
    ///
    /// A positive step walks from start to end, a negative one from end to
    /// start. The far bound is always the last element.
    pub fn generate_grid(&self, step: &Duration) -> Result<Vec<Instant>> {
        if step.is_zero()? {
            return Err(TimeError::wrong("Step"));
        }

        let (from, to, forward) = if step.is_strictly_positive()? {
            (self.start, self.end, true)
        } else {
            (self.end, self.start, false)
        };

        let mut grid = Vec::new();
        let mut current = from;
        loop {
            let ahead = if forward {
                current.compare(&to)? == Ordering::Less
            } else {
                current.compare(&to)? == Ordering::Greater
            };
            if !ahead {
                break;
            }
            grid.push(current);
            current = (current + *step)?;
        }
        grid.push(to);
        Ok(grid)
    }

    /// Bounds as calendar strings in `scale`, e.g. `[2018-01-01 00:00:00 - 2018-01-02 00:00:00[ [UTC]`
    pub fn to_string_in(&self, scale: Scale) -> Result<String> {
        let opening = if self.interval_type.lower_closed() { '[' } else { ']' };
        let closing = if self.interval_type.upper_closed() { ']' } else { '[' };
        Ok(format!(
            "{}{} - {}{} [{}]",
            opening,
            self.start.to_date_time(scale)?.to_string_with(DateTimeFormat::Standard),
            self.end.to_date_time(scale)?.to_string_with(DateTimeFormat::Standard),
            closing,
            scale
        ))
    }

    pub fn parse(s: &str) -> Result<Interval> {
        let caps = INTERVAL_PATTERN
            .captures(s)
            .ok_or_else(|| TimeError::parse("Interval", s))?;

        let scale: Scale = caps[5].parse()?;
        let start = Instant::from_date_time(&DateTime::parse(&caps[2], None)?, scale)?;
        let end = Instant::from_date_time(&DateTime::parse(&caps[3], None)?, scale)?;
        let interval_type = IntervalType::from_bounds(&caps[1] == "[", &caps[4] == "]");

        Self::new(start, end, interval_type)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_string_in(self.start.scale()) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{} - {}", self.start, self.end),
        }
    }
}

impl FromStr for Interval {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        Interval::parse(s)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
