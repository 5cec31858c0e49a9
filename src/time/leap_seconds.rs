//! Leap-second (TAI − UTC) tables
//!
//! The historical schedule is compiled in as the list of UTC instants at which
//! a new whole-second TAI − UTC offset took effect. From it four range tables
//! are derived once: for each side of the epoch, one indexed by UTC magnitude
//! (used for UTC → TAI) and one indexed by TAI magnitude (used for TAI → UTC).
//! The TAI tables are shifted by the offset in force, so that an inserted
//! leap second maps back onto the last UTC second before the change.

use lazy_static::lazy_static;
use log::debug;

use super::count::EpochCount;
use super::errors::{Result, TimeError};
use crate::constants::{NS_PER_S, TAI_MINUS_UTC_AT_J2000_S, TAI_MINUS_UTC_BEFORE_1972_S};

/// UTC seconds from J2000 at which TAI − UTC changes, with the new value in seconds
const LEAP_SECOND_SCHEDULE: [(i64, i64); 27] = [
    (-867_931_200, 11), // 1972-07-01
    (-852_033_600, 12), // 1973-01-01
    (-820_497_600, 13), // 1974-01-01
    (-788_961_600, 14), // 1975-01-01
    (-757_425_600, 15), // 1976-01-01
    (-725_803_200, 16), // 1977-01-01
    (-694_267_200, 17), // 1978-01-01
    (-662_731_200, 18), // 1979-01-01
    (-631_195_200, 19), // 1980-01-01
    (-583_934_400, 20), // 1981-07-01
    (-552_398_400, 21), // 1982-07-01
    (-520_862_400, 22), // 1983-07-01
    (-457_704_000, 23), // 1985-07-01
    (-378_734_400, 24), // 1988-01-01
    (-315_576_000, 25), // 1990-01-01
    (-284_040_000, 26), // 1991-01-01
    (-236_779_200, 27), // 1992-07-01
    (-205_243_200, 28), // 1993-07-01
    (-173_707_200, 29), // 1994-07-01
    (-126_273_600, 30), // 1996-01-01
    (-79_012_800, 31),  // 1997-07-01
    (-31_579_200, 32),  // 1999-01-01
    (189_345_600, 33),  // 2006-01-01
    (284_040_000, 34),  // 2009-01-01
    (394_372_800, 35),  // 2012-07-01
    (488_980_800, 36),  // 2015-07-01
    (536_500_800, 37),  // 2017-01-01
];

/// Largest pre-epoch magnitude covered by the tables (mid 1968)
pub const PRE_EPOCH_FLOOR_NS: u64 = 999_999_999_999_999_999;

/// Span of epoch-count magnitudes sharing one TAI − UTC offset
///
/// Post-epoch ranges are `[start, end)`, pre-epoch ranges are `(start, end]`,
/// both measured away from the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeapSecondRange {
    pub start: u64,
    pub end: u64,
    /// TAI − UTC in seconds
    pub offset_s: i64,
}

#[derive(Debug)]
struct LeapSecondTables {
    utc_post_epoch: Vec<LeapSecondRange>,
    tai_post_epoch: Vec<LeapSecondRange>,
    utc_pre_epoch: Vec<LeapSecondRange>,
    tai_pre_epoch: Vec<LeapSecondRange>,
}

lazy_static! {
    static ref TABLES: LeapSecondTables = LeapSecondTables::from_schedule(&LEAP_SECOND_SCHEDULE);
}

fn seconds_to_ns(seconds: i64) -> u64 {
    seconds.unsigned_abs() * NS_PER_S as u64
}

impl LeapSecondTables {
    fn from_schedule(schedule: &[(i64, i64)]) -> Self {
        let post: Vec<(u64, i64)> = schedule
            .iter()
            .filter(|(s, _)| *s > 0)
            .map(|&(s, offset)| (seconds_to_ns(s), offset))
            .collect();
        // nearest the epoch first
        let pre: Vec<(u64, i64)> = schedule
            .iter()
            .rev()
            .filter(|(s, _)| *s < 0)
            .map(|&(s, offset)| (seconds_to_ns(s), offset))
            .collect();

        let mut utc_post_epoch = Vec::with_capacity(post.len() + 1);
        let mut tai_post_epoch = Vec::with_capacity(post.len() + 1);
        let (mut utc_start, mut tai_start) = (0u64, 0u64);
        let mut offset = TAI_MINUS_UTC_AT_J2000_S;
        for &(boundary, new_offset) in &post {
            let tai_end = boundary + seconds_to_ns(offset);
            utc_post_epoch.push(LeapSecondRange {
                start: utc_start,
                end: boundary,
                offset_s: offset,
            });
            tai_post_epoch.push(LeapSecondRange {
                start: tai_start,
                end: tai_end,
                offset_s: offset,
            });
            utc_start = boundary;
            tai_start = tai_end;
            offset = new_offset;
        }
        utc_post_epoch.push(LeapSecondRange {
            start: utc_start,
            end: u64::MAX,
            offset_s: offset,
        });
        tai_post_epoch.push(LeapSecondRange {
            start: tai_start,
            end: u64::MAX,
            offset_s: offset,
        });

        let mut utc_pre_epoch = Vec::with_capacity(pre.len() + 1);
        let mut tai_pre_epoch = Vec::with_capacity(pre.len() + 1);
        let (mut utc_start, mut tai_start) = (0u64, 0u64);
        for (i, &(boundary, offset)) in pre.iter().enumerate() {
            let earlier_offset = pre
                .get(i + 1)
                .map(|&(_, o)| o)
                .unwrap_or(TAI_MINUS_UTC_BEFORE_1972_S);
            let tai_end = boundary - seconds_to_ns(earlier_offset);
            utc_pre_epoch.push(LeapSecondRange {
                start: utc_start,
                end: boundary,
                offset_s: offset,
            });
            tai_pre_epoch.push(LeapSecondRange {
                start: tai_start,
                end: tai_end,
                offset_s: offset,
            });
            utc_start = boundary;
            tai_start = tai_end;
        }
        utc_pre_epoch.push(LeapSecondRange {
            start: utc_start,
            end: PRE_EPOCH_FLOOR_NS,
            offset_s: TAI_MINUS_UTC_BEFORE_1972_S,
        });
        tai_pre_epoch.push(LeapSecondRange {
            start: tai_start,
            end: PRE_EPOCH_FLOOR_NS,
            offset_s: TAI_MINUS_UTC_BEFORE_1972_S,
        });

        debug!(
            "Built leap-second tables: {} post-epoch and {} pre-epoch ranges",
            utc_post_epoch.len(),
            utc_pre_epoch.len()
        );

        Self {
            utc_post_epoch,
            tai_post_epoch,
            utc_pre_epoch,
            tai_pre_epoch,
        }
    }
}

// The latest range has no upper bound, so any magnitude past its start
// takes the current offset.
fn lookup_post_epoch(ranges: &[LeapSecondRange], magnitude: u64) -> Result<i64> {
    ranges
        .iter()
        .rev()
        .find(|range| magnitude >= range.start)
        .map(|range| range.offset_s)
        .ok_or_else(|| TimeError::out_of_range("Leap second table"))
}

fn lookup_pre_epoch(ranges: &[LeapSecondRange], magnitude: u64) -> Result<i64> {
    ranges
        .iter()
        .find(|range| range.start < magnitude && magnitude <= range.end)
        .map(|range| range.offset_s)
        .ok_or_else(|| {
            TimeError::OutOfRange(format!(
                "Epoch count [-{}] before the leap second table",
                magnitude
            ))
        })
}

/// TAI − UTC in seconds at a UTC epoch count
pub fn tai_minus_utc_at_utc(utc: EpochCount) -> Result<i64> {
    match utc {
        EpochCount::After(m) | EpochCount::Before(m @ 0) => {
            lookup_post_epoch(&TABLES.utc_post_epoch, m)
        }
        EpochCount::Before(m) => lookup_pre_epoch(&TABLES.utc_pre_epoch, m),
    }
}

/// TAI − UTC in seconds at a TAI epoch count
pub fn tai_minus_utc_at_tai(tai: EpochCount) -> Result<i64> {
    match tai {
        EpochCount::After(m) | EpochCount::Before(m @ 0) => {
            lookup_post_epoch(&TABLES.tai_post_epoch, m)
        }
        EpochCount::Before(m) => lookup_pre_epoch(&TABLES.tai_pre_epoch, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn s(seconds: u64) -> u64 {
        seconds * NS_PER_S as u64
    }

    #[test]
    fn test_tables_are_contiguous() {
        for table in [
            &TABLES.utc_post_epoch,
            &TABLES.tai_post_epoch,
            &TABLES.utc_pre_epoch,
            &TABLES.tai_pre_epoch,
        ] {
            assert_eq!(table[0].start, 0);
            for pair in table.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(pair[0].start < pair[0].end);
            }
        }
        assert_eq!(TABLES.utc_post_epoch.len(), 6);
        assert_eq!(TABLES.utc_pre_epoch.len(), 23);
        assert_eq!(TABLES.tai_pre_epoch.last().unwrap().end, PRE_EPOCH_FLOOR_NS);
    }

    #[test]
    fn test_offset_at_epoch() {
        assert_eq!(tai_minus_utc_at_utc(EpochCount::EPOCH).unwrap(), 32);
        assert_eq!(tai_minus_utc_at_tai(EpochCount::EPOCH).unwrap(), 32);
        assert_eq!(tai_minus_utc_at_utc(EpochCount::Before(0)).unwrap(), 32);
    }

    #[rstest]
    // 2006-01-01 00:00:00 UTC
    #[case(EpochCount::After(s(189_345_600) - 1), 32)]
    #[case(EpochCount::After(s(189_345_600)), 33)]
    // 2017-01-01 and later is clamped to the latest offset
    #[case(EpochCount::After(s(536_500_800)), 37)]
    #[case(EpochCount::After(u64::MAX), 37)]
    // 1999-01-01 00:00:00 UTC
    #[case(EpochCount::Before(s(31_579_200)), 32)]
    #[case(EpochCount::Before(s(31_579_200) + 1), 31)]
    // 1972-07-01 00:00:00 UTC
    #[case(EpochCount::Before(s(867_931_200)), 11)]
    #[case(EpochCount::Before(s(867_931_200) + 1), 10)]
    #[case(EpochCount::Before(PRE_EPOCH_FLOOR_NS), 10)]
    fn test_utc_lookup(#[case] utc: EpochCount, #[case] expected: i64) {
        assert_eq!(tai_minus_utc_at_utc(utc).unwrap(), expected);
    }

    #[rstest]
    // the inserted second 2005-12-31 23:59:60 belongs to the new offset
    #[case(EpochCount::After(s(189_345_600 + 32) - 1), 32)]
    #[case(EpochCount::After(s(189_345_600 + 32)), 33)]
    // the inserted second 1998-12-31 23:59:60
    #[case(EpochCount::Before(s(31_579_200 - 31)), 32)]
    #[case(EpochCount::Before(s(31_579_200 - 31) + 1), 31)]
    fn test_tai_lookup(#[case] tai: EpochCount, #[case] expected: i64) {
        assert_eq!(tai_minus_utc_at_tai(tai).unwrap(), expected);
    }

    #[test]
    fn test_before_floor_fails() {
        let too_early = EpochCount::Before(PRE_EPOCH_FLOOR_NS + 1);
        assert!(matches!(
            tai_minus_utc_at_utc(too_early),
            Err(TimeError::OutOfRange(_))
        ));
        assert!(tai_minus_utc_at_tai(too_early).is_err());
    }
}
