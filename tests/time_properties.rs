//! End-to-end properties of the time system across scales and leap seconds

use astrotime::{DateTime, Duration, Instant, Scale, TimeError};
use rstest::rstest;
use std::cmp::Ordering;

const SUPPORTED: [Scale; 4] = [Scale::TT, Scale::TAI, Scale::UTC, Scale::GPST];

#[allow(clippy::too_many_arguments)]
fn date_time(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32, us: u32, ns: u32) -> DateTime {
    DateTime::new(y, mo, d, h, mi, s, ms, us, ns).unwrap()
}

#[test]
fn test_calendar_round_trip_in_every_supported_scale() {
    for scale in SUPPORTED {
        for year in 1970..=2030 {
            for sample in [
                date_time(year, 1, 1, 0, 0, 0, 0, 0, 0),
                date_time(year, 3, 15, 6, 30, 15, 123, 456, 789),
                date_time(year, 6, 30, 23, 59, 59, 999, 999, 999),
                date_time(year, 7, 1, 0, 0, 0, 0, 0, 1),
                date_time(year, 12, 31, 23, 59, 59, 0, 0, 0),
            ] {
                let instant = Instant::from_date_time(&sample, scale).unwrap();
                assert_eq!(
                    instant.to_date_time(scale).unwrap(),
                    sample,
                    "round trip of {} in {}",
                    sample,
                    scale
                );
            }
        }
    }
}

#[test]
fn test_epoch_reads_back_in_each_scale() {
    let epoch = Instant::epoch();
    assert_eq!(
        epoch.to_date_time(Scale::TT).unwrap(),
        date_time(2000, 1, 1, 12, 0, 0, 0, 0, 0)
    );
    assert_eq!(
        epoch.to_date_time(Scale::TAI).unwrap(),
        date_time(2000, 1, 1, 11, 59, 27, 816, 0, 0)
    );
    assert_eq!(
        epoch.to_date_time(Scale::UTC).unwrap(),
        date_time(2000, 1, 1, 11, 58, 55, 816, 0, 0)
    );
}

#[rstest]
#[case(1972, 6, 30)]
#[case(1972, 12, 31)]
#[case(1973, 12, 31)]
#[case(1974, 12, 31)]
#[case(1975, 12, 31)]
#[case(1976, 12, 31)]
#[case(1977, 12, 31)]
#[case(1978, 12, 31)]
#[case(1979, 12, 31)]
#[case(1981, 6, 30)]
#[case(1982, 6, 30)]
#[case(1983, 6, 30)]
#[case(1985, 6, 30)]
#[case(1987, 12, 31)]
#[case(1989, 12, 31)]
#[case(1990, 12, 31)]
#[case(1992, 6, 30)]
#[case(1993, 6, 30)]
#[case(1994, 6, 30)]
#[case(1995, 12, 31)]
#[case(1997, 6, 30)]
#[case(1998, 12, 31)]
#[case(2005, 12, 31)]
#[case(2008, 12, 31)]
#[case(2012, 6, 30)]
#[case(2015, 6, 30)]
#[case(2016, 12, 31)]
fn test_leap_second_is_absorbed(#[case] year: i32, #[case] month: u32, #[case] day: u32) {
    let last_second = date_time(year, month, day, 23, 59, 59, 0, 0, 0);
    let t = Instant::from_date_time(&last_second, Scale::UTC).unwrap();
    let one_second = Duration::from_seconds(1.0);

    let leap = (t + one_second).unwrap();
    assert_eq!(leap.to_date_time(Scale::UTC).unwrap(), last_second);
    assert_eq!(leap.leap_second_count().unwrap(), t.leap_second_count().unwrap());

    let next = (leap + one_second).unwrap();
    assert_eq!(next.leap_second_count().unwrap(), t.leap_second_count().unwrap() + 1);
    let next_day = next.to_date_time(Scale::UTC).unwrap();
    assert_eq!((next_day.hour(), next_day.minute(), next_day.second()), (0, 0, 0));
    assert_eq!(next_day.day(), 1);

    // TT keeps counting through the inserted second
    let tt_before = t.to_date_time(Scale::TT).unwrap();
    let tt_leap = leap.to_date_time(Scale::TT).unwrap();
    assert_ne!(tt_before, tt_leap);
}

#[test]
fn test_civil_day_with_leap_second_lasts_86401_seconds() {
    let start = Instant::from_date_time(&date_time(2016, 12, 31, 0, 0, 0, 0, 0, 0), Scale::UTC).unwrap();
    let end = Instant::from_date_time(&date_time(2017, 1, 1, 0, 0, 0, 0, 0, 0), Scale::UTC).unwrap();
    assert_eq!((end - start).unwrap(), Duration::from_seconds(86_401.0));
}

#[test]
fn test_ordering_is_total_for_defined_instants() {
    let mut instants = Vec::new();
    for scale in SUPPORTED {
        for sample in [
            date_time(1999, 12, 31, 23, 59, 59, 0, 0, 0),
            date_time(2000, 1, 1, 11, 58, 55, 816, 0, 0),
            date_time(2000, 1, 1, 12, 0, 0, 0, 0, 0),
            date_time(2016, 12, 31, 23, 59, 59, 0, 0, 0),
        ] {
            instants.push(Instant::from_date_time(&sample, scale).unwrap());
        }
    }

    for a in &instants {
        for b in &instants {
            let ordering = a.compare(b).unwrap();
            let holds = [a < b, a == b, a > b];
            assert_eq!(holds.iter().filter(|h| **h).count(), 1);
            assert_eq!(ordering == Ordering::Equal, a == b);
            assert_eq!(b.compare(a).unwrap(), ordering.reverse());
        }
    }

    let undefined = Instant::undefined();
    assert!(undefined != undefined);
    for a in &instants {
        assert!(*a != undefined);
        assert!(a.partial_cmp(&undefined).is_none());
    }
}

#[test]
fn test_arithmetic_inverts_across_epoch() {
    let near_epoch = [
        Instant::epoch(),
        Instant::from_date_time(&date_time(2000, 1, 1, 11, 59, 59, 999, 999, 999), Scale::TT).unwrap(),
        Instant::from_date_time(&date_time(2000, 1, 1, 12, 0, 0, 0, 0, 1), Scale::UTC).unwrap(),
        Instant::from_date_time(&date_time(1999, 12, 31, 0, 0, 0, 0, 0, 0), Scale::GPST).unwrap(),
    ];
    let displacements = [
        Duration::from_nanoseconds(1),
        Duration::from_nanoseconds(-1),
        Duration::from_days(2.0),
        Duration::from_days(-2.0),
        Duration::from_seconds(64.184),
        Duration::from_weeks(-520.0),
    ];

    for a in near_epoch {
        for d in displacements {
            assert_eq!(((a + d).unwrap() - d).unwrap(), a);
            assert_eq!(((a - d).unwrap() + d).unwrap(), a);
            assert_eq!(((a + d).unwrap() - a).unwrap(), d);
        }
    }
}

#[test]
fn test_failure_scenarios() {
    let d = date_time(2000, 1, 1, 0, 0, 0, 0, 0, 0);

    assert!(matches!(
        Instant::from_date_time(&d, Scale::Undefined),
        Err(TimeError::Wrong(_))
    ));
    for scale in SUPPORTED {
        assert!(Instant::from_date_time(&date_time(1969, 12, 31, 0, 0, 0, 0, 0, 0), scale).is_err());
        assert!(Instant::from_date_time(&date_time(2031, 1, 1, 0, 0, 0, 0, 0, 0), scale).is_err());
    }

    for scale in [
        Scale::UT1,
        Scale::TCG,
        Scale::TCB,
        Scale::TDB,
        Scale::GMST,
        Scale::GST,
        Scale::GLST,
        Scale::BDT,
        Scale::QZSST,
        Scale::IRNSST,
    ] {
        assert!(matches!(
            Instant::from_date_time(&d, scale),
            Err(TimeError::NotImplemented(_))
        ));
        assert!(matches!(
            Instant::epoch().to_date_time(scale),
            Err(TimeError::NotImplemented(_))
        ));
        assert!(Instant::epoch().in_scale(scale).is_err());
    }

    assert!((Duration::zero() / 0.0).is_err());

    let undefined = Instant::undefined();
    assert!(undefined.compare(&undefined).is_err());
    assert!(undefined.partial_cmp(&undefined).is_none());
    assert!(undefined != undefined);
}
