//! Julian Day Number and Gregorian calendar date conversion
//!
//! Integer day arithmetic behind the Julian date views of [`DateTime`].
//! Both directions use the proleptic Gregorian calendar and are valid for
//! non-negative Julian Day Numbers.
//!
//! [`DateTime`]: super::DateTime

/// Convert a Julian Day Number to a calendar date (year, month, day)
pub fn compute_calendar_date(jd_integer: i64) -> (i32, u32, u32) {
    // See the Explanatory Supplement to the Astronomical Almanac 15.11.
    let f = jd_integer + 1401 + ((4 * jd_integer + 274_277) / 146_097 * 3 / 4 - 38);
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year as i32, month as u32, day as u32)
}

/// Convert a calendar date to its Julian Day Number
///
/// The Julian Day Number labels the day starting at noon of the given date.
pub fn compute_julian_day(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let janfeb = if month < 3 { 1 } else { 0 };

    1461 * (year + 4800 - janfeb) / 4 + 367 * (month - 2 + 12 * janfeb) / 12
        - 3 * ((year + 4900 - janfeb) / 100) / 4
        - 32075
        + day
}
