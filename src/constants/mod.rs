//! Constants module for time scale calculations

// Time units
/// Nanoseconds in a microsecond
pub const NS_PER_US: i64 = 1_000;
/// Nanoseconds in a millisecond
pub const NS_PER_MS: i64 = 1_000_000;
/// Nanoseconds in a second
pub const NS_PER_S: i64 = 1_000_000_000;
/// Nanoseconds in a minute
pub const NS_PER_MIN: i64 = 60 * NS_PER_S;
/// Nanoseconds in an hour
pub const NS_PER_HOUR: i64 = 60 * NS_PER_MIN;
/// Nanoseconds in a day
pub const NS_PER_DAY: i64 = 24 * NS_PER_HOUR;
/// Nanoseconds in a week
pub const NS_PER_WEEK: i64 = 7 * NS_PER_DAY;
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;

// Time scale offsets
/// TT minus TAI in nanoseconds
pub const TT_MINUS_TAI_NS: u64 = 32_184_000_000;
/// TAI minus GPS time in nanoseconds
pub const TAI_MINUS_GPST_NS: u64 = 19_000_000_000;
/// TAI minus UTC at J2000, in seconds
pub const TAI_MINUS_UTC_AT_J2000_S: i64 = 32;
/// TAI minus UTC before the first leap second (1972-07-01), in seconds
pub const TAI_MINUS_UTC_BEFORE_1972_S: i64 = 10;

// Julian dates
/// Julian Day Number of 1858-11-17, the day MJD 0 falls on
pub const MJD_EPOCH_JDN: i64 = 2_400_001;

// Calendar constants
/// Earliest calendar year accepted when building an instant from a date
pub const MIN_CALENDAR_YEAR: i32 = 1970;
/// Latest calendar year accepted when building an instant from a date
pub const MAX_CALENDAR_YEAR: i32 = 2030;
/// Seconds between 1970-01-01 00:00:00 and J2000 (2000-01-01 12:00:00)
pub const UNIX_TO_J2000_S: i64 = 946_728_000;
/// Seconds between 1970-01-01 00:00:00 and the GPS epoch (1980-01-06 00:00:00)
pub const UNIX_TO_GPS_EPOCH_S: i64 = 315_964_800;
/// Seconds between 1970-01-01 00:00:00 and the MJD epoch (1858-11-17 00:00:00)
pub const UNIX_TO_MJD_EPOCH_S: i64 = -3_506_716_800;
