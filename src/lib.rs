//! Astrotime: precise multi-scale time for astrodynamics
//!
//! This crate represents instants in time at nanosecond resolution relative to
//! the J2000.0 epoch and converts them losslessly between Terrestrial Time,
//! International Atomic Time, Coordinated Universal Time and GPS Time.
//!
//! ```
//! use astrotime::{DateTime, Instant, Scale};
//!
//! let epoch = Instant::epoch();
//! assert_eq!(
//!     epoch.to_date_time(Scale::UTC).unwrap(),
//!     DateTime::new(2000, 1, 1, 11, 58, 55, 816, 0, 0).unwrap()
//! );
//! ```

pub mod constants;
pub mod time;

// Re-export commonly used types
pub use time::{
    DateTime, DateTimeFormat, Duration, DurationFormat, EpochCount, Instant, Interval,
    IntervalType, Result, Scale, TimeError,
};
