//! Time module for astronomical time scales
//!
//! This module provides a nanosecond-exact representation of instants anchored
//! at J2000.0, durations between them, and conversion between the TT, TAI, UTC
//! and GPST time scales, including the historical leap-second schedule.
//!
//! Every [`Instant`] is stored as an [`EpochCount`] in TT. Construction from a
//! calendar date, a Julian date or the wall clock converts into TT through
//! [`convert`]; reading back out converts from TT into the requested scale.

pub mod calendar;
pub mod conversion;
pub mod count;
pub mod date_time;
pub mod duration;
pub mod errors;
pub mod instant;
pub mod interval;
pub mod leap_seconds;
pub mod scale;

pub use conversion::convert;
pub use count::EpochCount;
pub use date_time::{DateTime, DateTimeFormat};
pub use duration::{Duration, DurationFormat};
pub use errors::{Result, TimeError};
pub use instant::Instant;
pub use interval::{Interval, IntervalType};
pub use scale::Scale;
