//! Epoch-relative nanosecond counter
//!
//! An [`EpochCount`] locates a point in time as a nanosecond magnitude on one
//! side of the J2000 epoch. Arithmetic branches explicitly on the side of
//! each operand instead of relying on a signed integer, so every step that
//! would leave the `u64` magnitude range is reported instead of wrapping.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use super::errors::{Result, TimeError};

/// Directed nanosecond distance from the epoch
///
/// A zero magnitude is always the epoch itself; `Before(0)` and `After(0)`
/// compare and hash equal.
#[derive(Debug, Clone, Copy)]
pub enum EpochCount {
    /// `epoch - magnitude`
    Before(u64),
    /// `epoch + magnitude`
    After(u64),
}

impl EpochCount {
    /// The epoch itself
    pub const EPOCH: EpochCount = EpochCount::After(0);

    /// Build a count from a magnitude and a side flag
    pub fn new(magnitude: u64, is_post_epoch: bool) -> Self {
        if is_post_epoch || magnitude == 0 {
            EpochCount::After(magnitude)
        } else {
            EpochCount::Before(magnitude)
        }
    }

    /// Build a count from a signed nanosecond offset
    pub fn from_nanoseconds(nanoseconds: i64) -> Self {
        EpochCount::new(nanoseconds.unsigned_abs(), nanoseconds >= 0)
    }

    pub fn magnitude(&self) -> u64 {
        match *self {
            EpochCount::Before(m) | EpochCount::After(m) => m,
        }
    }

    /// True on the epoch and after it
    pub fn is_post_epoch(&self) -> bool {
        matches!(self.canonical(), EpochCount::After(_))
    }

    /// Signed nanosecond offset from the epoch
    pub fn to_nanoseconds(&self) -> Result<i64> {
        signed(self.magnitude(), self.is_post_epoch())
    }

    /// Move the count by `magnitude` nanoseconds, forward in time when `forward` is set
    ///
    /// When the displacement does not exceed the current magnitude the result
    /// stays on the same side of the epoch. Otherwise a displacement toward
    /// the epoch crosses it and the remainder lands on the other side.
    pub fn shifted(self, magnitude: u64, forward: bool) -> Result<Self> {
        let current = self.magnitude();
        let post = self.is_post_epoch();

        if post == forward {
            current
                .checked_add(magnitude)
                .map(|m| EpochCount::new(m, post))
                .ok_or_else(|| TimeError::out_of_range("Epoch count"))
        } else if magnitude <= current {
            Ok(EpochCount::new(current - magnitude, post))
        } else {
            Ok(EpochCount::new(magnitude - current, forward))
        }
    }

    /// Displace by a signed number of nanoseconds
    pub fn checked_add_nanoseconds(self, nanoseconds: i64) -> Result<Self> {
        self.shifted(nanoseconds.unsigned_abs(), nanoseconds >= 0)
    }

    /// Displace by the negation of a signed number of nanoseconds
    pub fn checked_sub_nanoseconds(self, nanoseconds: i64) -> Result<Self> {
        self.shifted(nanoseconds.unsigned_abs(), nanoseconds < 0)
    }

    /// Signed nanoseconds from `other` to `self`
    pub fn nanoseconds_since(self, other: EpochCount) -> Result<i64> {
        let overflow = || TimeError::out_of_range("Epoch count difference");

        match (self.canonical(), other.canonical()) {
            (EpochCount::After(a), EpochCount::After(b)) => {
                if a >= b {
                    signed(a - b, true)
                } else {
                    signed(b - a, false)
                }
            }
            (EpochCount::Before(a), EpochCount::Before(b)) => {
                if b >= a {
                    signed(b - a, true)
                } else {
                    signed(a - b, false)
                }
            }
            (EpochCount::After(a), EpochCount::Before(b)) => {
                signed(a.checked_add(b).ok_or_else(overflow)?, true)
            }
            (EpochCount::Before(a), EpochCount::After(b)) => {
                signed(a.checked_add(b).ok_or_else(overflow)?, false)
            }
        }
    }

    fn canonical(self) -> Self {
        match self {
            EpochCount::Before(0) => EpochCount::After(0),
            other => other,
        }
    }
}

fn signed(magnitude: u64, positive: bool) -> Result<i64> {
    let value = if positive {
        magnitude as i128
    } else {
        -(magnitude as i128)
    };
    i64::try_from(value).map_err(|_| TimeError::out_of_range("Nanosecond count"))
}

impl Default for EpochCount {
    fn default() -> Self {
        EpochCount::EPOCH
    }
}

impl From<i64> for EpochCount {
    fn from(nanoseconds: i64) -> Self {
        EpochCount::from_nanoseconds(nanoseconds)
    }
}

impl PartialEq for EpochCount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EpochCount {}

impl PartialOrd for EpochCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EpochCount {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.canonical(), other.canonical()) {
            (EpochCount::After(a), EpochCount::After(b)) => a.cmp(&b),
            (EpochCount::Before(a), EpochCount::Before(b)) => b.cmp(&a),
            (EpochCount::After(_), EpochCount::Before(_)) => Ordering::Greater,
            (EpochCount::Before(_), EpochCount::After(_)) => Ordering::Less,
        }
    }
}

impl Hash for EpochCount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_post_epoch().hash(state);
        self.magnitude().hash(state);
    }
}

impl Add<i64> for EpochCount {
    type Output = Result<EpochCount>;

    fn add(self, nanoseconds: i64) -> Self::Output {
        self.checked_add_nanoseconds(nanoseconds)
    }
}

impl Sub<i64> for EpochCount {
    type Output = Result<EpochCount>;

    fn sub(self, nanoseconds: i64) -> Self::Output {
        self.checked_sub_nanoseconds(nanoseconds)
    }
}

impl Add<EpochCount> for EpochCount {
    type Output = Result<EpochCount>;

    /// Treat `other` as a displacement from the epoch
    fn add(self, other: EpochCount) -> Self::Output {
        self.shifted(other.magnitude(), other.is_post_epoch())
    }
}

impl Sub<EpochCount> for EpochCount {
    type Output = Result<i64>;

    fn sub(self, other: EpochCount) -> Self::Output {
        self.nanoseconds_since(other)
    }
}

impl fmt::Display for EpochCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_post_epoch() { '+' } else { '-' };
        write!(f, "{}{}", sign, self.magnitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_zero_is_canonical() {
        assert_eq!(EpochCount::Before(0), EpochCount::After(0));
        assert!(EpochCount::Before(0).is_post_epoch());
        assert_eq!(EpochCount::new(0, false), EpochCount::After(0));
        assert_eq!(EpochCount::Before(0).to_string(), "+0");
    }

    #[rstest]
    #[case(EpochCount::After(10), 5, EpochCount::After(15))]
    #[case(EpochCount::After(10), -5, EpochCount::After(5))]
    #[case(EpochCount::After(10), -10, EpochCount::After(0))]
    #[case(EpochCount::After(10), -15, EpochCount::Before(5))]
    #[case(EpochCount::Before(10), -5, EpochCount::Before(15))]
    #[case(EpochCount::Before(10), 5, EpochCount::Before(5))]
    #[case(EpochCount::Before(10), 10, EpochCount::After(0))]
    #[case(EpochCount::Before(10), 15, EpochCount::After(5))]
    #[case(EpochCount::After(0), -7, EpochCount::Before(7))]
    #[case(EpochCount::After(0), 7, EpochCount::After(7))]
    fn test_addition_across_epoch(
        #[case] start: EpochCount,
        #[case] displacement: i64,
        #[case] expected: EpochCount,
    ) {
        assert_eq!((start + displacement).unwrap(), expected);
        assert_eq!((expected - displacement).unwrap(), start);
    }

    #[test]
    fn test_landing_on_epoch_is_post_epoch() {
        let landed = (EpochCount::Before(42) + 42).unwrap();
        assert!(matches!(landed, EpochCount::After(0)));
    }

    #[test]
    fn test_overflow() {
        assert!((EpochCount::After(u64::MAX) + 1).is_err());
        assert!((EpochCount::Before(u64::MAX) - 1).is_err());
        assert_eq!(
            (EpochCount::Before(u64::MAX) + i64::MAX).unwrap(),
            EpochCount::Before(u64::MAX - i64::MAX as u64)
        );
    }

    #[test]
    fn test_ordering() {
        let mut counts = vec![
            EpochCount::After(5),
            EpochCount::Before(3),
            EpochCount::After(0),
            EpochCount::Before(10),
            EpochCount::After(1),
        ];
        counts.sort();
        assert_eq!(
            counts,
            vec![
                EpochCount::Before(10),
                EpochCount::Before(3),
                EpochCount::After(0),
                EpochCount::After(1),
                EpochCount::After(5),
            ]
        );
        assert!(EpochCount::Before(1) < EpochCount::After(0));
        assert!(EpochCount::Before(u64::MAX) < EpochCount::Before(u64::MAX - 1));
    }

    #[rstest]
    #[case(EpochCount::After(10), EpochCount::After(4), 6)]
    #[case(EpochCount::After(4), EpochCount::After(10), -6)]
    #[case(EpochCount::Before(4), EpochCount::Before(10), 6)]
    #[case(EpochCount::Before(10), EpochCount::Before(4), -6)]
    #[case(EpochCount::After(4), EpochCount::Before(10), 14)]
    #[case(EpochCount::Before(4), EpochCount::After(10), -14)]
    #[case(EpochCount::Before(0), EpochCount::After(0), 0)]
    fn test_difference(#[case] a: EpochCount, #[case] b: EpochCount, #[case] expected: i64) {
        assert_eq!((a - b).unwrap(), expected);
        assert_eq!((b + expected).unwrap(), a);
    }

    #[test]
    fn test_difference_out_of_range() {
        assert!((EpochCount::After(u64::MAX) - EpochCount::After(0)).is_err());
        assert!((EpochCount::After(1 << 62) - EpochCount::Before(1 << 62)).is_err());
    }

    #[test]
    fn test_add_count_as_displacement() {
        let shifted = (EpochCount::After(3) + EpochCount::Before(8)).unwrap();
        assert_eq!(shifted, EpochCount::Before(5));
    }

    #[test]
    fn test_signed_conversions() {
        assert_eq!(EpochCount::from(-12).to_nanoseconds().unwrap(), -12);
        assert_eq!(
            EpochCount::from(i64::MIN).to_nanoseconds().unwrap(),
            i64::MIN
        );
        assert!(EpochCount::After(u64::MAX).to_nanoseconds().is_err());
        assert_eq!(EpochCount::Before(9).to_string(), "-9");
    }

    #[test]
    fn test_hash_matches_equality() {
        use std::collections::HashSet;

        let set: HashSet<EpochCount> = [EpochCount::Before(0), EpochCount::After(0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }
}
