//! # Tick Arithmetic
//!
//! The tick counter is a free-running unsigned integer that wraps at its
//! type's maximum. Every comparison against a due time goes through
//! [`is_due`], which interprets the wrapping difference as a signed value
//! of the same width. This is correct as long as no two compared instants
//! are more than half the counter range apart, which [`MAX_INTERVAL`]
//! guarantees.

use crate::config::{DEFAULT_INTERVAL, MAX_INTERVAL};
use crate::error::{SchedError, SchedResult};

/// Tick counter value. 32-bit by default, 64-bit with the `tick-u64` feature.
#[cfg(not(feature = "tick-u64"))]
pub type Tick = u32;

/// Tick counter value. 32-bit by default, 64-bit with the `tick-u64` feature.
#[cfg(feature = "tick-u64")]
pub type Tick = u64;

#[cfg(not(feature = "tick-u64"))]
type SignedTick = i32;

#[cfg(feature = "tick-u64")]
type SignedTick = i64;

/// Returns true once `now` has reached or passed `due`, across rollover.
#[inline]
pub const fn is_due(now: Tick, due: Tick) -> bool {
    (now.wrapping_sub(due) as SignedTick) >= 0
}

/// Absolute tick `interval` ticks after `now`, wrapping at the counter width.
#[inline]
pub fn deadline(now: Tick, interval: u32) -> Tick {
    now.wrapping_add(Tick::from(interval))
}

/// Strict interval check: `1..=MAX_INTERVAL`.
pub const fn validate_interval(interval: u32) -> SchedResult<u32> {
    if interval >= 1 && interval <= MAX_INTERVAL {
        Ok(interval)
    } else {
        Err(SchedError::InvalidInterval)
    }
}

/// Interval policy of the scheduler API: out-of-range values are replaced
/// by [`DEFAULT_INTERVAL`] rather than rejected.
///
/// Returns the interval to use and whether a substitution happened.
pub fn clamp_interval(interval: u32) -> (u32, bool) {
    match validate_interval(interval) {
        Ok(interval) => (interval, false),
        Err(_) => (DEFAULT_INTERVAL, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_on_exact_tick() {
        assert!(is_due(10, 10));
        assert!(is_due(11, 10));
        assert!(!is_due(9, 10));
    }

    #[test]
    fn test_due_across_rollover() {
        let due = deadline(Tick::MAX - 1, 5);
        assert_eq!(due, 3);
        assert!(!is_due(Tick::MAX, due));
        assert!(!is_due(0, due));
        assert!(!is_due(2, due));
        assert!(is_due(3, due));
        assert!(is_due(4, due));
    }

    #[test]
    fn test_due_just_before_rollover() {
        let due = deadline(Tick::MAX - 10, 9);
        assert_eq!(due, Tick::MAX - 1);
        assert!(!is_due(Tick::MAX - 2, due));
        assert!(is_due(Tick::MAX - 1, due));
        // Overdue after the counter wrapped is still due
        assert!(is_due(1, due));
    }

    #[test]
    fn test_max_interval_is_never_mistaken_for_past() {
        let now = Tick::MAX - 100;
        let due = deadline(now, MAX_INTERVAL);
        assert!(!is_due(now, due));
        assert!(!is_due(now.wrapping_add(1), due));
    }

    #[test]
    fn test_validate_interval() {
        assert_eq!(validate_interval(1), Ok(1));
        assert_eq!(validate_interval(MAX_INTERVAL), Ok(MAX_INTERVAL));
        assert_eq!(validate_interval(0), Err(SchedError::InvalidInterval));
        assert_eq!(
            validate_interval(MAX_INTERVAL + 1),
            Err(SchedError::InvalidInterval)
        );
    }

    #[test]
    fn test_clamp_interval_substitutes_default() {
        assert_eq!(clamp_interval(25), (25, false));
        assert_eq!(clamp_interval(0), (DEFAULT_INTERVAL, true));
        assert_eq!(clamp_interval(u32::MAX), (DEFAULT_INTERVAL, true));
    }
}
