//! Time abstraction traits for platform-agnostic timing.
//!
//! Every component in this crate paces itself by comparing `now` against a
//! stored baseline instant. Nothing ever spins on a countdown.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;

    /// Returns true once at least `threshold` has passed since `baseline`.
    fn elapsed_at_least(&self, baseline: I, threshold: I::Duration) -> bool {
        elapsed_at_least(self.now(), baseline, threshold)
    }
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq + core::fmt::Debug {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Wrapping counters must use wrapping subtraction here so that a counter
    /// rollover never produces a bogus "negative" elapsed time.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;

    /// Subtracts duration from instant, returns None on underflow.
    fn checked_sub(self, duration: Self::Duration) -> Option<Self>;
}

/// The "elapsed >= threshold" predicate shared by every component.
#[inline]
pub fn elapsed_at_least<I: TimeInstant>(now: I, baseline: I, threshold: I::Duration) -> bool {
    now.duration_since(baseline).as_millis() >= threshold.as_millis()
}

/// Time left until `baseline + period`, or `ZERO` if that point has passed.
#[inline]
pub fn remaining<I: TimeInstant>(now: I, baseline: I, period: I::Duration) -> I::Duration {
    period.saturating_sub(now.duration_since(baseline))
}

/// True when `instant` lies strictly before `reference`.
///
/// Works for wrapping counters, where going backwards shows up as a huge
/// forward distance, and for instants whose `duration_since` saturates at
/// zero.
#[inline]
pub(crate) fn is_before<I: TimeInstant>(instant: I, reference: I) -> bool {
    let back = reference.duration_since(instant).as_millis();
    let forward = instant.duration_since(reference).as_millis();
    back > 0 && (forward == 0 || back < forward)
}

/// The later of two instants, in the sense of [`is_before`].
#[inline]
pub(crate) fn latest<I: TimeInstant>(a: I, b: I) -> I {
    if is_before(a, b) { b } else { a }
}

/// Moves a deadline baseline forward by one period.
///
/// Falls back to `now` when the instant type cannot represent the sum.
#[inline]
pub(crate) fn advance_baseline<I: TimeInstant>(baseline: I, period: I::Duration, now: I) -> I {
    baseline.checked_add(period).unwrap_or(now)
}

/// Millisecond duration used with [`Tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Creates a duration from milliseconds. Usable in `const` contexts.
    pub const fn new(millis: u32) -> Self {
        Millis(millis)
    }
}

impl TimeDuration for Millis {
    const ZERO: Self = Millis(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        Millis(millis.min(u32::MAX as u64) as u32)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Millis(self.0.saturating_sub(other.0))
    }
}

/// A 32-bit millisecond tick counter that wraps after ~49.7 days.
///
/// Elapsed time is computed with wrapping subtraction, so comparisons stay
/// correct across a rollover as long as the interval is shorter than the
/// counter period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    /// Returns the raw counter value in milliseconds.
    pub const fn as_millis(&self) -> u32 {
        self.0
    }
}

impl TimeInstant for Tick {
    type Duration = Millis;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Millis(self.0.wrapping_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(Tick(self.0.wrapping_add(duration.0)))
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        Some(Tick(self.0.wrapping_sub(duration.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_since_survives_counter_wrap() {
        let before = Tick(u32::MAX - 5);
        let after = Tick(10);
        assert_eq!(after.duration_since(before), Millis(16));
    }

    #[test]
    fn elapsed_predicate_is_inclusive() {
        assert!(!elapsed_at_least(Tick(149), Tick(100), Millis(50)));
        assert!(elapsed_at_least(Tick(150), Tick(100), Millis(50)));
        assert!(elapsed_at_least(Tick(3), Tick(u32::MAX - 46), Millis(50)));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        assert_eq!(remaining(Tick(120), Tick(100), Millis(50)), Millis(30));
        assert_eq!(remaining(Tick(500), Tick(100), Millis(50)), Millis::ZERO);
    }

    #[test]
    fn ordering_survives_counter_wrap() {
        assert!(is_before(Tick(999), Tick(1000)));
        assert!(!is_before(Tick(1000), Tick(999)));
        assert!(!is_before(Tick(5), Tick(5)));
        assert!(is_before(Tick(u32::MAX - 3), Tick(4)));
        assert_eq!(latest(Tick(4), Tick(u32::MAX - 3)), Tick(4));
        assert_eq!(latest(Tick(999), Tick(1000)), Tick(1000));
    }

    #[test]
    fn millis_from_large_value_saturates() {
        assert_eq!(Millis::from_millis(u64::MAX), Millis(u32::MAX));
    }
}
