//! Time-window debounce filter for raw button edges.

use crate::time::{TimeInstant, elapsed_at_least};
use crate::types::{ButtonLevel, StableEdge};

/// Turns raw edge notifications into one stable transition per actuation.
///
/// A raw observation is accepted only if the debounce window has elapsed
/// since the last accepted transition and the level differs from the
/// recorded stable level. Everything else is treated as bounce and dropped.
#[derive(Debug, Clone, Copy)]
pub struct DebounceFilter<I: TimeInstant> {
    window: I::Duration,
    stable: ButtonLevel,
    last_accepted: Option<I>,
}

impl<I: TimeInstant> DebounceFilter<I> {
    /// Creates a filter that starts in the released state.
    pub const fn new(window: I::Duration) -> Self {
        Self {
            window,
            stable: ButtonLevel::Released,
            last_accepted: None,
        }
    }

    /// Feeds one raw observation.
    ///
    /// # Returns
    /// * `Some(edge)` - a genuine transition to `raw_level`
    /// * `None` - bounce, or no change from the stable level
    pub fn observe(&mut self, raw_level: ButtonLevel, now: I) -> Option<StableEdge<I>> {
        if raw_level == self.stable {
            return None;
        }

        if let Some(last) = self.last_accepted {
            if !elapsed_at_least(now, last, self.window) {
                return None;
            }
        }

        self.stable = raw_level;
        self.last_accepted = Some(now);
        Some(StableEdge::new(raw_level, now))
    }

    /// The last accepted level.
    pub fn stable_level(&self) -> ButtonLevel {
        self.stable
    }

    /// The configured debounce window.
    pub fn window(&self) -> I::Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Millis, Tick};
    use ButtonLevel::{Pressed, Released};

    #[test]
    fn first_press_is_accepted_immediately() {
        let mut filter = DebounceFilter::<Tick>::new(Millis(50));
        assert_eq!(
            filter.observe(Pressed, Tick(7)),
            Some(StableEdge::new(Pressed, Tick(7)))
        );
        assert_eq!(filter.stable_level(), Pressed);
    }

    #[test]
    fn bounce_inside_window_yields_one_edge() {
        let mut filter = DebounceFilter::<Tick>::new(Millis(50));
        let raw = [(Pressed, 100), (Released, 102), (Pressed, 105), (Released, 111), (Pressed, 140)];

        let edges: usize = raw
            .iter()
            .filter_map(|&(level, t)| filter.observe(level, Tick(t)))
            .count();

        assert_eq!(edges, 1);
        assert_eq!(filter.stable_level(), Pressed);
    }

    #[test]
    fn same_level_is_never_reported_twice() {
        let mut filter = DebounceFilter::<Tick>::new(Millis(20));
        assert!(filter.observe(Pressed, Tick(0)).is_some());
        assert!(filter.observe(Pressed, Tick(500)).is_none());
        assert!(filter.observe(Released, Tick(600)).is_some());
        assert!(filter.observe(Released, Tick(900)).is_none());
    }

    #[test]
    fn release_before_first_press_is_ignored() {
        let mut filter = DebounceFilter::<Tick>::new(Millis(20));
        assert!(filter.observe(Released, Tick(5)).is_none());
    }

    #[test]
    fn window_is_measured_across_counter_wrap() {
        let mut filter = DebounceFilter::<Tick>::new(Millis(50));
        assert!(filter.observe(Pressed, Tick(u32::MAX - 10)).is_some());
        assert!(filter.observe(Released, Tick(20)).is_none());
        assert!(filter.observe(Released, Tick(39)).is_some());
    }
}
