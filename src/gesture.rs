//! Classification of stable edges into click and long-press gestures.
//!
//! The classifier is a single state machine fed from two places: the stable
//! edges coming out of the debounce filter, and a periodic
//! [`on_tick`](GestureClassifier::on_tick) from the main loop. Repeats and
//! click-window timeouts happen while the button level does not change, so
//! they can only come from the tick.

use crate::config::ButtonTiming;
use crate::time::{
    TimeDuration, TimeInstant, advance_baseline, elapsed_at_least, is_before, remaining,
};
use crate::types::{ButtonLevel, Gesture, StableEdge};

/// Tracks a first click waiting for a possible second press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickWindow<I: TimeInstant> {
    first_release_at: Option<I>,
}

impl<I: TimeInstant> ClickWindow<I> {
    const fn closed() -> Self {
        Self { first_release_at: None }
    }

    /// True while a first click awaits its possible second press.
    pub fn is_pending(&self) -> bool {
        self.first_release_at.is_some()
    }

    /// When the pending click was released.
    pub fn first_release_at(&self) -> Option<I> {
        self.first_release_at
    }
}

/// Long-press progress of a held button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LongPhase<I> {
    /// Threshold not reached yet.
    Waiting,
    /// `LongPressStart` has been emitted.
    Active { baseline: I, repeats: u32 },
}

/// Classifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState<I> {
    /// Button up.
    Idle,
    /// Button down, hold timer running.
    Held { since: I, phase: LongPhase<I> },
    /// Button down on the second press of a double click.
    Consumed,
}

/// Turns stable edges and elapsed time into [`Gesture`]s.
///
/// At most one gesture is returned per call. Repeats are scheduled from a
/// baseline that advances by exactly one repeat interval per emission, so a
/// late caller that drains [`on_tick`](Self::on_tick) in a loop catches up
/// without drift.
#[derive(Debug, Clone)]
pub struct GestureClassifier<I: TimeInstant> {
    timing: ButtonTiming<I::Duration>,
    state: HoldState<I>,
    window: ClickWindow<I>,
}

impl<I: TimeInstant> GestureClassifier<I> {
    /// Creates an idle classifier.
    ///
    /// `timing` should already be validated; a zero repeat interval makes
    /// draining `on_tick` loop forever.
    pub fn new(timing: ButtonTiming<I::Duration>) -> Self {
        Self {
            timing,
            state: HoldState::Idle,
            window: ClickWindow::closed(),
        }
    }

    /// Classifies one stable edge.
    pub fn on_stable_edge(&mut self, edge: StableEdge<I>, now: I) -> Option<Gesture> {
        match edge.level {
            ButtonLevel::Pressed => self.on_press(now),
            ButtonLevel::Released => self.on_release(now),
        }
    }

    fn on_press(&mut self, now: I) -> Option<Gesture> {
        if !matches!(self.state, HoldState::Idle) {
            return None;
        }

        if let Some(first_release) = self.window.first_release_at {
            if !elapsed_at_least(now, first_release, self.timing.double_click) {
                self.window = ClickWindow::closed();
                self.state = HoldState::Consumed;
                return Some(Gesture::DoubleClick);
            }
        }

        // A stale window stays open; the release of this press closes it.
        self.state = HoldState::Held {
            since: now,
            phase: LongPhase::Waiting,
        };
        None
    }

    fn on_release(&mut self, now: I) -> Option<Gesture> {
        match self.state {
            HoldState::Idle => None,
            HoldState::Consumed => {
                self.state = HoldState::Idle;
                None
            }
            HoldState::Held {
                phase: LongPhase::Active { .. },
                ..
            } => {
                self.state = HoldState::Idle;
                Some(Gesture::LongPressEnd)
            }
            HoldState::Held {
                phase: LongPhase::Waiting,
                ..
            } => {
                self.state = HoldState::Idle;
                let stale = self.window.is_pending();
                self.window = ClickWindow {
                    first_release_at: Some(now),
                };
                if stale { Some(Gesture::ShortClick) } else { None }
            }
        }
    }

    /// Advances time-driven gestures. Call on every scheduler pass.
    ///
    /// Emits, in priority order: the `ShortClick` of an expired click
    /// window, `LongPressStart` once the hold threshold is reached, then one
    /// `LongPressRepeat` per elapsed repeat interval. Cheap no-op when idle.
    ///
    /// An instant earlier than a stored baseline counts as nothing elapsed.
    pub fn on_tick(&mut self, now: I) -> Option<Gesture> {
        if let Some(first_release) = self.window.first_release_at {
            if !is_before(now, first_release)
                && elapsed_at_least(now, first_release, self.timing.double_click)
            {
                self.window = ClickWindow::closed();
                return Some(Gesture::ShortClick);
            }
        }

        let HoldState::Held { since, phase } = self.state else {
            return None;
        };

        match phase {
            LongPhase::Waiting => {
                if is_before(now, since) || !elapsed_at_least(now, since, self.timing.long_press) {
                    return None;
                }
                self.state = HoldState::Held {
                    since,
                    phase: LongPhase::Active {
                        baseline: advance_baseline(since, self.timing.long_press, now),
                        repeats: 0,
                    },
                };
                Some(Gesture::LongPressStart)
            }
            LongPhase::Active { baseline, repeats } => {
                if is_before(now, baseline) || !elapsed_at_least(now, baseline, self.timing.repeat) {
                    return None;
                }
                let repeats = repeats.saturating_add(1);
                self.state = HoldState::Held {
                    since,
                    phase: LongPhase::Active {
                        baseline: advance_baseline(baseline, self.timing.repeat, now),
                        repeats,
                    },
                };
                Some(Gesture::LongPressRepeat {
                    elapsed_repeats: repeats,
                })
            }
        }
    }

    /// Time until the next time-driven gesture could fire.
    ///
    /// `None` when only a new edge can produce a gesture.
    pub fn next_deadline(&self, now: I) -> Option<I::Duration> {
        let window = self
            .window
            .first_release_at
            .map(|first| remaining(now, first, self.timing.double_click));

        let hold = match self.state {
            HoldState::Held {
                since,
                phase: LongPhase::Waiting,
            } => Some(remaining(now, since, self.timing.long_press)),
            HoldState::Held {
                phase: LongPhase::Active { baseline, .. },
                ..
            } => Some(remaining(now, baseline, self.timing.repeat)),
            _ => None,
        };

        earliest(window, hold)
    }

    /// True while the button is down.
    pub fn is_held(&self) -> bool {
        !matches!(self.state, HoldState::Idle)
    }

    /// True once the current hold has passed the long-press threshold.
    pub fn is_long_press_active(&self) -> bool {
        matches!(
            self.state,
            HoldState::Held {
                phase: LongPhase::Active { .. },
                ..
            }
        )
    }

    /// The pending click window.
    pub fn click_window(&self) -> ClickWindow<I> {
        self.window
    }

    /// The timing windows in use.
    pub fn timing(&self) -> &ButtonTiming<I::Duration> {
        &self.timing
    }
}

/// Picks the shorter of two optional durations.
pub(crate) fn earliest<D: TimeDuration>(a: Option<D>, b: Option<D>) -> Option<D> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a.as_millis() <= b.as_millis() { a } else { b }),
        (a, None) => a,
        (None, b) => b,
    }
}
