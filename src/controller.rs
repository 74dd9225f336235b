//! The cooperative scheduler pass tying input and output together.
//!
//! Data flows one way: edge mailbox → gesture classifier → mode controller
//! and animation engine → PWM output, with the mode indicator updated from
//! the same pass. [`Controller::service`] performs one pass and tells the
//! caller how long it may sleep.

use crate::animation::AnimationEngine;
use crate::gesture::{GestureClassifier, earliest};
use crate::indicator::ModeIndicator;
use crate::mailbox::EdgeMailbox;
use crate::mode::{Mode, ModeController};
use crate::output::{PinOutput, PwmOutput};
use crate::time::{TimeInstant, TimeSource, latest};
use crate::types::Gesture;

/// Timing information returned by [`Controller::service`].
///
/// Indicates when the controller needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Service again after at most this delay, or earlier on a button edge.
    Delay(D),

    /// Nothing is scheduled. Sleep until the next button edge.
    WaitForEvent,
}

/// Runs the gesture recognizer and animation from the main loop.
///
/// Call [`service`](Self::service) on every pass, then enter a low-power
/// wait that ends on the returned deadline or on the edge interrupt.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and mailbox references
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `P` - PWM output implementation type
/// * `G` - GPIO output implementation type for the indicator
/// * `N` - Capacity of the edge mailbox
pub struct Controller<'t, I, T, P, G, const N: usize>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: PwmOutput,
    G: PinOutput,
{
    time_source: &'t T,
    mailbox: &'t EdgeMailbox<I, N>,
    classifier: GestureClassifier<I>,
    modes: ModeController,
    engine: AnimationEngine<I, P>,
    indicator: ModeIndicator<I, G>,
    classified_until: Option<I>,
    dispatched: u32,
}

impl<'t, I, T, P, G, const N: usize> Controller<'t, I, T, P, G, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: PwmOutput,
    G: PinOutput,
{
    /// Creates a controller cycling through every [`Mode`].
    pub fn new(
        time_source: &'t T,
        mailbox: &'t EdgeMailbox<I, N>,
        classifier: GestureClassifier<I>,
        engine: AnimationEngine<I, P>,
        indicator: ModeIndicator<I, G>,
    ) -> Self {
        Self {
            time_source,
            mailbox,
            classifier,
            modes: ModeController::new(),
            engine,
            indicator,
            classified_until: None,
            dispatched: 0,
        }
    }

    /// Replaces the mode controller, e.g. to shorten the mode cycle.
    pub fn with_modes(mut self, modes: ModeController) -> Self {
        self.modes = modes;
        self
    }

    /// Configures the outputs and shows the initial frame and mode.
    ///
    /// Called automatically by the first [`service`](Self::service).
    pub fn start(&mut self) {
        let now = self.time_source.now();
        self.engine.start(now);
        self.indicator.update(now, self.modes.current());

        #[cfg(feature = "defmt")]
        defmt::info!("controller started in mode {}", self.modes.current());
    }

    /// Performs one scheduler pass.
    ///
    /// Drains the mailbox, classifies each edge at its own timestamp (firing
    /// any timer that expired before it first), drains time-driven gestures,
    /// advances the animation and updates the indicator.
    ///
    /// Classification time never goes backwards. An edge stamped before the
    /// instant the previous pass classified up to is classified at that
    /// instant instead.
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        if !self.engine.is_started() {
            self.start();
        }

        while let Some(edge) = self.mailbox.take() {
            let at = self.advance_to(edge.at);
            self.drain_timers(at);

            #[cfg(feature = "defmt")]
            defmt::trace!("stable edge {}", edge.level);

            if let Some(gesture) = self.classifier.on_stable_edge(edge, at) {
                self.dispatch(gesture, at);
            }
        }

        let now = self.advance_to(self.time_source.now());
        self.drain_timers(now);

        let held = self.classifier.is_held();
        let mode = self.modes.current();
        self.engine.tick(now, held);
        self.indicator.update(now, mode);

        let deadline = earliest(
            earliest(
                self.classifier.next_deadline(now),
                self.engine.next_deadline(now, held),
            ),
            self.indicator.next_deadline(now, mode),
        );

        match deadline {
            Some(delay) => ServiceTiming::Delay(delay),
            None => ServiceTiming::WaitForEvent,
        }
    }

    fn advance_to(&mut self, instant: I) -> I {
        let at = match self.classified_until {
            Some(until) => latest(instant, until),
            None => instant,
        };
        self.classified_until = Some(at);
        at
    }

    fn drain_timers(&mut self, now: I) {
        while let Some(gesture) = self.classifier.on_tick(now) {
            self.dispatch(gesture, now);
        }
    }

    fn dispatch(&mut self, gesture: Gesture, now: I) {
        #[cfg(feature = "defmt")]
        defmt::debug!("gesture {}", gesture);

        #[cfg(feature = "defmt")]
        let previous = self.modes.current();

        let mode = self.modes.apply(gesture);

        #[cfg(feature = "defmt")]
        {
            if mode != previous {
                defmt::info!("mode {} -> {}", previous, mode);
            }
        }

        self.engine.on_gesture(gesture, mode, now);
        self.dispatched = self.dispatched.wrapping_add(1);
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// Number of gestures dispatched since creation.
    pub fn gestures_dispatched(&self) -> u32 {
        self.dispatched
    }

    /// The gesture classifier.
    pub fn classifier(&self) -> &GestureClassifier<I> {
        &self.classifier
    }

    /// The animation engine.
    pub fn engine(&self) -> &AnimationEngine<I, P> {
        &self.engine
    }

    /// The mode indicator.
    pub fn indicator(&self) -> &ModeIndicator<I, G> {
        &self.indicator
    }

    /// Stops the PWM output. The next [`service`](Self::service) restarts it.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}
