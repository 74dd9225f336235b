//! Non-blocking animation effects driven once per scheduler pass.
//!
//! Provides [`AnimationEngine`], which owns the PWM output and runs one of
//! two effect strategies:
//!
//! - [`BreathingEffect`]: a triangular duty ramp that hands off to the next
//!   pin of a sequence table each time it reaches zero.
//! - [`HsvEffect`]: a static color whose HSV channels are adjusted by long
//!   presses, selected by the current [`Mode`].
//!
//! No step ever sleeps. Pacing is done by comparing `now` against a stored
//! baseline instant.

use crate::colors::hsv_frame;
use crate::config::{BreathingConfig, HsvConfig};
use crate::mode::Mode;
use crate::output::{PinId, PwmFrame, PwmOutput};
use crate::time::{TimeInstant, elapsed_at_least, remaining};
use crate::types::{Direction, Gesture, HsvColor};

/// Position of a breathing ramp.
///
/// Invariants: `duty <= top`, `led_index < sequence length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampState {
    /// Current duty in `[0, top]`.
    pub duty: u16,

    /// Ramp direction.
    pub direction: Direction,

    /// Index into the pin sequence.
    pub led_index: usize,
}

impl RampState {
    /// A ramp at zero duty, rising, on the first pin.
    pub const fn new() -> Self {
        Self {
            duty: 0,
            direction: Direction::Up,
            led_index: 0,
        }
    }

    /// Performs one ramp step.
    ///
    /// Clamps at the boundaries instead of wrapping, so both `0` and `top`
    /// are always reached exactly. At `top` the direction flips; at `0` it
    /// flips and `led_index` moves to the next sequence entry.
    ///
    /// Returns true when `led_index` advanced.
    pub fn advance(&mut self, step: u16, top: u16, sequence_len: usize) -> bool {
        match self.direction {
            Direction::Up => {
                self.duty = self.duty.saturating_add(step).min(top);
                if self.duty == top {
                    self.direction = self.direction.flipped();
                }
                false
            }
            Direction::Down => {
                self.duty = self.duty.min(top).saturating_sub(step);
                if self.duty == 0 {
                    self.direction = self.direction.flipped();
                    self.led_index = (self.led_index + 1) % sequence_len.max(1);
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl Default for RampState {
    fn default() -> Self {
        Self::new()
    }
}

/// Breathing ramp walking through a sequence of pins.
#[derive(Debug, Clone)]
pub struct BreathingEffect<I: TimeInstant> {
    config: BreathingConfig<I::Duration>,
    ramp: RampState,
    last_step: Option<I>,
    paused: bool,
}

impl<I: TimeInstant> BreathingEffect<I> {
    /// Creates an effect starting dark on the first pin.
    pub fn new(config: BreathingConfig<I::Duration>) -> Self {
        Self::with_ramp(config, RampState::new())
    }

    /// Creates an effect resuming from a given ramp position.
    ///
    /// Out-of-range values are clamped into the valid range.
    pub fn with_ramp(config: BreathingConfig<I::Duration>, ramp: RampState) -> Self {
        let ramp = RampState {
            duty: ramp.duty.min(config.top),
            direction: ramp.direction,
            led_index: ramp.led_index % config.sequence.len().max(1),
        };
        Self {
            config,
            ramp,
            last_step: None,
            paused: false,
        }
    }

    /// Current ramp position.
    pub fn ramp(&self) -> RampState {
        self.ramp
    }

    /// Pin currently being driven.
    pub fn active_pin(&self) -> PinId {
        self.config.sequence[self.ramp.led_index]
    }

    /// True while a short click has paused the ramp.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The effect configuration.
    pub fn config(&self) -> &BreathingConfig<I::Duration> {
        &self.config
    }

    fn frame(&self) -> PwmFrame {
        PwmFrame::single(self.ramp.duty, self.config.top).with_polarity(self.config.polarity)
    }

    fn is_running(&self, held: bool) -> bool {
        !self.paused && (!self.config.hold_to_run || held)
    }
}

/// Interactive color adjusted through long presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvEffect {
    config: HsvConfig,
    color: HsvColor,
}

impl HsvEffect {
    /// Creates an effect showing the configured initial color.
    pub fn new(config: HsvConfig) -> Self {
        Self {
            config,
            color: config.initial,
        }
    }

    /// Color currently shown.
    pub fn color(&self) -> HsvColor {
        self.color
    }

    /// The effect configuration.
    pub fn config(&self) -> &HsvConfig {
        &self.config
    }

    /// Adjusts the channel selected by `mode`. Returns true if anything changed.
    pub fn adjust(&mut self, mode: Mode) -> bool {
        let before = self.color;
        match mode {
            Mode::None => {}
            Mode::Hue => self.color.increment_hue(),
            Mode::Saturation => self.color.increment_saturation(),
            Mode::Value => self.color.increment_value(),
        }
        self.color != before
    }

    fn frame(&self) -> PwmFrame {
        hsv_frame(self.color, self.config.top, self.config.polarity)
    }
}

/// The effect strategy an [`AnimationEngine`] runs.
#[derive(Debug, Clone)]
pub enum Effect<I: TimeInstant> {
    /// Breathing ramp with pin sequencing.
    Breathing(BreathingEffect<I>),
    /// Interactive HSV color.
    Hsv(HsvEffect),
}

/// Advances the selected effect and pushes frames to the PWM output.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `P` - PWM output implementation type
pub struct AnimationEngine<I: TimeInstant, P: PwmOutput> {
    effect: Effect<I>,
    pwm: P,
    started: bool,
}

impl<I: TimeInstant, P: PwmOutput> AnimationEngine<I, P> {
    /// Creates an engine. Nothing is driven until [`start`](Self::start).
    pub fn new(effect: Effect<I>, pwm: P) -> Self {
        Self {
            effect,
            pwm,
            started: false,
        }
    }

    /// Configures the PWM channels and shows the first frame.
    pub fn start(&mut self, now: I) {
        match &mut self.effect {
            Effect::Breathing(breathing) => {
                let pin = breathing.active_pin();
                self.pwm.configure(&[pin], breathing.config.top);
                self.pwm.submit(&breathing.frame());
                breathing.last_step = Some(now);
            }
            Effect::Hsv(hsv) => {
                self.pwm.configure(&hsv.config.pins, hsv.config.top);
                self.pwm.submit(&hsv.frame());
            }
        }
        self.started = true;
    }

    /// Advances the effect by at most one step.
    ///
    /// `held` reports whether the button is down; hold-to-run ramps only
    /// move while it is.
    pub fn tick(&mut self, now: I, held: bool) {
        if !self.started {
            return;
        }

        let Effect::Breathing(breathing) = &mut self.effect else {
            return;
        };

        if !breathing.is_running(held) {
            return;
        }

        let Some(last_step) = breathing.last_step else {
            breathing.last_step = Some(now);
            return;
        };

        if !elapsed_at_least(now, last_step, breathing.config.step_interval) {
            return;
        }
        breathing.last_step = Some(now);

        let previous_pin = breathing.active_pin();
        let advanced = breathing.ramp.advance(
            breathing.config.step,
            breathing.config.top,
            breathing.config.sequence.len(),
        );

        if advanced {
            let next_pin = breathing.active_pin();
            if next_pin != previous_pin {
                #[cfg(feature = "defmt")]
                defmt::debug!("sequence handoff {} -> {}", previous_pin, next_pin);

                // Release the old pin before the new one is assigned.
                self.pwm.stop();
                self.pwm.configure(&[next_pin], breathing.config.top);
            }
        }

        self.pwm.submit(&breathing.frame());
    }

    /// Routes a gesture to the effect.
    ///
    /// Breathing: `ShortClick` pauses or resumes the ramp. A hold-to-run
    /// ramp is gated by the button alone and ignores it.
    /// HSV: `LongPressRepeat` adjusts the channel selected by `mode` and
    /// immediately pushes the new color.
    pub fn on_gesture(&mut self, gesture: Gesture, mode: Mode, now: I) {
        match &mut self.effect {
            Effect::Breathing(breathing) => {
                if gesture == Gesture::ShortClick && !breathing.config.hold_to_run {
                    breathing.paused = !breathing.paused;
                    if !breathing.paused {
                        breathing.last_step = Some(now);
                    }
                    #[cfg(feature = "defmt")]
                    defmt::debug!("breathing paused: {}", breathing.paused);
                }
            }
            Effect::Hsv(hsv) => {
                if let Gesture::LongPressRepeat { .. } = gesture {
                    if hsv.adjust(mode) && self.started {
                        self.pwm.submit(&hsv.frame());
                    }
                }
            }
        }
    }

    /// Time until the next ramp step is due, `None` if nothing is scheduled.
    pub fn next_deadline(&self, now: I, held: bool) -> Option<I::Duration> {
        match &self.effect {
            Effect::Breathing(breathing) if self.started && breathing.is_running(held) => breathing
                .last_step
                .map(|last| remaining(now, last, breathing.config.step_interval)),
            _ => None,
        }
    }

    /// Stops the PWM output.
    pub fn shutdown(&mut self) {
        self.pwm.stop();
        self.started = false;
    }

    /// The running effect.
    pub fn effect(&self) -> &Effect<I> {
        &self.effect
    }

    /// The PWM output.
    pub fn output(&self) -> &P {
        &self.pwm
    }

    /// Mutable access to the PWM output.
    pub fn output_mut(&mut self) -> &mut P {
        &mut self.pwm
    }

    /// True once [`start`](Self::start) has run.
    pub fn is_started(&self) -> bool {
        self.started
    }
}
