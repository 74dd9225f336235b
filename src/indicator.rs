//! Low-rate status LED showing the current mode.
//!
//! | Mode         | Pattern      |
//! |--------------|--------------|
//! | `None`       | off          |
//! | `Hue`        | slow blink   |
//! | `Saturation` | fast blink   |
//! | `Value`      | steady on    |
//!
//! The indicator keeps its own baseline and never touches the PWM output.

use crate::config::IndicatorConfig;
use crate::mode::Mode;
use crate::output::PinOutput;
use crate::time::{TimeDuration, TimeInstant, elapsed_at_least, remaining};

/// What the indicator LED does in a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPattern<D> {
    /// LED held off.
    Off,
    /// LED held on.
    On,
    /// LED toggles every period.
    Blink(D),
}

/// Drives the mode indicator pin.
pub struct ModeIndicator<I: TimeInstant, G: PinOutput> {
    config: IndicatorConfig<I::Duration>,
    gpio: G,
    lit: bool,
    baseline: Option<I>,
    shown: Option<Mode>,
}

impl<I: TimeInstant, G: PinOutput> ModeIndicator<I, G> {
    /// Creates an indicator. The pin is left alone until the first update.
    pub fn new(config: IndicatorConfig<I::Duration>, gpio: G) -> Self {
        Self {
            config,
            gpio,
            lit: false,
            baseline: None,
            shown: None,
        }
    }

    /// Pattern used for `mode`.
    pub fn pattern(&self, mode: Mode) -> BlinkPattern<I::Duration> {
        match mode {
            Mode::None => BlinkPattern::Off,
            Mode::Hue => BlinkPattern::Blink(self.config.slow_blink),
            Mode::Saturation => BlinkPattern::Blink(self.config.fast_blink),
            Mode::Value => BlinkPattern::On,
        }
    }

    /// Updates the LED for the current mode. Call once per scheduler pass.
    ///
    /// A mode change restarts the pattern immediately; otherwise a blinking
    /// pattern toggles once its period has elapsed.
    pub fn update(&mut self, now: I, mode: Mode) {
        if self.shown != Some(mode) {
            self.shown = Some(mode);
            self.baseline = Some(now);
            let lit = !matches!(self.pattern(mode), BlinkPattern::Off);
            self.drive(lit);
            return;
        }

        let BlinkPattern::Blink(period) = self.pattern(mode) else {
            return;
        };

        let baseline = self.baseline.unwrap_or(now);
        if elapsed_at_least(now, baseline, period) {
            self.baseline = Some(now);
            self.drive(!self.lit);
        }
    }

    /// Time until the next toggle, `None` for steady patterns.
    pub fn next_deadline(&self, now: I, mode: Mode) -> Option<I::Duration> {
        if self.shown != Some(mode) {
            return Some(I::Duration::ZERO);
        }
        match (self.pattern(mode), self.baseline) {
            (BlinkPattern::Blink(period), Some(baseline)) => Some(remaining(now, baseline, period)),
            _ => None,
        }
    }

    /// True while the LED is on.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// The GPIO output.
    pub fn output(&self) -> &G {
        &self.gpio
    }

    /// Mutable access to the GPIO output.
    pub fn output_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    fn drive(&mut self, lit: bool) {
        self.lit = lit;
        self.gpio
            .set_level(self.config.pin, self.config.polarity.level(lit));
    }
}
