//! Tunable parameters and their validation.
//!
//! All timing windows, the PWM resolution and the LED sequence table are
//! passed in here instead of being hard-coded. Builders validate once at
//! construction so the runtime paths stay infallible.

use crate::output::{PinId, Polarity};
use crate::time::TimeDuration;
use crate::types::HsvColor;
use heapless::Vec;

/// Maximum number of entries in a sequencing table.
pub const MAX_SEQUENCE_LEN: usize = 32;

/// Default PWM counter top.
pub const DEFAULT_TOP: u16 = 1000;

/// Default duty change per ramp step.
pub const DEFAULT_STEP: u16 = 10;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Repeat interval of zero would emit repeats forever in one pass.
    ZeroRepeatInterval,

    /// Double-click window of zero can never match.
    ZeroDoubleClickWindow,

    /// Long-press threshold must be longer than the debounce window.
    LongPressWithinDebounce,

    /// PWM top of zero leaves no duty range.
    ZeroTop,

    /// Ramp step must be in `1..=top`.
    InvalidStep,

    /// Sequencing needs at least one pin.
    EmptySequence,

    /// Sequence capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroRepeatInterval => write!(f, "repeat interval must be non-zero"),
            ConfigError::ZeroDoubleClickWindow => {
                write!(f, "double-click window must be non-zero")
            }
            ConfigError::LongPressWithinDebounce => {
                write!(f, "long-press threshold must exceed the debounce window")
            }
            ConfigError::ZeroTop => write!(f, "PWM top must be non-zero"),
            ConfigError::InvalidStep => write!(f, "ramp step must be between 1 and top"),
            ConfigError::EmptySequence => write!(f, "sequence must have at least one pin"),
            ConfigError::CapacityExceeded => write!(f, "sequence capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Timing windows used by the gesture classifier.
///
/// The debounce window belongs to the [`EdgeMailbox`](crate::EdgeMailbox)
/// and is only checked against here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonTiming<D: TimeDuration> {
    /// Maximum gap between a release and the next press for a double click.
    pub double_click: D,

    /// Hold time before a press becomes a long press.
    pub long_press: D,

    /// Interval between long-press repeats.
    pub repeat: D,
}

impl<D: TimeDuration> ButtonTiming<D> {
    /// Checks the timing windows for values the classifier cannot work with.
    ///
    /// `debounce` is the window of the mailbox feeding the classifier,
    /// see [`EdgeMailbox::debounce_window`](crate::EdgeMailbox::debounce_window).
    pub fn validate(self, debounce: D) -> Result<Self, ConfigError> {
        if self.repeat.as_millis() == 0 {
            return Err(ConfigError::ZeroRepeatInterval);
        }
        if self.double_click.as_millis() == 0 {
            return Err(ConfigError::ZeroDoubleClickWindow);
        }
        if self.long_press.as_millis() <= debounce.as_millis() {
            return Err(ConfigError::LongPressWithinDebounce);
        }
        Ok(self)
    }
}

impl<D: TimeDuration> Default for ButtonTiming<D> {
    fn default() -> Self {
        Self {
            double_click: D::from_millis(400),
            long_press: D::from_millis(500),
            repeat: D::from_millis(100),
        }
    }
}

/// Parameters of the breathing/sequencing effect.
#[derive(Debug, Clone)]
pub struct BreathingConfig<D: TimeDuration> {
    pub(crate) top: u16,
    pub(crate) step: u16,
    pub(crate) step_interval: D,
    pub(crate) sequence: Vec<PinId, MAX_SEQUENCE_LEN>,
    pub(crate) polarity: Polarity,
    pub(crate) hold_to_run: bool,
}

impl<D: TimeDuration> BreathingConfig<D> {
    /// Creates a new configuration builder.
    pub fn builder() -> BreathingConfigBuilder<D> {
        BreathingConfigBuilder::new()
    }

    /// PWM counter top.
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Duty change per ramp step.
    pub fn step(&self) -> u16 {
        self.step
    }

    /// Time between ramp steps.
    pub fn step_interval(&self) -> D {
        self.step_interval
    }

    /// The pin sequence walked at the bottom of each ramp.
    pub fn sequence(&self) -> &[PinId] {
        &self.sequence
    }

    /// How the LEDs are wired.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Whether the ramp only advances while the button is held.
    pub fn hold_to_run(&self) -> bool {
        self.hold_to_run
    }
}

/// Builder for [`BreathingConfig`].
#[derive(Debug)]
pub struct BreathingConfigBuilder<D: TimeDuration> {
    top: u16,
    step: u16,
    step_interval: D,
    sequence: Vec<PinId, MAX_SEQUENCE_LEN>,
    polarity: Polarity,
    hold_to_run: bool,
}

impl<D: TimeDuration> BreathingConfigBuilder<D> {
    /// Creates a builder with a 1000 top, step of 10 and 1 ms step interval.
    pub fn new() -> Self {
        Self {
            top: DEFAULT_TOP,
            step: DEFAULT_STEP,
            step_interval: D::from_millis(1),
            sequence: Vec::new(),
            polarity: Polarity::ActiveHigh,
            hold_to_run: false,
        }
    }

    /// Sets the PWM counter top.
    pub fn top(mut self, top: u16) -> Self {
        self.top = top;
        self
    }

    /// Sets the duty change per ramp step.
    pub fn step(mut self, step: u16) -> Self {
        self.step = step;
        self
    }

    /// Sets the time between ramp steps.
    pub fn step_interval(mut self, interval: D) -> Self {
        self.step_interval = interval;
        self
    }

    /// Sets the LED wiring.
    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Only advance the ramp while the button is held down.
    pub fn hold_to_run(mut self, enabled: bool) -> Self {
        self.hold_to_run = enabled;
        self
    }

    /// Appends a pin to the sequence table.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` when the table already holds
    /// [`MAX_SEQUENCE_LEN`] entries.
    pub fn pin(mut self, pin: PinId) -> Result<Self, ConfigError> {
        self.sequence
            .push(pin)
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends `count` repetitions of a pin to the sequence table.
    pub fn repeat_pin(mut self, pin: PinId, count: usize) -> Result<Self, ConfigError> {
        for _ in 0..count {
            self = self.pin(pin)?;
        }
        Ok(self)
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<BreathingConfig<D>, ConfigError> {
        if self.top == 0 {
            return Err(ConfigError::ZeroTop);
        }
        if self.step == 0 || self.step > self.top {
            return Err(ConfigError::InvalidStep);
        }
        if self.sequence.is_empty() {
            return Err(ConfigError::EmptySequence);
        }

        Ok(BreathingConfig {
            top: self.top,
            step: self.step,
            step_interval: self.step_interval,
            sequence: self.sequence,
            polarity: self.polarity,
            hold_to_run: self.hold_to_run,
        })
    }
}

impl<D: TimeDuration> Default for BreathingConfigBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the interactive HSV effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvConfig {
    /// Red, green and blue pins, in that order.
    pub pins: [PinId; 3],

    /// PWM counter top.
    pub top: u16,

    /// Color shown at start-up.
    pub initial: HsvColor,

    /// How the LEDs are wired.
    pub polarity: Polarity,
}

impl HsvConfig {
    /// Creates a configuration with a 1000 top and full-brightness red.
    pub fn new(pins: [PinId; 3]) -> Self {
        Self {
            pins,
            top: DEFAULT_TOP,
            initial: HsvColor::default(),
            polarity: Polarity::ActiveHigh,
        }
    }

    /// Checks that the PWM range is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.top == 0 {
            return Err(ConfigError::ZeroTop);
        }
        Ok(self)
    }
}

/// Parameters of the mode indicator LED.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig<D: TimeDuration> {
    /// Indicator pin.
    pub pin: PinId,

    /// Toggle period of the slow blink.
    pub slow_blink: D,

    /// Toggle period of the fast blink.
    pub fast_blink: D,

    /// How the LED is wired.
    pub polarity: Polarity,
}

impl<D: TimeDuration> IndicatorConfig<D> {
    /// Creates a configuration with 500 ms slow and 100 ms fast toggles.
    pub fn new(pin: PinId) -> Self {
        Self {
            pin,
            slow_blink: D::from_millis(500),
            fast_blink: D::from_millis(100),
            polarity: Polarity::ActiveHigh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Millis;
    extern crate std;
    use std::format;

    const LED: PinId = PinId::new(0, 6);

    #[test]
    fn default_timing_is_valid() {
        assert!(ButtonTiming::<Millis>::default().validate(Millis(50)).is_ok());
    }

    #[test]
    fn timing_validation_rejects_degenerate_windows() {
        let base = ButtonTiming::<Millis>::default();
        let zero_repeat = ButtonTiming { repeat: Millis(0), ..base };
        assert_eq!(zero_repeat.validate(Millis(50)), Err(ConfigError::ZeroRepeatInterval));

        let zero_window = ButtonTiming { double_click: Millis(0), ..base };
        assert_eq!(zero_window.validate(Millis(50)), Err(ConfigError::ZeroDoubleClickWindow));

        let short_hold = ButtonTiming { long_press: Millis(50), ..base };
        assert_eq!(short_hold.validate(Millis(50)), Err(ConfigError::LongPressWithinDebounce));
    }

    #[test]
    fn long_press_is_checked_against_the_mailbox_window() {
        let mailbox = crate::EdgeMailbox::<crate::Tick, 4>::new(Millis(600));
        assert_eq!(
            ButtonTiming::default().validate(mailbox.debounce_window()),
            Err(ConfigError::LongPressWithinDebounce)
        );
    }

    #[test]
    fn breathing_builder_validates() {
        let empty = BreathingConfig::<Millis>::builder().build();
        assert_eq!(empty.unwrap_err(), ConfigError::EmptySequence);

        let zero_step = BreathingConfig::<Millis>::builder().step(0).pin(LED).unwrap().build();
        assert_eq!(zero_step.unwrap_err(), ConfigError::InvalidStep);

        let too_big = BreathingConfig::<Millis>::builder().top(100).step(101).pin(LED).unwrap().build();
        assert_eq!(too_big.unwrap_err(), ConfigError::InvalidStep);

        let config = BreathingConfig::<Millis>::builder()
            .repeat_pin(LED, 7)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.sequence().len(), 7);
        assert_eq!(config.top(), DEFAULT_TOP);
    }

    #[test]
    fn sequence_capacity_is_enforced() {
        let result = BreathingConfig::<Millis>::builder().repeat_pin(LED, MAX_SEQUENCE_LEN + 1);
        assert!(matches!(result, Err(ConfigError::CapacityExceeded)));
    }

    #[test]
    fn error_messages_format_correctly_for_display() {
        assert_eq!(
            format!("{}", ConfigError::EmptySequence),
            "sequence must have at least one pin"
        );
        assert_eq!(
            format!("{}", ConfigError::ZeroRepeatInterval),
            "repeat interval must be non-zero"
        );
    }
}
