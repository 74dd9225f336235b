//! Core value types shared between the input and output halves of the crate.

use crate::time::TimeInstant;

/// Debounced logical level of the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonLevel {
    /// Button is held down.
    Pressed,
    /// Button is up.
    Released,
}

impl ButtonLevel {
    /// Maps a raw pin reading to a level for an active-low button with pull-up.
    #[inline]
    pub fn from_active_low(pin_is_low: bool) -> Self {
        if pin_is_low {
            ButtonLevel::Pressed
        } else {
            ButtonLevel::Released
        }
    }
}

/// A debounced, trustworthy press/release transition.
///
/// Produced at most once per genuine physical transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableEdge<I: TimeInstant> {
    /// The level the button settled at.
    pub level: ButtonLevel,

    /// When the transition was accepted.
    pub at: I,
}

impl<I: TimeInstant> StableEdge<I> {
    /// Creates a new stable edge.
    #[inline]
    pub fn new(level: ButtonLevel, at: I) -> Self {
        Self { level, at }
    }
}

/// A classified user action.
///
/// Gestures are produced and consumed within one scheduler pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// A single press and release with no second press inside the double-click window.
    ShortClick,

    /// Two presses inside the double-click window.
    DoubleClick,

    /// The button has been held past the long-press threshold.
    LongPressStart,

    /// Emitted every repeat interval while a long press is held.
    LongPressRepeat {
        /// Number of repeats so far in this hold, starting at 1.
        elapsed_repeats: u32,
    },

    /// The button was released after a long press.
    LongPressEnd,
}

/// Direction of a duty-cycle ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Duty increases toward TOP.
    Up,
    /// Duty decreases toward zero.
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// A color in the HSV model with integer channels.
///
/// Invariants: `hue < 360`, `saturation <= 100`, `value <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HsvColor {
    hue: u32,
    saturation: u32,
    value: u32,
}

impl HsvColor {
    /// Creates a color, normalizing out-of-range inputs.
    ///
    /// Hue is taken modulo 360; saturation and value clamp at 100.
    pub const fn new(hue: u32, saturation: u32, value: u32) -> Self {
        Self {
            hue: hue % 360,
            saturation: if saturation > 100 { 100 } else { saturation },
            value: if value > 100 { 100 } else { value },
        }
    }

    /// Hue in degrees, `[0, 360)`.
    pub fn hue(&self) -> u32 {
        self.hue
    }

    /// Saturation in percent, `[0, 100]`.
    pub fn saturation(&self) -> u32 {
        self.saturation
    }

    /// Value in percent, `[0, 100]`.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Advances hue by one degree, wrapping at 360.
    pub fn increment_hue(&mut self) {
        self.hue = (self.hue + 1) % 360;
    }

    /// Increases saturation by one percent, stopping at 100.
    pub fn increment_saturation(&mut self) {
        self.saturation = (self.saturation + 1).min(100);
    }

    /// Increases value by one percent, stopping at 100.
    pub fn increment_value(&mut self) {
        self.value = (self.value + 1).min(100);
    }
}

impl Default for HsvColor {
    fn default() -> Self {
        HsvColor::new(0, 100, 100)
    }
}
