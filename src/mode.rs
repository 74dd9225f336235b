//! Cyclic mode selection driven by double clicks.

use crate::types::Gesture;

/// Which HSV channel a long press adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Long presses change nothing.
    #[default]
    None,
    /// Long presses rotate the hue.
    Hue,
    /// Long presses raise saturation.
    Saturation,
    /// Long presses raise value (brightness).
    Value,
}

impl Mode {
    /// Every mode in cycle order.
    pub const ALL: [Mode; 4] = [Mode::None, Mode::Hue, Mode::Saturation, Mode::Value];

    /// Position of this mode in [`Mode::ALL`].
    pub fn index(self) -> usize {
        match self {
            Mode::None => 0,
            Mode::Hue => 1,
            Mode::Saturation => 2,
            Mode::Value => 3,
        }
    }

    /// Mode at `index`, wrapping past the end.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Owns the current [`Mode`] and advances it on every double click.
///
/// The cycle length `N` is configurable from 1 (always `None`) up to all
/// four modes; the first `N` entries of [`Mode::ALL`] take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    index: usize,
    count: usize,
}

impl ModeController {
    /// A controller cycling through all modes, starting at `None`.
    pub fn new() -> Self {
        Self::with_count(Mode::ALL.len())
    }

    /// A controller cycling through the first `count` modes.
    ///
    /// `count` is clamped to `1..=4`.
    pub fn with_count(count: usize) -> Self {
        Self {
            index: 0,
            count: count.clamp(1, Mode::ALL.len()),
        }
    }

    /// Applies a gesture and returns the resulting mode.
    ///
    /// Only `DoubleClick` changes the mode.
    pub fn apply(&mut self, gesture: Gesture) -> Mode {
        if gesture == Gesture::DoubleClick {
            self.index = (self.index + 1) % self.count;
        }
        self.current()
    }

    /// The current mode.
    pub fn current(&self) -> Mode {
        Mode::from_index(self.index)
    }

    /// Number of modes in the cycle.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
