//! Hardware abstraction for the GPIO and PWM outputs.
//!
//! Implement [`PinOutput`] and [`PwmOutput`] for your peripherals. The crate
//! only ever hands them finished pin levels and [`PwmFrame`]s.

use heapless::Vec;
use palette::Srgb;

/// Maximum number of PWM channels a single frame can carry.
pub const MAX_PWM_CHANNELS: usize = 4;

/// Identifies a physical pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u32);

impl PinId {
    /// Maps a `(port, pin)` pair to a flat pin number (32 pins per port).
    pub const fn new(port: u32, pin: u32) -> Self {
        PinId(port * 32 + pin)
    }

    /// Port number of this pin.
    pub const fn port(&self) -> u32 {
        self.0 / 32
    }

    /// Pin number within its port.
    pub const fn pin(&self) -> u32 {
        self.0 % 32
    }
}

/// Logic level of a digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    High,
    Low,
}

/// How an output is wired to its LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Driving the pin high (or a high duty) lights the LED.
    #[default]
    ActiveHigh,
    /// Driving the pin low lights the LED; duty is inverted.
    ActiveLow,
}

impl Polarity {
    /// Pin level that turns the LED on or off.
    #[inline]
    pub fn level(self, on: bool) -> Level {
        match (self, on) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => Level::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => Level::Low,
        }
    }

    /// Converts a logical brightness duty into the duty the peripheral needs.
    #[inline]
    pub fn apply(self, duty: u16, top: u16) -> u16 {
        let duty = duty.min(top);
        match self {
            Polarity::ActiveHigh => duty,
            Polarity::ActiveLow => top - duty,
        }
    }
}

/// Trait for abstracting digital output pins.
pub trait PinOutput {
    /// Drives `pin` to `level`.
    ///
    /// Called again with the level the pin already has is allowed; it must be
    /// harmless.
    fn set_level(&mut self, pin: PinId, level: Level);
}

/// Trait for abstracting a PWM peripheral.
pub trait PwmOutput {
    /// Assigns up to [`MAX_PWM_CHANNELS`] pins to channels and sets the counter top.
    fn configure(&mut self, channels: &[PinId], top: u16);

    /// Applies one duty value per configured channel.
    fn submit(&mut self, frame: &PwmFrame);

    /// Stops the peripheral and releases the assigned pins.
    fn stop(&mut self);
}

/// Per-channel duty values in `[0, top]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwmFrame {
    duties: Vec<u16, MAX_PWM_CHANNELS>,
    top: u16,
}

impl PwmFrame {
    /// A frame driving a single channel.
    pub fn single(duty: u16, top: u16) -> Self {
        let mut duties = Vec::new();
        let _ = duties.push(duty.min(top));
        Self { duties, top }
    }

    /// Builds a frame from a list of duties, clamping each to `top`.
    ///
    /// Duties past [`MAX_PWM_CHANNELS`] are ignored.
    pub fn from_duties(values: &[u16], top: u16) -> Self {
        let mut duties = Vec::new();
        for &duty in values.iter().take(MAX_PWM_CHANNELS) {
            let _ = duties.push(duty.min(top));
        }
        Self { duties, top }
    }

    /// Converts an RGB sample into a three-channel frame.
    pub fn from_rgb(sample: Srgb, top: u16, polarity: Polarity) -> Self {
        let duty = |x: f32| polarity.apply(duty_from_fraction(x, top), top);
        Self::from_duties(&[duty(sample.red), duty(sample.green), duty(sample.blue)], top)
    }

    /// Returns the frame with every channel inverted for active-low wiring.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        for duty in self.duties.iter_mut() {
            *duty = polarity.apply(*duty, self.top);
        }
        self
    }

    /// Duty values, one per channel.
    pub fn duties(&self) -> &[u16] {
        &self.duties
    }

    /// Counter top the duties are relative to.
    pub fn top(&self) -> u16 {
        self.top
    }
}

/// Converts a `[0.0, 1.0]` fraction into a duty with round-half-up.
///
/// Out-of-range and NaN inputs clamp to `[0, top]`.
#[inline]
pub fn duty_from_fraction(fraction: f32, top: u16) -> u16 {
    let scaled = libm::floorf(fraction * top as f32 + 0.5);
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= top as f32 {
        top
    } else {
        scaled as u16
    }
}
