#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`EdgeMailbox`**: Debounces raw edges in the interrupt and hands stable edges to the main loop
//! - **`DebounceFilter`**: Accepts one transition per debounce window
//! - **`GestureClassifier`**: Turns stable edges and elapsed time into `Gesture`s
//! - **`ModeController`**: Cycles the `Mode` on every double click
//! - **`AnimationEngine`**: Runs a breathing/sequencing or interactive HSV `Effect`
//! - **`ModeIndicator`**: Blinks a status LED in a pattern keyed to the mode
//! - **`Controller`**: One cooperative scheduler pass over all of the above
//! - **`PwmOutput`** / **`PinOutput`**: Traits to implement for your hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Colors are computed as `Srgb<f32>` (0.0-1.0 range) and rounded to integer
//! duty values in `[0, top]` before they reach the PWM output.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod animation;
pub mod colors;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod gesture;
pub mod indicator;
pub mod mailbox;
pub mod mode;
pub mod output;
pub mod time;
pub mod types;

pub use animation::{AnimationEngine, BreathingEffect, Effect, HsvEffect, RampState};
pub use colors::{RgbSample, hsv_to_rgb};
pub use config::{
    BreathingConfig, BreathingConfigBuilder, ButtonTiming, ConfigError, HsvConfig,
    IndicatorConfig, MAX_SEQUENCE_LEN,
};
pub use controller::{Controller, ServiceTiming};
pub use debounce::DebounceFilter;
pub use gesture::{ClickWindow, GestureClassifier};
pub use indicator::{BlinkPattern, ModeIndicator};
pub use mailbox::EdgeMailbox;
pub use mode::{Mode, ModeController};
pub use output::{Level, PinId, PinOutput, Polarity, PwmFrame, PwmOutput, duty_from_fraction};
pub use time::{Millis, Tick, TimeDuration, TimeInstant, TimeSource, elapsed_at_least};
pub use types::{ButtonLevel, Direction, Gesture, HsvColor, StableEdge};
