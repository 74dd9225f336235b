//! Shared test infrastructure for gesture-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use gesture_sequencer::{
    ButtonTiming, Level, PinId, PinOutput, PwmFrame, PwmOutput, Tick, TimeDuration, TimeInstant,
    TimeSource,
};
use palette::Srgb;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
///
/// `duration_since` saturates at zero when `earlier` is actually later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(TestInstant(self.0 + duration.0))
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_sub(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

/// Mock time source for the wrapping millisecond [`Tick`] counter
pub struct MockTickSource {
    current_time: core::cell::Cell<Tick>,
}

impl MockTickSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(Tick(0)),
        }
    }

    pub fn set_time(&self, time: Tick) {
        self.current_time.set(time);
    }
}

impl TimeSource<Tick> for MockTickSource {
    fn now(&self) -> Tick {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Outputs
// ============================================================================

/// One call made on the PWM peripheral
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PwmEvent {
    Configure(heapless::Vec<PinId, 4>, u16),
    Submit(heapless::Vec<u16, 4>),
    Stop,
}

/// Mock PWM peripheral that records every call
pub struct MockPwm {
    events: heapless::Vec<PwmEvent, 256>,
    last_frame: Option<PwmFrame>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self {
            events: heapless::Vec::new(),
            last_frame: None,
        }
    }

    pub fn events(&self) -> &[PwmEvent] {
        &self.events
    }

    pub fn last_duties(&self) -> Option<&[u16]> {
        self.last_frame.as_ref().map(|frame| frame.duties())
    }

    pub fn submit_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, PwmEvent::Submit(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PwmOutput for MockPwm {
    fn configure(&mut self, channels: &[PinId], top: u16) {
        let pins = heapless::Vec::from_slice(channels).unwrap_or_default();
        let _ = self.events.push(PwmEvent::Configure(pins, top));
    }

    fn submit(&mut self, frame: &PwmFrame) {
        let duties = heapless::Vec::from_slice(frame.duties()).unwrap_or_default();
        let _ = self.events.push(PwmEvent::Submit(duties));
        self.last_frame = Some(frame.clone());
    }

    fn stop(&mut self) {
        let _ = self.events.push(PwmEvent::Stop);
    }
}

/// Mock GPIO that records every level written
pub struct MockGpio {
    writes: heapless::Vec<(PinId, Level), 64>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            writes: heapless::Vec::new(),
        }
    }

    pub fn writes(&self) -> &[(PinId, Level)] {
        &self.writes
    }

    pub fn last_level(&self) -> Option<Level> {
        self.writes.last().map(|&(_, level)| level)
    }
}

impl PinOutput for MockGpio {
    fn set_level(&mut self, pin: PinId, level: Level) {
        let _ = self.writes.push((pin, level));
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// The button timing used throughout the tests: 400/500/100 ms, checked against a 50 ms debounce
pub fn default_timing() -> ButtonTiming<TestDuration> {
    ButtonTiming::default()
        .validate(TestDuration(50))
        .unwrap()
}

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    const EPSILON: f32 = 0.001;
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}
