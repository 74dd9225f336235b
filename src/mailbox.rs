//! Interrupt-safe handoff of stable edges from the edge callback to the main loop.
//!
//! The edge callback is the only writer of the debounce state and the only
//! producer of edges; the main loop is the only consumer. Both sides go
//! through a critical section, so no plain shared mutable state is involved.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::debounce::DebounceFilter;
use crate::time::TimeInstant;
use crate::types::{ButtonLevel, StableEdge};

struct Inner<I: TimeInstant, const N: usize> {
    filter: DebounceFilter<I>,
    queue: Deque<StableEdge<I>, N>,
    dropped: u32,
}

/// Single-producer/single-consumer mailbox for stable button edges.
///
/// Construct it as a `static` and call [`on_edge`](Self::on_edge) from the
/// GPIO interrupt handler, [`take`](Self::take) from the main loop:
///
/// ```
/// use gesture_sequencer::{ButtonLevel, EdgeMailbox, Millis, Tick};
///
/// static BUTTON_EDGES: EdgeMailbox<Tick, 8> = EdgeMailbox::new(Millis::new(50));
///
/// // interrupt context
/// BUTTON_EDGES.on_edge(ButtonLevel::Pressed, Tick(1_000));
///
/// // main loop
/// let edge = BUTTON_EDGES.take().unwrap();
/// assert_eq!(edge.level, ButtonLevel::Pressed);
/// ```
///
/// Edges come out in the order they were accepted and each one exactly once.
/// If the queue is full the newest edge is dropped and counted.
pub struct EdgeMailbox<I: TimeInstant, const N: usize> {
    inner: Mutex<RefCell<Inner<I, N>>>,
}

impl<I: TimeInstant, const N: usize> EdgeMailbox<I, N> {
    /// Creates an empty mailbox with the given debounce window.
    pub const fn new(debounce: I::Duration) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                filter: DebounceFilter::new(debounce),
                queue: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Records a raw edge. Call from the edge interrupt.
    ///
    /// Runs the debounce filter and queues the edge if it is accepted.
    /// Returns true when a stable edge was queued.
    pub fn on_edge(&self, raw_level: ButtonLevel, now: I) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let Some(edge) = inner.filter.observe(raw_level, now) else {
                return false;
            };

            if inner.queue.push_back(edge).is_err() {
                inner.dropped = inner.dropped.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("edge mailbox full, dropped {} edge", edge.level);
                return false;
            }
            true
        })
    }

    /// Removes the oldest queued edge. Call from the main loop.
    pub fn take(&self) -> Option<StableEdge<I>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).queue.pop_front())
    }

    /// Returns true when no edge is waiting.
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).queue.is_empty())
    }

    /// Number of edges lost to a full queue since start-up.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dropped)
    }

    /// The debounce window, for validating [`ButtonTiming`](crate::ButtonTiming).
    pub fn debounce_window(&self) -> I::Duration {
        critical_section::with(|cs| self.inner.borrow_ref(cs).filter.window())
    }

    /// The debounced level as last seen by the edge callback.
    pub fn stable_level(&self) -> ButtonLevel {
        critical_section::with(|cs| self.inner.borrow_ref(cs).filter.stable_level())
    }
}
