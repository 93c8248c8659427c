//! Bus Module - Raw-signal delivery
//!
//! The shared path every raw key signal travels before anything interprets
//! it. Listeners register in one of two phases: capture listeners run first
//! (and in registration order), then bubble listeners. A listener returning
//! `true` consumes the signal - later listeners never see it. The adapter
//! installs its hooks in the capture phase so it can observe and suppress
//! signals before ordinary application listeners.
//!
//! # API
//!
//! - `on_raw(phase, handler)` - Subscribe to raw signals, returns disposer
//! - `emit(signal)` - Deliver a signal through both phases
//! - `reset_bus_state()` - Clear all listeners (for testing)
//!
//! # Example
//!
//! ```ignore
//! use dpad_adapter::bus::{self, Phase};
//! use dpad_adapter::RawKeySignal;
//!
//! let cleanup = bus::on_raw(Phase::Bubble, |signal| {
//!     println!("saw {:?}", signal.key);
//!     false // Don't consume
//! });
//!
//! bus::emit(&RawKeySignal::press("ArrowUp"));
//! cleanup();
//! ```

use std::cell::RefCell;

use crate::event::RawKeySignal;

// =============================================================================
// TYPES
// =============================================================================

/// Delivery phase for raw-signal listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Runs before all bubble listeners; the interception phase.
    Capture,
    /// Ordinary application listeners.
    Bubble,
}

/// Handler for raw signals. Return true to consume the signal.
pub type RawHandler = Box<dyn Fn(&RawKeySignal) -> bool>;

// =============================================================================
// REGISTRY
// =============================================================================

struct BusRegistry {
    capture: Vec<(usize, RawHandler)>,
    bubble: Vec<(usize, RawHandler)>,
    next_id: usize,
}

impl BusRegistry {
    fn new() -> Self {
        Self {
            capture: Vec::new(),
            bubble: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static BUS: RefCell<BusRegistry> = RefCell::new(BusRegistry::new());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to raw signals in the given phase.
/// Return true from the handler to consume the signal.
/// Returns cleanup function.
pub fn on_raw<F>(phase: Phase, handler: F) -> impl FnOnce()
where
    F: Fn(&RawKeySignal) -> bool + 'static,
{
    let id = BUS.with(|bus| {
        let mut bus = bus.borrow_mut();
        let id = bus.next_id();
        let list = match phase {
            Phase::Capture => &mut bus.capture,
            Phase::Bubble => &mut bus.bubble,
        };
        list.push((id, Box::new(handler)));
        id
    });

    move || {
        BUS.with(|bus| {
            let mut bus = bus.borrow_mut();
            let list = match phase {
                Phase::Capture => &mut bus.capture,
                Phase::Bubble => &mut bus.bubble,
            };
            list.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Deliver a signal: capture listeners first, then bubble listeners,
/// each in registration order. Stops at the first consuming listener.
/// Returns true if any listener consumed the signal.
pub fn emit(signal: &RawKeySignal) -> bool {
    BUS.with(|bus| {
        let bus = bus.borrow();

        for (_, handler) in &bus.capture {
            if handler(signal) {
                return true;
            }
        }

        for (_, handler) in &bus.bubble {
            if handler(signal) {
                return true;
            }
        }

        false
    })
}

/// Clear all listeners and reset ids (for testing).
pub fn reset_bus_state() {
    BUS.with(|bus| {
        let mut bus = bus.borrow_mut();
        bus.capture.clear();
        bus.bubble.clear();
        bus.next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================
