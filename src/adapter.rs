//! Adapter Module - Startup registration
//!
//! Wires the classifier and dispatcher into the raw-signal bus. `install`
//! attaches three capture-phase listeners - press, release, and the
//! press-only character variant - so the adapter observes and suppresses
//! signals before ordinary application listeners. Unrecognized signals
//! are left untouched and flow on to the bubble phase.
//!
//! There is no implicit load-time registration: the host calls `install`
//! deliberately and holds the returned handle for as long as the adapter
//! should live.
//!
//! # Example
//!
//! ```ignore
//! use dpad_adapter::adapter;
//!
//! let handle = adapter::install();
//!
//! // ... run the event loop, feeding bus::emit and timer::pump_now ...
//!
//! handle.cleanup();
//! ```

use std::time::Instant;

use crate::bus::{self, Phase};
use crate::classify::classify;
use crate::dispatch;
use crate::event::{RawKeySignal, SignalKind};
use crate::timer;

// =============================================================================
// ADAPTER HANDLE
// =============================================================================

/// Cleanup handle for the installed adapter listeners.
pub struct AdapterHandle {
    press_cleanup: Option<Box<dyn FnOnce()>>,
    release_cleanup: Option<Box<dyn FnOnce()>>,
    char_cleanup: Option<Box<dyn FnOnce()>>,
}

impl AdapterHandle {
    /// Detach all three listeners.
    pub fn cleanup(mut self) {
        if let Some(cleanup) = self.press_cleanup.take() {
            cleanup();
        }
        if let Some(cleanup) = self.release_cleanup.take() {
            cleanup();
        }
        if let Some(cleanup) = self.char_cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// INSTALL
// =============================================================================

/// Install the adapter: three capture-phase listeners on the raw-signal
/// bus. Returns a handle for cleanup.
///
/// # Listeners
///
/// - **Press**: classify, dispatch as pressed, consume
/// - **Release**: classify, dispatch as released, consume
/// - **Char** (press-only sources): classify, dispatch as pressed, then
///   schedule a synthetic release after [`timer::RELEASE_DELAY`]
///
/// A signal that classifies to no action is never consumed.
pub fn install() -> AdapterHandle {
    let press_cleanup = bus::on_raw(Phase::Capture, |signal| {
        if signal.kind != SignalKind::Press {
            return false;
        }
        handle_key(signal, true)
    });

    let release_cleanup = bus::on_raw(Phase::Capture, |signal| {
        if signal.kind != SignalKind::Release {
            return false;
        }
        handle_key(signal, false)
    });

    let char_cleanup = bus::on_raw(Phase::Capture, |signal| {
        if signal.kind != SignalKind::Char {
            return false;
        }
        let Some(action) = classify(signal) else {
            return false;
        };
        dispatch::dispatch(action, true, signal);
        timer::schedule_release(action, signal.clone(), Instant::now());
        true
    });

    tracing::info!("d-pad adapter installed");

    AdapterHandle {
        press_cleanup: Some(Box::new(press_cleanup)),
        release_cleanup: Some(Box::new(release_cleanup)),
        char_cleanup: Some(Box::new(char_cleanup)),
    }
}

/// Classify and dispatch one press/release signal.
/// Returns true if the signal was recognized (and therefore consumed).
fn handle_key(signal: &RawKeySignal, pressed: bool) -> bool {
    let Some(action) = classify(signal) else {
        return false;
    };
    dispatch::dispatch(action, pressed, signal);
    true
}

// =============================================================================
// TESTS
// =============================================================================
