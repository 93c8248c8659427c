//! Timer Module - Synthetic release scheduling
//!
//! Some keypads emit only a press signal and never a release. For those,
//! the adapter dispatches the press immediately and schedules a synthetic
//! release a fixed delay later. Entries are fire-and-forget: not
//! cancelable, not coalesced. Rapid repeated press-only signals produce
//! overlapping independent entries, and a well-behaved consumer treats
//! the duplicate releases as idempotent.
//!
//! The queue is drained explicitly by the host's event loop - all handler
//! registries are thread-local, so delivery must happen on the loop
//! thread rather than from a background timer.
//!
//! # API
//!
//! - `schedule_release(action, origin, now)` - Queue a synthetic release
//! - `pump(now)` - Dispatch every due release, returns count
//! - `pump_now()` - `pump` against the current instant
//! - `pending_releases()` - Number of queued entries
//! - `reset_timer_state()` - Clear the queue (for testing)
//!
//! # Example
//!
//! ```ignore
//! use dpad_adapter::timer;
//! use std::time::Duration;
//!
//! // Event loop
//! loop {
//!     if let Ok(Some(signal)) = dpad_adapter::terminal::poll_signal(Duration::from_millis(16)) {
//!         dpad_adapter::bus::emit(&signal);
//!     }
//!     timer::pump_now();
//! }
//! ```

use std::cell::RefCell;
use std::time::{Duration, Instant};

use crate::action::CanonicalAction;
use crate::dispatch;
use crate::event::RawKeySignal;

// =============================================================================
// PENDING RELEASES
// =============================================================================

/// Delay between a press-only signal and its synthetic release.
pub const RELEASE_DELAY: Duration = Duration::from_millis(120);

struct PendingRelease {
    due: Instant,
    action: CanonicalAction,
    origin: RawKeySignal,
}

thread_local! {
    static PENDING: RefCell<Vec<PendingRelease>> = RefCell::new(Vec::new());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Queue a synthetic release for `action`, due `RELEASE_DELAY` after `now`.
///
/// Each call queues an independent entry; nothing is deduplicated or
/// cancelled by later signals.
pub fn schedule_release(action: CanonicalAction, origin: RawKeySignal, now: Instant) {
    PENDING.with(|pending| {
        pending.borrow_mut().push(PendingRelease {
            due: now + RELEASE_DELAY,
            action,
            origin,
        });
    });
}

/// Dispatch every release whose deadline has passed, earliest first.
/// Returns the number of releases dispatched.
pub fn pump(now: Instant) -> usize {
    // Collect due entries first: dispatch runs arbitrary handlers, which
    // must not observe the queue mid-mutation.
    let mut due: Vec<PendingRelease> = PENDING.with(|pending| {
        let mut pending = pending.borrow_mut();
        let mut due = Vec::new();
        let mut i = 0;
        while i < pending.len() {
            if pending[i].due <= now {
                due.push(pending.remove(i));
            } else {
                i += 1;
            }
        }
        due
    });

    due.sort_by_key(|entry| entry.due);

    let count = due.len();
    for entry in due {
        dispatch::dispatch(entry.action, false, &entry.origin);
    }
    count
}

/// Dispatch every release due as of the current instant.
pub fn pump_now() -> usize {
    pump(Instant::now())
}

/// Number of queued synthetic releases.
pub fn pending_releases() -> usize {
    PENDING.with(|pending| pending.borrow().len())
}

/// Clear the queue without dispatching (for testing).
pub fn reset_timer_state() {
    PENDING.with(|pending| pending.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_timer_state();
        dispatch::reset_dispatch_state();
    }

    #[test]
    fn test_release_fires_after_delay() {
        setup();

        let releases = Rc::new(Cell::new(0));
        let releases_clone = releases.clone();
        let _cleanup = dispatch::on_action(move |notification| {
            if !notification.pressed {
                assert_eq!(notification.action, CanonicalAction::Down);
                releases_clone.set(releases_clone.get() + 1);
            }
            false
        });

        let start = Instant::now();
        schedule_release(
            CanonicalAction::Down,
            RawKeySignal::from_code(56, crate::event::SignalKind::Char),
            start,
        );
        assert_eq!(pending_releases(), 1);

        // Not yet due
        assert_eq!(pump(start + Duration::from_millis(119)), 0);
        assert_eq!(releases.get(), 0);

        // Due
        assert_eq!(pump(start + RELEASE_DELAY), 1);
        assert_eq!(releases.get(), 1);
        assert_eq!(pending_releases(), 0);

        // Fires exactly once
        assert_eq!(pump(start + Duration::from_secs(1)), 0);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_overlapping_entries_stay_independent() {
        setup();

        let releases = Rc::new(Cell::new(0));
        let releases_clone = releases.clone();
        let _cleanup = dispatch::on_action(move |notification| {
            if !notification.pressed {
                releases_clone.set(releases_clone.get() + 1);
            }
            false
        });

        let start = Instant::now();
        let origin = RawKeySignal::char_press("5");
        schedule_release(CanonicalAction::Space, origin.clone(), start);
        schedule_release(
            CanonicalAction::Space,
            origin.clone(),
            start + Duration::from_millis(50),
        );
        schedule_release(CanonicalAction::Space, origin, start + Duration::from_millis(100));
        assert_eq!(pending_releases(), 3);

        // First entry due, the other two still pending
        assert_eq!(pump(start + RELEASE_DELAY), 1);
        assert_eq!(pending_releases(), 2);

        // Remaining entries drain in due order
        assert_eq!(pump(start + Duration::from_millis(300)), 2);
        assert_eq!(releases.get(), 3);
    }

    #[test]
    fn test_pump_with_empty_queue() {
        setup();
        assert_eq!(pump(Instant::now()), 0);
    }
}
