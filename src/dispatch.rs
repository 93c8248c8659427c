//! Dispatch Module - Two-channel action broadcast
//!
//! Every classified action leaves the adapter on two channels, in order:
//!
//! 1. **Primary**: a structured `ActionNotification` delivered to action
//!    handlers. This is the reliable channel.
//! 2. **Compatibility**: a synthesized `SynthKeyEvent` with a standard key
//!    name, delivered to key handlers and (optionally) a platform key sink,
//!    for consumers that only understand stock keyboard input.
//!
//! Before either channel fires, the signal's default platform behavior is
//! suppressed through an optional host-installed hook. Suppression and sink
//! failures are logged at debug level and swallowed - an optional
//! enhancement never disturbs the primary channel.
//!
//! # API
//!
//! - `dispatch(action, pressed, origin)` - Broadcast on both channels
//! - `on_action(handler)` - Subscribe to the primary channel
//! - `on_synth(handler)` - Subscribe to all synthesized key events
//! - `on_key(key, handler)` - Subscribe to one synthesized key
//! - `set_key_sink(sink)` / `clear_key_sink()` - Platform key injection
//! - `set_default_suppressor(f)` / `clear_default_suppressor()`
//! - `reset_dispatch_state()` - Clear everything (for testing)
//!
//! # Example
//!
//! ```ignore
//! use dpad_adapter::dispatch;
//!
//! let cleanup = dispatch::on_action(|notification| {
//!     println!("{} pressed={}", notification.action, notification.pressed);
//!     false // Don't cancel
//! });
//!
//! // Legacy consumer that only knows arrow keys:
//! let cleanup2 = dispatch::on_key("ArrowUp", |event| {
//!     if event.pressed { /* move cursor */ }
//!     false
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use crate::action::CanonicalAction;
use crate::event::{ActionNotification, RawKeySignal, SynthKeyEvent};

// =============================================================================
// TYPES
// =============================================================================

/// Handler for action notifications. Return true to cancel propagation
/// to later action handlers (the compatibility channel still fires).
pub type ActionHandler = Box<dyn Fn(&ActionNotification) -> bool>;

/// Handler for synthesized key events. Return true to stop propagation.
pub type SynthKeyHandler = Box<dyn Fn(&SynthKeyEvent) -> bool>;

/// Platform hook that injects a synthesized key event into a native input
/// stream (e.g. a pty). Injection may be forbidden by the platform; errors
/// are swallowed and the handler channels are unaffected.
pub trait KeySink {
    fn emit(&self, event: &SynthKeyEvent) -> io::Result<()>;
}

/// Host hook that suppresses a raw signal's default platform behavior
/// (page scroll, navigation, ...). Best-effort.
pub type Suppressor = Box<dyn Fn(&RawKeySignal) -> io::Result<()>>;

// =============================================================================
// REGISTRY
// =============================================================================

struct DispatchRegistry {
    action_handlers: Vec<(usize, ActionHandler)>,
    synth_handlers: Vec<(usize, SynthKeyHandler)>,
    key_handlers: HashMap<&'static str, Vec<(usize, SynthKeyHandler)>>,
    next_id: usize,
}

impl DispatchRegistry {
    fn new() -> Self {
        Self {
            action_handlers: Vec::new(),
            synth_handlers: Vec::new(),
            key_handlers: HashMap::new(),
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
    static REGISTRY: RefCell<DispatchRegistry> = RefCell::new(DispatchRegistry::new());
    static KEY_SINK: RefCell<Option<Box<dyn KeySink>>> = RefCell::new(None);
    static SUPPRESSOR: RefCell<Option<Suppressor>> = RefCell::new(None);
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Broadcast a classified action on both channels.
///
/// Order: suppress the origin's default behavior (best-effort), notify
/// action handlers, then synthesize the standard key event. Cancellation
/// on the primary channel never skips the compatibility channel.
pub fn dispatch(action: CanonicalAction, pressed: bool, origin: &RawKeySignal) {
    suppress_default(origin);

    let notification = ActionNotification {
        action,
        pressed,
        origin: origin.clone(),
    };
    notify_action_handlers(&notification);

    synthesize_key(action, pressed);
}

/// Attempt to suppress the signal's default platform behavior.
/// Failure is logged and ignored.
fn suppress_default(origin: &RawKeySignal) {
    SUPPRESSOR.with(|hook| {
        if let Some(suppress) = hook.borrow().as_ref() {
            if let Err(err) = suppress(origin) {
                tracing::debug!(?err, "default suppression failed; continuing");
            }
        }
    });
}

/// Deliver a notification to action handlers, stopping at the first
/// handler that cancels.
fn notify_action_handlers(notification: &ActionNotification) {
    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        for (_, handler) in &reg.action_handlers {
            if handler(notification) {
                break;
            }
        }
    });
}

/// Build and deliver the synthesized standard key event: key-specific
/// handlers first, then global synth handlers, then the platform sink.
fn synthesize_key(action: CanonicalAction, pressed: bool) {
    let event = SynthKeyEvent {
        key: action.synth_key(),
        pressed,
    };

    let consumed = REGISTRY.with(|reg| {
        let reg = reg.borrow();

        if let Some(handlers) = reg.key_handlers.get(event.key) {
            for (_, handler) in handlers {
                if handler(&event) {
                    return true;
                }
            }
        }

        for (_, handler) in &reg.synth_handlers {
            if handler(&event) {
                return true;
            }
        }

        false
    });

    // The sink models native injection; a consumed event stays in-process.
    if !consumed {
        KEY_SINK.with(|sink| {
            if let Some(sink) = sink.borrow().as_ref() {
                if let Err(err) = sink.emit(&event) {
                    tracing::debug!(?err, key = event.key, "key sink rejected synthesized event");
                }
            }
        });
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Subscribe to action notifications (primary channel).
/// Return true from the handler to cancel propagation to later handlers.
/// Returns cleanup function.
pub fn on_action<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&ActionNotification) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.action_handlers.push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.action_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to all synthesized key events (compatibility channel).
/// Returns cleanup function.
pub fn on_synth<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&SynthKeyEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.synth_handlers.push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.synth_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to one synthesized key by its standard name.
/// Returns cleanup function.
pub fn on_key<F>(key: &'static str, handler: F) -> impl FnOnce()
where
    F: Fn(&SynthKeyEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers
            .entry(key)
            .or_default()
            .push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.key_handlers.get_mut(key) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.key_handlers.remove(key);
                }
            }
        });
    }
}

// =============================================================================
// HOST HOOKS
// =============================================================================

/// Install the platform key sink. Replaces any previous sink.
pub fn set_key_sink(sink: Box<dyn KeySink>) {
    KEY_SINK.with(|slot| *slot.borrow_mut() = Some(sink));
}

/// Remove the platform key sink.
pub fn clear_key_sink() {
    KEY_SINK.with(|slot| *slot.borrow_mut() = None);
}

/// Install the default-behavior suppressor hook. Replaces any previous hook.
pub fn set_default_suppressor<F>(suppress: F)
where
    F: Fn(&RawKeySignal) -> io::Result<()> + 'static,
{
    SUPPRESSOR.with(|slot| *slot.borrow_mut() = Some(Box::new(suppress)));
}

/// Remove the default-behavior suppressor hook.
pub fn clear_default_suppressor() {
    SUPPRESSOR.with(|slot| *slot.borrow_mut() = None);
}

/// Clear all handlers and hooks (for testing).
pub fn reset_dispatch_state() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.action_handlers.clear();
        reg.synth_handlers.clear();
        reg.key_handlers.clear();
        reg.next_id = 0;
    });
    clear_key_sink();
    clear_default_suppressor();
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
        reset_dispatch_state();
    }

    #[test]
    fn test_primary_channel_payload() {
        setup();

        let seen = Rc::new(RefCell::new(None));
        let seen_clone = seen.clone();
        let _cleanup = on_action(move |notification| {
            *seen_clone.borrow_mut() = Some(notification.clone());
            false
        });

        let origin = RawKeySignal::press("Enter");
        dispatch(CanonicalAction::Enter, true, &origin);

        let notification = seen.borrow().clone().unwrap();
        assert_eq!(notification.action, CanonicalAction::Enter);
        assert!(notification.pressed);
        assert_eq!(notification.origin, origin);
    }

    #[test]
    fn test_both_channels_fire() {
        setup();

        let actions = Rc::new(Cell::new(0));
        let keys = Rc::new(Cell::new(0));

        let actions_clone = actions.clone();
        let _a = on_action(move |_| {
            actions_clone.set(actions_clone.get() + 1);
            false
        });

        let keys_clone = keys.clone();
        let _k = on_key("Enter", move |event| {
            assert!(event.pressed);
            keys_clone.set(keys_clone.get() + 1);
            false
        });

        dispatch(CanonicalAction::Enter, true, &RawKeySignal::press("Enter"));
        assert_eq!(actions.get(), 1);
        assert_eq!(keys.get(), 1);
    }

    #[test]
    fn test_cancel_stops_later_action_handlers_only() {
        setup();

        let _first = on_action(|_| true); // Cancel

        let reached = Rc::new(Cell::new(false));
        let reached_clone = reached.clone();
        let _second = on_action(move |_| {
            reached_clone.set(true);
            false
        });

        let synth = Rc::new(Cell::new(false));
        let synth_clone = synth.clone();
        let _s = on_synth(move |_| {
            synth_clone.set(true);
            false
        });

        dispatch(CanonicalAction::Up, true, &RawKeySignal::press("ArrowUp"));

        assert!(!reached.get()); // Later action handler skipped
        assert!(synth.get()); // Compatibility channel still fired
    }

    #[test]
    fn test_synth_key_names() {
        setup();

        let last = Rc::new(RefCell::new(None));
        let last_clone = last.clone();
        let _s = on_synth(move |event| {
            *last_clone.borrow_mut() = Some(*event);
            false
        });

        dispatch(CanonicalAction::Space, false, &RawKeySignal::release(" "));
        let event = last.borrow().unwrap();
        assert_eq!(event.key, " ");
        assert!(!event.pressed);
    }

    #[test]
    fn test_failing_sink_does_not_disturb_primary_channel() {
        setup();

        struct RejectingSink;
        impl KeySink for RejectingSink {
            fn emit(&self, _event: &SynthKeyEvent) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::Unsupported, "injection forbidden"))
            }
        }
        set_key_sink(Box::new(RejectingSink));

        let actions = Rc::new(Cell::new(0));
        let actions_clone = actions.clone();
        let _a = on_action(move |_| {
            actions_clone.set(actions_clone.get() + 1);
            false
        });

        dispatch(CanonicalAction::Enter, true, &RawKeySignal::press("Enter"));
        assert_eq!(actions.get(), 1);
    }

    #[test]
    fn test_failing_suppressor_is_swallowed() {
        setup();

        set_default_suppressor(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "cannot suppress"))
        });

        let actions = Rc::new(Cell::new(0));
        let actions_clone = actions.clone();
        let _a = on_action(move |_| {
            actions_clone.set(actions_clone.get() + 1);
            false
        });

        dispatch(CanonicalAction::Down, true, &RawKeySignal::press("ArrowDown"));
        assert_eq!(actions.get(), 1);
    }

    #[test]
    fn test_sink_receives_unconsumed_events() {
        setup();

        let emitted = Rc::new(RefCell::new(Vec::new()));

        struct RecordingSink(Rc<RefCell<Vec<SynthKeyEvent>>>);
        impl KeySink for RecordingSink {
            fn emit(&self, event: &SynthKeyEvent) -> io::Result<()> {
                self.0.borrow_mut().push(*event);
                Ok(())
            }
        }
        set_key_sink(Box::new(RecordingSink(emitted.clone())));

        dispatch(CanonicalAction::Left, true, &RawKeySignal::press("ArrowLeft"));

        let events = emitted.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, "ArrowLeft");
        assert!(events[0].pressed);
    }

    #[test]
    fn test_cleanup_removes_action_handler() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = on_action(move |_| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        dispatch(CanonicalAction::Up, true, &RawKeySignal::press("ArrowUp"));
        assert_eq!(count.get(), 1);

        cleanup();

        dispatch(CanonicalAction::Up, true, &RawKeySignal::press("ArrowUp"));
        assert_eq!(count.get(), 1);
    }
}
