//! # dpad-adapter
//!
//! Keypad/d-pad input normalization for hosts that receive feature-phone
//! style key signals.
//!
//! Raw key signals - which may carry a symbolic name, a legacy numeric
//! code, or both, inconsistently - are classified into a closed set of six
//! canonical actions (`up`, `down`, `left`, `right`, `enter`, `space`) and
//! re-broadcast on two channels: a structured [`ActionNotification`] for
//! action-aware consumers, and a synthesized [`SynthKeyEvent`] with a
//! standard key name for consumers that only understand stock keyboard
//! input. Keypads that emit press-only signals get a synthetic release a
//! fixed delay later.
//!
//! Everything is single-threaded and event-driven: the host feeds signals
//! into [`bus::emit`] and drains pending synthetic releases with
//! [`timer::pump_now`] from its event loop.
//!
//! ## Modules
//!
//! - [`action`] - The canonical action vocabulary
//! - [`event`] - Raw signals and broadcast payloads
//! - [`classify`] - Signal-to-action classification
//! - [`bus`] - Raw-signal delivery with capture/bubble phases
//! - [`dispatch`] - Two-channel broadcast with host hooks
//! - [`timer`] - Synthetic release scheduling for press-only sources
//! - [`adapter`] - Installation and lifecycle
//! - [`terminal`] - crossterm bridge for terminal hosts
//! - [`response`] - Checked JSON response parsing (collaborator)
//!
//! ## Example
//!
//! ```ignore
//! use dpad_adapter::{adapter, bus, dispatch, terminal, timer};
//! use std::time::Duration;
//!
//! let handle = adapter::install();
//!
//! let _cleanup = dispatch::on_action(|notification| {
//!     println!("{} pressed={}", notification.action, notification.pressed);
//!     false
//! });
//!
//! loop {
//!     if let Ok(Some(signal)) = terminal::poll_signal(Duration::from_millis(16)) {
//!         bus::emit(&signal);
//!     }
//!     timer::pump_now();
//! }
//! ```

pub mod action;
pub mod adapter;
pub mod bus;
pub mod classify;
pub mod dispatch;
pub mod event;
pub mod response;
pub mod terminal;
pub mod timer;

// Re-export commonly used items
pub use action::CanonicalAction;

pub use event::{ActionNotification, Modifiers, RawKeySignal, SignalKind, SynthKeyEvent};

pub use classify::classify;

pub use bus::{emit, on_raw, Phase};

pub use dispatch::{
    dispatch, on_action, on_key, on_synth, set_default_suppressor, set_key_sink, KeySink,
};

pub use timer::{pending_releases, pump, pump_now, schedule_release, RELEASE_DELAY};

pub use adapter::{install, AdapterHandle};

pub use response::{parse_json, RawResponse, ResponseError};
