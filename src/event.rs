//! Event Module - Raw signals and broadcast payloads
//!
//! Types flowing through the adapter: the raw hardware signal coming in,
//! and the two payloads going out (structured notification + synthesized
//! standard key event).
//!
//! # API
//!
//! - `RawKeySignal` - Incoming platform signal (optional name, optional code)
//! - `SignalKind` - Press / Release / Char (press-only variant)
//! - `Modifiers` - Modifier key bitfield
//! - `ActionNotification` - Primary-channel broadcast payload
//! - `SynthKeyEvent` - Compatibility-channel broadcast payload

use crate::action::CanonicalAction;

// =============================================================================
// Modifiers (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Modifier key state as a bitfield.
    ///
    /// Combine with bitwise OR: `Modifiers::CTRL | Modifiers::SHIFT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const NONE = 0;
        const CTRL = 1 << 0;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
    }
}

// =============================================================================
// SIGNAL KIND
// =============================================================================

/// Polarity of a raw key signal.
///
/// `Char` is the press-only hardware variant: some keypads emit a single
/// character signal with no matching release, so the adapter synthesizes
/// the release itself (see the timer module).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Press,
    Release,
    Char,
}

impl Default for SignalKind {
    fn default() -> Self {
        Self::Press
    }
}

// =============================================================================
// RAW KEY SIGNAL
// =============================================================================

/// An incoming hardware key signal.
///
/// Carries an optional symbolic name (e.g. `"ArrowUp"`, `" "`) and an
/// optional legacy numeric code. Some platforms populate both, some only
/// one, and the two can disagree - classification trusts the name first.
/// Ephemeral: produced by the platform, consumed immediately, never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct RawKeySignal {
    /// Symbolic key name, if the platform reports one.
    pub key: Option<String>,
    /// Legacy numeric key code, if the platform reports one.
    pub code: Option<u32>,
    /// Press/release polarity (or `Char` for press-only sources).
    pub kind: SignalKind,
    /// Modifier keys held when the signal fired.
    pub modifiers: Modifiers,
}

impl RawKeySignal {
    /// Create a press signal with a symbolic name.
    pub fn press(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            code: None,
            kind: SignalKind::Press,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a release signal with a symbolic name.
    pub fn release(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            code: None,
            kind: SignalKind::Release,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a press-only character signal with a symbolic name.
    pub fn char_press(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            code: None,
            kind: SignalKind::Char,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a signal carrying only a numeric code.
    pub fn from_code(code: u32, kind: SignalKind) -> Self {
        Self {
            key: None,
            code: Some(code),
            kind,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach a numeric code to a signal that already has a name.
    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Reinterpret this signal as a press-only character signal.
    ///
    /// For hosts whose input source never reports key release.
    pub fn into_press_only(mut self) -> Self {
        self.kind = SignalKind::Char;
        self
    }
}

// =============================================================================
// BROADCAST PAYLOADS
// =============================================================================

/// Primary-channel payload: one classified action with its polarity and
/// the raw signal it came from. Immutable; no identity beyond the broadcast.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionNotification {
    pub action: CanonicalAction,
    pub pressed: bool,
    pub origin: RawKeySignal,
}

/// Compatibility-channel payload: a synthesized standard key signal for
/// consumers that only understand the stock keyboard vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthKeyEvent {
    /// Standard key name (`"ArrowUp"`, `"Enter"`, `" "`, ...).
    pub key: &'static str,
    pub pressed: bool,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_constructor() {
        let signal = RawKeySignal::press("ArrowUp");
        assert_eq!(signal.key.as_deref(), Some("ArrowUp"));
        assert_eq!(signal.code, None);
        assert_eq!(signal.kind, SignalKind::Press);
        assert_eq!(signal.modifiers, Modifiers::NONE);
    }

    #[test]
    fn test_from_code_constructor() {
        let signal = RawKeySignal::from_code(56, SignalKind::Char);
        assert_eq!(signal.key, None);
        assert_eq!(signal.code, Some(56));
        assert_eq!(signal.kind, SignalKind::Char);
    }

    #[test]
    fn test_with_code_keeps_name() {
        let signal = RawKeySignal::press("ArrowUp").with_code(38);
        assert_eq!(signal.key.as_deref(), Some("ArrowUp"));
        assert_eq!(signal.code, Some(38));
    }

    #[test]
    fn test_into_press_only() {
        let signal = RawKeySignal::press("ArrowDown").into_press_only();
        assert_eq!(signal.kind, SignalKind::Char);
    }

    #[test]
    fn test_modifier_flags_combine() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }
}
