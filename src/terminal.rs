//! Terminal Module - crossterm bridge
//!
//! Converts crossterm key events into raw key signals so a terminal host
//! can feed the bus directly. Symbolic names follow the standard keyboard
//! vocabulary (`ArrowUp`, `Enter`, `" "`, single characters as
//! themselves); legacy numeric codes are attached where the standard
//! defines them.
//!
//! Most terminals never report key release. Hosts on such terminals can
//! convert signals with [`RawKeySignal::into_press_only`] so the adapter
//! synthesizes releases itself.
//!
//! # API
//!
//! - `convert_key_event` - crossterm KeyEvent to RawKeySignal
//! - `poll_signal` - Non-blocking key check with timeout
//! - `read_signal` - Blocking key read
//!
//! # Example
//!
//! ```ignore
//! use dpad_adapter::{adapter, bus, terminal, timer};
//! use std::time::Duration;
//!
//! let handle = adapter::install();
//! loop {
//!     if let Ok(Some(signal)) = terminal::poll_signal(Duration::from_millis(16)) {
//!         bus::emit(&signal.into_press_only());
//!     }
//!     timer::pump_now();
//! }
//! ```

use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    poll, read,
};

use crate::event::{Modifiers, RawKeySignal, SignalKind};

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm KeyEvent to a RawKeySignal.
///
/// `Repeat` is treated as `Press`; a held d-pad key is just repeated
/// presses to this adapter.
pub fn convert_key_event(event: CrosstermKeyEvent) -> RawKeySignal {
    let kind = match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => SignalKind::Press,
        KeyEventKind::Release => SignalKind::Release,
    };

    RawKeySignal {
        key: key_name(event.code),
        code: legacy_code(event.code),
        kind,
        modifiers: convert_modifiers(event.modifiers),
    }
}

/// Symbolic name for a key code, if the standard vocabulary has one.
fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Enter => Some("Enter".to_string()),
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Tab => Some("Tab".to_string()),
        KeyCode::Backspace => Some("Backspace".to_string()),
        KeyCode::Esc => Some("Escape".to_string()),
        _ => None,
    }
}

/// Legacy numeric key code, where the standard defines one.
///
/// ASCII alphanumerics carry their uppercase character code, which is
/// what puts keypad digits 2/8/4/6/5 in reach of the fallback table.
fn legacy_code(code: KeyCode) -> Option<u32> {
    match code {
        KeyCode::Char(' ') => Some(32),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u32),
        KeyCode::Enter => Some(13),
        KeyCode::Up => Some(38),
        KeyCode::Down => Some(40),
        KeyCode::Left => Some(37),
        KeyCode::Right => Some(39),
        _ => None,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers.
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(KeyModifiers::SUPER) {
        out |= Modifiers::META;
    }
    out
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a key signal with timeout.
/// Returns None if no key event arrived within the timeout
/// (non-key events are discarded).
pub fn poll_signal(timeout: Duration) -> std::io::Result<Option<RawKeySignal>> {
    if poll(timeout)? {
        match read()? {
            CrosstermEvent::Key(key) => Ok(Some(convert_key_event(key))),
            _ => Ok(None),
        }
    } else {
        Ok(None)
    }
}

/// Read the next key signal (blocking), discarding non-key events.
pub fn read_signal() -> std::io::Result<RawKeySignal> {
    loop {
        if let CrosstermEvent::Key(key) = read()? {
            return Ok(convert_key_event(key));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: KeyCode, kind: KeyEventKind) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_arrows() {
        let cases = [
            (KeyCode::Up, "ArrowUp", 38),
            (KeyCode::Down, "ArrowDown", 40),
            (KeyCode::Left, "ArrowLeft", 37),
            (KeyCode::Right, "ArrowRight", 39),
        ];

        for (code, name, legacy) in cases {
            let signal = convert_key_event(key_event(code, KeyEventKind::Press));
            assert_eq!(signal.key.as_deref(), Some(name));
            assert_eq!(signal.code, Some(legacy));
            assert_eq!(signal.kind, SignalKind::Press);
        }
    }

    #[test]
    fn test_convert_enter_and_space() {
        let enter = convert_key_event(key_event(KeyCode::Enter, KeyEventKind::Press));
        assert_eq!(enter.key.as_deref(), Some("Enter"));
        assert_eq!(enter.code, Some(13));

        let space = convert_key_event(key_event(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(space.key.as_deref(), Some(" "));
        assert_eq!(space.code, Some(32));
    }

    #[test]
    fn test_convert_keypad_digits() {
        // Keypad phones report digit characters; the fallback table works
        // off the legacy character codes.
        let cases = [('2', 50), ('8', 56), ('4', 52), ('6', 54), ('5', 53)];

        for (c, legacy) in cases {
            let signal = convert_key_event(key_event(KeyCode::Char(c), KeyEventKind::Press));
            assert_eq!(signal.key.as_deref(), Some(c.to_string().as_str()));
            assert_eq!(signal.code, Some(legacy));
        }
    }

    #[test]
    fn test_convert_release_and_repeat() {
        let release = convert_key_event(key_event(KeyCode::Up, KeyEventKind::Release));
        assert_eq!(release.kind, SignalKind::Release);

        let repeat = convert_key_event(key_event(KeyCode::Up, KeyEventKind::Repeat));
        assert_eq!(repeat.kind, SignalKind::Press);
    }

    #[test]
    fn test_convert_modifiers() {
        let event = CrosstermKeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };

        let signal = convert_key_event(event);
        assert!(signal.modifiers.contains(Modifiers::CTRL));
        assert!(signal.modifiers.contains(Modifiers::SHIFT));
        assert!(!signal.modifiers.contains(Modifiers::ALT));
    }

    #[test]
    fn test_unnamed_keys_have_no_signal_content() {
        let signal = convert_key_event(key_event(KeyCode::F(5), KeyEventKind::Press));
        assert_eq!(signal.key, None);
        assert_eq!(signal.code, None);
    }
}
