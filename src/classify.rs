//! Classify Module - Raw signal to canonical action
//!
//! Maps an incoming raw key signal to one of the six canonical actions,
//! or `None` when the signal is not recognized (callers drop such signals
//! silently - an unrecognized key is not an error).
//!
//! Precedence, first match wins:
//!
//! 1. Symbolic name (`ArrowUp`, `Enter`, `" "`, ...)
//! 2. Standard legacy numeric code (38/40/37/39/13/32)
//! 3. Numeric-keypad fallback (2/8/4/6/5 digit keys on phones without arrows)
//!
//! Symbolic names are trusted over numeric codes because some platforms
//! populate both inconsistently. The keypad table exists only for devices
//! that never produce arrow keys at all.

use crate::action::CanonicalAction;
use crate::event::RawKeySignal;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classify a raw signal into a canonical action, or `None` for no match.
pub fn classify(signal: &RawKeySignal) -> Option<CanonicalAction> {
    if let Some(key) = signal.key.as_deref() {
        if let Some(action) = standard_name(key) {
            return Some(action);
        }
    }

    if let Some(code) = signal.code {
        return standard_code(code).or_else(|| keypad_fallback(code));
    }

    None
}

/// Match a standard symbolic key name.
fn standard_name(key: &str) -> Option<CanonicalAction> {
    match key {
        "ArrowUp" => Some(CanonicalAction::Up),
        "ArrowDown" => Some(CanonicalAction::Down),
        "ArrowLeft" => Some(CanonicalAction::Left),
        "ArrowRight" => Some(CanonicalAction::Right),
        "Enter" => Some(CanonicalAction::Enter),
        " " => Some(CanonicalAction::Space),
        _ => None,
    }
}

/// Match a standard legacy numeric key code.
fn standard_code(code: u32) -> Option<CanonicalAction> {
    match code {
        38 => Some(CanonicalAction::Up),
        40 => Some(CanonicalAction::Down),
        37 => Some(CanonicalAction::Left),
        39 => Some(CanonicalAction::Right),
        13 => Some(CanonicalAction::Enter),
        32 => Some(CanonicalAction::Space),
        _ => None,
    }
}

/// Keypad fallback for phones without arrow keys: digit keys 2/8/4/6
/// map to the arrows, 5 to the center/space action.
fn keypad_fallback(code: u32) -> Option<CanonicalAction> {
    match code {
        50 => Some(CanonicalAction::Up),    // '2'
        56 => Some(CanonicalAction::Down),  // '8'
        52 => Some(CanonicalAction::Left),  // '4'
        54 => Some(CanonicalAction::Right), // '6'
        53 => Some(CanonicalAction::Space), // '5'
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
