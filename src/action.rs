//! Action Module - Canonical action vocabulary
//!
//! The closed set of normalized input outcomes this crate produces.
//! Every classified raw signal maps to exactly one of these six actions;
//! nothing in the crate ever emits a value outside the set.
//!
//! # API
//!
//! - `CanonicalAction` - The six-variant action enum
//! - `as_str()` - Canonical lowercase name (`"up"`, `"enter"`, ...)
//! - `synth_key()` - Standard key name used on the compatibility channel
//! - `ALL` - All six actions, for iteration

use std::fmt;

// =============================================================================
// CANONICAL ACTION
// =============================================================================

/// One of the six normalized input outcomes.
///
/// A value type - produced by classification, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalAction {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
}

impl CanonicalAction {
    /// All six actions, in documentation order.
    pub const ALL: [CanonicalAction; 6] = [
        CanonicalAction::Up,
        CanonicalAction::Down,
        CanonicalAction::Left,
        CanonicalAction::Right,
        CanonicalAction::Enter,
        CanonicalAction::Space,
    ];

    /// Canonical lowercase name, as carried in notifications.
    pub const fn as_str(self) -> &'static str {
        match self {
            CanonicalAction::Up => "up",
            CanonicalAction::Down => "down",
            CanonicalAction::Left => "left",
            CanonicalAction::Right => "right",
            CanonicalAction::Enter => "enter",
            CanonicalAction::Space => "space",
        }
    }

    /// Standard key name synthesized on the compatibility channel,
    /// for consumers that only understand the stock keyboard vocabulary.
    pub const fn synth_key(self) -> &'static str {
        match self {
            CanonicalAction::Up => "ArrowUp",
            CanonicalAction::Down => "ArrowDown",
            CanonicalAction::Left => "ArrowLeft",
            CanonicalAction::Right => "ArrowRight",
            CanonicalAction::Enter => "Enter",
            CanonicalAction::Space => " ",
        }
    }
}

impl fmt::Display for CanonicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        let names: Vec<&str> = CanonicalAction::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(names, ["up", "down", "left", "right", "enter", "space"]);
    }

    #[test]
    fn test_synth_keys_are_standard_vocabulary() {
        let keys: Vec<&str> = CanonicalAction::ALL.iter().map(|a| a.synth_key()).collect();
        assert_eq!(
            keys,
            ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Enter", " "]
        );
    }

    #[test]
    fn test_display_matches_as_str() {
        for action in CanonicalAction::ALL {
            assert_eq!(action.to_string(), action.as_str());
        }
    }
}
