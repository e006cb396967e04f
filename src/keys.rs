// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Physical key classification.
//!
//! Keys are bucketed by the sample set they trigger, which approximates the
//! acoustic footprint of the physical key rather than its semantic role.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sound group a physical key belongs to. Each group has its own sample
/// set and playback queue.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoundGroup {
    /// Standard-size (1u) keys. The catch-all for anything not listed below.
    #[default]
    Standard,
    /// Left shift, tab and caps lock.
    Shift,
    /// Enter, backspace and right shift. Right shift is wider than left
    /// shift on the source keyboard and sounds like the enter key, not the
    /// left shift; the asymmetry is deliberate.
    Enter,
    /// The space bar.
    Spacebar,
}

impl SoundGroup {
    /// All groups, in a fixed order.
    pub const ALL: [SoundGroup; 4] = [
        SoundGroup::Standard,
        SoundGroup::Shift,
        SoundGroup::Enter,
        SoundGroup::Spacebar,
    ];

    /// Classifies a key identifier (a `KeyboardEvent.code`-style string such
    /// as `KeyA` or `ShiftLeft`) into its sound group. Total over all
    /// inputs: unrecognized keys fall through to [`SoundGroup::Standard`].
    pub fn for_key(key_id: &str) -> SoundGroup {
        match key_id {
            "Space" => SoundGroup::Spacebar,
            "Enter" | "ShiftRight" | "Backspace" => SoundGroup::Enter,
            "ShiftLeft" | "Tab" | "CapsLock" => SoundGroup::Shift,
            _ => SoundGroup::Standard,
        }
    }

    /// The group name as it appears in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            SoundGroup::Standard => "standard",
            SoundGroup::Shift => "shift",
            SoundGroup::Enter => "enter",
            SoundGroup::Spacebar => "spacebar",
        }
    }
}

impl fmt::Display for SoundGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::SoundGroup;

    #[test]
    fn test_classification() {
        assert_eq!(SoundGroup::Spacebar, SoundGroup::for_key("Space"));

        assert_eq!(SoundGroup::Enter, SoundGroup::for_key("Enter"));
        assert_eq!(SoundGroup::Enter, SoundGroup::for_key("ShiftRight"));
        assert_eq!(SoundGroup::Enter, SoundGroup::for_key("Backspace"));

        assert_eq!(SoundGroup::Shift, SoundGroup::for_key("ShiftLeft"));
        assert_eq!(SoundGroup::Shift, SoundGroup::for_key("Tab"));
        assert_eq!(SoundGroup::Shift, SoundGroup::for_key("CapsLock"));

        assert_eq!(SoundGroup::Standard, SoundGroup::for_key("KeyA"));
        assert_eq!(SoundGroup::Standard, SoundGroup::for_key("Digit1"));
        assert_eq!(SoundGroup::Standard, SoundGroup::for_key("Escape"));
    }

    #[test]
    fn test_classification_is_total() {
        // Arbitrary junk, including empty and non-ASCII identifiers, must
        // land somewhere rather than fail.
        for key in ["", " ", "space", "SHIFTLEFT", "nøkkel", "\0", "F13"] {
            assert_eq!(SoundGroup::Standard, SoundGroup::for_key(key));
        }
    }

    #[test]
    fn test_config_names_round_trip() {
        for group in SoundGroup::ALL {
            let yaml = serde_yml::to_string(&group).expect("serialize");
            assert_eq!(yaml.trim(), group.name());
            let parsed: SoundGroup = serde_yml::from_str(&yaml).expect("deserialize");
            assert_eq!(group, parsed);
        }
    }
}
