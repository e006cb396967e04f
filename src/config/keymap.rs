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
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::keys::SoundGroup;

/// Per-key sound group overrides, keyed by key identifier. Overrides are
/// consulted before the built-in classification table; keys not listed here
/// classify as usual, so classification stays total.
#[derive(Deserialize, Clone, Serialize, Debug, Default)]
#[serde(transparent)]
pub struct KeyOverrides(HashMap<String, SoundGroup>);

impl KeyOverrides {
    /// Gets the override for a key identifier, if any.
    pub fn get(&self, key_id: &str) -> Option<SoundGroup> {
        self.0.get(key_id).copied()
    }

    /// The number of overridden keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no keys are overridden.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl KeyOverrides {
    /// Creates overrides from a plain map (test only).
    pub fn new(overrides: HashMap<String, SoundGroup>) -> KeyOverrides {
        KeyOverrides(overrides)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let overrides: KeyOverrides = serde_yml::from_str(
            r#"
IntlBackslash: shift
NumpadEnter: enter
"#,
        )
        .expect("overrides should parse");

        assert_eq!(2, overrides.len());
        assert_eq!(Some(SoundGroup::Shift), overrides.get("IntlBackslash"));
        assert_eq!(Some(SoundGroup::Enter), overrides.get("NumpadEnter"));
        assert_eq!(None, overrides.get("KeyA"));
    }

    #[test]
    fn test_default_is_empty() {
        assert!(KeyOverrides::default().is_empty());
    }
}
