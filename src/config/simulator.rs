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
use serde::Deserialize;

use super::audio::Audio;
use super::keymap::KeyOverrides;
use super::pack::SamplePack;

/// The configuration for the typing-sound simulator. Every section is
/// optional: an empty config plays the built-in pack through the default
/// output device.
#[derive(Deserialize, Default)]
pub(super) struct Simulator {
    /// The audio output configuration.
    #[serde(default)]
    pub audio: Audio,

    /// The sample pack to play.
    #[serde(default)]
    pub pack: SamplePack,

    /// Per-key sound group overrides, applied before the built-in table.
    #[serde(default)]
    pub key_overrides: KeyOverrides,
}
