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

//! The engine that turns key identifiers into audible keystrokes.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::loader::{LoadedSample, SampleLoader};
use super::queue::PlaybackQueues;
use crate::audio;
use crate::config::keymap::KeyOverrides;
use crate::config::pack::SamplePack;
use crate::keys::SoundGroup;

/// The keystroke sound engine. Classifies keys, draws from the per-group
/// playback queues and hands the result to the audio device.
pub struct SoundEngine {
    /// The audio output used for playback.
    device: Arc<dyn audio::Device>,
    /// The per-group playback queues.
    queues: PlaybackQueues,
    /// Preloaded sample data by sample name.
    samples: HashMap<String, LoadedSample>,
    /// Per-key group overrides consulted before the built-in table.
    overrides: KeyOverrides,
}

impl SoundEngine {
    /// Creates an engine from already loaded parts.
    pub fn new(
        device: Arc<dyn audio::Device>,
        queues: PlaybackQueues,
        samples: HashMap<String, LoadedSample>,
        overrides: KeyOverrides,
    ) -> SoundEngine {
        SoundEngine {
            device,
            queues,
            samples,
            overrides,
        }
    }

    /// Loads the given sample pack into memory and creates an engine playing
    /// through the given device.
    pub fn load(
        device: Arc<dyn audio::Device>,
        pack: &SamplePack,
        base_path: &Path,
        overrides: KeyOverrides,
        target_sample_rate: u32,
    ) -> Result<SoundEngine, Box<dyn Error>> {
        let mut loader = SampleLoader::new(target_sample_rate);
        let samples = loader.load_pack(pack, base_path)?;
        let queues = PlaybackQueues::new(pack.group_sets());

        if !overrides.is_empty() {
            debug!(key_overrides = overrides.len(), "Key overrides active.");
        }
        info!(
            device = device.to_string(),
            samples = samples.len(),
            "Sound engine ready."
        );

        Ok(SoundEngine::new(device, queues, samples, overrides))
    }

    /// Classifies a key identifier, honoring configured overrides before the
    /// built-in table. Total over all inputs.
    pub fn classify(&self, key_id: &str) -> SoundGroup {
        self.overrides
            .get(key_id)
            .unwrap_or_else(|| SoundGroup::for_key(key_id))
    }

    /// Draws the next sample name for the given group from its playback
    /// queue.
    fn draw(&mut self, group: SoundGroup) -> Option<String> {
        self.queues.draw(group)
    }

    /// Plays the sound for a single keystroke. Playback failures are
    /// observed and dropped: a missed sound must never disturb the caller's
    /// input path, so nothing is raised, retried or logged here.
    pub fn play(&mut self, key_id: &str) {
        let group = self.classify(key_id);
        let Some(name) = self.draw(group) else {
            return;
        };
        let Some(sample) = self.samples.get(&name) else {
            warn!(sample = name, "Sample missing from preloaded pack");
            return;
        };

        let _ = self.device.play_sample(&name, sample);
    }

    /// The duration of the longest loaded sample. Useful for waiting out a
    /// one-shot playback before exiting.
    pub fn longest_sample(&self) -> Duration {
        self.samples
            .values()
            .map(LoadedSample::duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Debug for SoundEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundEngine")
            .field("device", &self.device.to_string())
            .field("samples", &self.samples.len())
            .field("overrides", &self.overrides.len())
            .finish()
    }
}
