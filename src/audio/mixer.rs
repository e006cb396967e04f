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

//! One-shot voice mixing, independent of any audio backend.
//!
//! New voices arrive over a channel and are drained inside the mix call, so
//! the triggering side never contends with the output callback for long.

use parking_lot::Mutex;

use crate::sampler::LoadedSample;

/// Channel used to hand new voices to the mixer.
pub type VoiceSender = crossbeam_channel::Sender<Voice>;

/// A single playing instance of a sample.
pub struct Voice {
    data: std::sync::Arc<Vec<f32>>,
    channel_count: usize,
    /// Current playback position in frames.
    position: usize,
}

impl Voice {
    /// Creates a voice at the start of the given sample.
    pub fn new(sample: &LoadedSample) -> Voice {
        Voice {
            data: sample.data(),
            channel_count: sample.channel_count().max(1) as usize,
            position: 0,
        }
    }

    fn is_finished(&self) -> bool {
        self.position * self.channel_count >= self.data.len()
    }

    /// Adds this voice into the interleaved output buffer, advancing the
    /// playback position. Mono voices are duplicated across all output
    /// channels; other mismatches map channel-for-channel with the voice's
    /// last channel filling the remainder.
    fn mix_into(&mut self, output: &mut [f32], output_channels: usize, volume: f32) {
        for frame in output.chunks_mut(output_channels) {
            if self.is_finished() {
                return;
            }

            let base = self.position * self.channel_count;
            for (channel, out) in frame.iter_mut().enumerate() {
                let source_channel = channel.min(self.channel_count - 1);
                *out += self.data[base + source_channel] * volume;
            }
            self.position += 1;
        }
    }
}

/// Sums active one-shot voices into an output buffer.
pub struct Mixer {
    /// Voices currently sounding. Locked only by the mix call and the
    /// occasional introspection.
    voices: Mutex<Vec<Voice>>,
    /// Incoming voices from play_sample calls.
    voice_rx: crossbeam_channel::Receiver<Voice>,
    num_channels: u16,
    sample_rate: u32,
    volume: f32,
}

impl Mixer {
    /// Creates a new mixer and the sender used to trigger voices on it.
    pub fn new(num_channels: u16, sample_rate: u32, volume: f32) -> (Mixer, VoiceSender) {
        let (voice_tx, voice_rx) = crossbeam_channel::unbounded();
        (
            Mixer {
                voices: Mutex::new(Vec::new()),
                voice_rx,
                num_channels,
                sample_rate,
                volume,
            },
            voice_tx,
        )
    }

    /// Mixes all active voices into the interleaved output buffer,
    /// overwriting its contents. Finished voices are dropped.
    pub fn mix_into(&self, output: &mut [f32]) {
        output.fill(0.0);

        let mut voices = self.voices.lock();
        while let Ok(voice) = self.voice_rx.try_recv() {
            voices.push(voice);
        }

        let output_channels = self.num_channels as usize;
        for voice in voices.iter_mut() {
            voice.mix_into(output, output_channels, self.volume);
        }
        voices.retain(|voice| !voice.is_finished());
    }

    /// The number of voices currently sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.lock().len()
    }

    /// Gets the number of output channels.
    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    /// Gets the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
