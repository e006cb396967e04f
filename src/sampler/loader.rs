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

//! Sample loading and caching.
//!
//! Keystroke samples are short one-shots, so every file in the pack is
//! decoded fully into memory at startup. Playback then never touches the
//! filesystem or a decoder.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use crate::config::pack::SamplePack;

/// Error type for sample loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Audio file error in {0}: {1}")]
    Audio(String, #[source] SymphoniaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported audio in {0}: {1}")]
    Unsupported(String, String),
}

/// A fully decoded sample. The data is interleaved f32 shared behind an Arc
/// so that every triggered voice reads the same allocation.
#[derive(Clone)]
pub struct LoadedSample {
    data: Arc<Vec<f32>>,
    channel_count: u16,
    sample_rate: u32,
}

impl LoadedSample {
    pub(crate) fn new(data: Vec<f32>, channel_count: u16, sample_rate: u32) -> LoadedSample {
        LoadedSample {
            data: Arc::new(data),
            channel_count,
            sample_rate,
        }
    }

    /// Returns the interleaved sample data.
    pub fn data(&self) -> Arc<Vec<f32>> {
        self.data.clone()
    }

    /// Returns the number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Returns the sample rate of the decoded data.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the playback duration of this sample.
    pub fn duration(&self) -> Duration {
        let frames = self.data.len() as f64 / self.channel_count.max(1) as f64;
        Duration::from_secs_f64(frames / self.sample_rate as f64)
    }

    /// Returns the memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

/// Manages loading and caching of sample data.
pub struct SampleLoader {
    /// Cache of loaded samples by file path.
    cache: HashMap<PathBuf, LoadedSample>,
    /// Target sample rate for transcoding (matches the audio output).
    target_sample_rate: u32,
}

impl SampleLoader {
    /// Creates a new sample loader.
    pub fn new(target_sample_rate: u32) -> SampleLoader {
        SampleLoader {
            cache: HashMap::new(),
            target_sample_rate,
        }
    }

    /// Loads a sample from a file into memory, returning a cached version if
    /// the file was loaded before.
    pub fn load(&mut self, path: &Path) -> Result<LoadedSample, LoadError> {
        if let Some(sample) = self.cache.get(path) {
            debug!(path = ?path, "Using cached sample");
            return Ok(sample.clone());
        }

        let (samples, channel_count, source_rate) = Self::decode(path)?;

        let (samples, sample_rate) = if source_rate != self.target_sample_rate {
            debug!(
                source_rate,
                target_rate = self.target_sample_rate,
                "Transcoding sample"
            );
            (
                Self::transcode_samples(&samples, channel_count, source_rate, self.target_sample_rate),
                self.target_sample_rate,
            )
        } else {
            (samples, source_rate)
        };

        let loaded = LoadedSample::new(samples, channel_count, sample_rate);

        info!(
            path = ?path,
            channels = channel_count,
            sample_rate,
            duration_ms = loaded.duration().as_millis(),
            memory_kb = loaded.memory_size() / 1024,
            "Sample loaded"
        );

        self.cache.insert(path.to_path_buf(), loaded.clone());
        Ok(loaded)
    }

    /// Loads every file referenced by the pack, keyed by the file name as it
    /// appears in the pack definition.
    pub fn load_pack(
        &mut self,
        pack: &SamplePack,
        base_path: &Path,
    ) -> Result<HashMap<String, LoadedSample>, LoadError> {
        let mut loaded = HashMap::new();
        for file in pack.all_files() {
            let full_path = pack.resolve(base_path, file);
            loaded.insert(file.to_string(), self.load(&full_path)?);
        }

        info!(
            samples = loaded.len(),
            memory_kb = self.total_memory_usage() / 1024,
            "Sample pack loaded"
        );
        Ok(loaded)
    }

    /// Returns the total memory used by cached samples.
    pub fn total_memory_usage(&self) -> usize {
        self.cache.values().map(|s| s.memory_size()).sum()
    }

    /// Decodes an entire audio file to interleaved f32 samples.
    fn decode(path: &Path) -> Result<(Vec<f32>, u16, u32), LoadError> {
        let display = path.display().to_string();

        let file = File::open(path).map_err(|e| {
            LoadError::Io(std::io::Error::new(e.kind(), format!("{}: {}", display, e)))
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| LoadError::Audio(display.clone(), e))?;
        let mut format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                LoadError::Unsupported(display.clone(), "no audio track found".to_string())
            })?;
        let track_id = track.id;
        let params = &track.codec_params;

        let sample_rate = params.sample_rate.ok_or_else(|| {
            LoadError::Unsupported(display.clone(), "sample rate not specified".to_string())
        })?;
        let mut channel_count = params.channels.map(|c| c.count() as u16).unwrap_or(0);

        let mut decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(|e| LoadError::Audio(display.clone(), e))?;

        let mut samples: Vec<f32> = Vec::new();
        loop {
            let packet = match format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                // Some decoders signal EOF with a decode error.
                Err(SymphoniaError::DecodeError(_)) => break,
                Err(e) => return Err(LoadError::Audio(display, e)),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    if channel_count == 0 {
                        channel_count = spec.channels.count() as u16;
                    }
                    let mut buffer =
                        SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buffer.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buffer.samples());
                }
                // A malformed packet mid-stream is skipped, not fatal.
                Err(SymphoniaError::DecodeError(_)) => continue,
                Err(e) => return Err(LoadError::Audio(display, e)),
            }
        }

        if channel_count == 0 || samples.is_empty() {
            return Err(LoadError::Unsupported(
                display,
                "no decodable audio data".to_string(),
            ));
        }

        Ok((samples, channel_count, sample_rate))
    }

    /// Transcodes samples from one sample rate to another using linear
    /// interpolation, which is sufficient for short one-shots.
    fn transcode_samples(
        samples: &[f32],
        channel_count: u16,
        source_rate: u32,
        target_rate: u32,
    ) -> Vec<f32> {
        let ratio = target_rate as f64 / source_rate as f64;
        let channels = channel_count as usize;
        let source_frames = samples.len() / channels;
        let target_frames = (source_frames as f64 * ratio).ceil() as usize;

        let mut output = Vec::with_capacity(target_frames * channels);

        for target_frame in 0..target_frames {
            let source_pos = target_frame as f64 / ratio;
            let source_frame = source_pos.floor() as usize;
            let frac = source_pos.fract() as f32;

            for channel in 0..channels {
                let idx0 = source_frame * channels + channel;
                let idx1 = (source_frame + 1) * channels + channel;

                let s0 = samples.get(idx0).copied().unwrap_or(0.0);
                let s1 = samples.get(idx1).copied().unwrap_or(s0);

                output.push(s0 + (s1 - s0) * frac);
            }
        }

        output
    }
}

impl std::fmt::Debug for SampleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleLoader")
            .field("cached_samples", &self.cache.len())
            .field("target_sample_rate", &self.target_sample_rate)
            .field("total_memory_kb", &(self.total_memory_usage() / 1024))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::write_wav;

    #[test]
    fn test_load_wav() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("click.wav");
        write_wav(&path, vec![vec![0.5, -0.5, 0.25, -0.25]], 44100)?;

        let mut loader = SampleLoader::new(44100);
        let sample = loader.load(&path)?;

        assert_eq!(1, sample.channel_count());
        assert_eq!(44100, sample.sample_rate());
        assert_eq!(4, sample.data().len());
        assert!((sample.data()[0] - 0.5).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_load_caches() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("click.wav");
        write_wav(&path, vec![vec![0.1; 100]], 44100)?;

        let mut loader = SampleLoader::new(44100);
        let first = loader.load(&path)?;
        let second = loader.load(&path)?;

        assert!(Arc::ptr_eq(&first.data(), &second.data()));
        assert_eq!(first.memory_size(), loader.total_memory_usage());
        Ok(())
    }

    #[test]
    fn test_load_transcodes_to_target_rate() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("click.wav");
        write_wav(&path, vec![vec![0.0; 4410]], 44100)?;

        let mut loader = SampleLoader::new(48000);
        let sample = loader.load(&path)?;

        assert_eq!(48000, sample.sample_rate());
        let expected_frames = (4410.0_f64 * 48000.0 / 44100.0).ceil() as usize;
        assert_eq!(expected_frames, sample.data().len());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let mut loader = SampleLoader::new(44100);
        let result = loader.load(Path::new("/nonexistent/click.wav"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_transcode_stereo_preserves_channels() {
        let samples = vec![1.0f32, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let result = SampleLoader::transcode_samples(&samples, 2, 44100, 48000);

        assert!(result.len() >= 8);
        assert!((result[0] - 1.0).abs() < 0.1);
        assert!((result[1] - (-1.0)).abs() < 0.1);
    }

    #[test]
    fn test_duration() {
        let sample = LoadedSample::new(vec![0.0; 44100 * 2], 2, 44100);
        assert_eq!(Duration::from_secs(1), sample.duration());
    }
}
