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
use std::{error::Error, fmt, sync::Arc, thread, time::Duration};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info};

use crate::audio::mixer::{Mixer, Voice, VoiceSender};
use crate::audio::Device as AudioDevice;
use crate::config;
use crate::sampler::LoadedSample;

/// A small wrapper around a cpal::Device. Holds the continuous output
/// stream's mixer so keystroke samples can be triggered at any time.
pub struct Device {
    /// The name of the device.
    name: String,
    /// The maximum number of output channels the device supports.
    max_channels: u16,
    /// The host ID of the device.
    host_id: cpal::HostId,
    /// The underlying cpal device.
    device: cpal::Device,
    /// Sender feeding voices to the running output stream. None until the
    /// device has been started via get().
    voice_tx: Option<VoiceSender>,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.max_channels,
            self.host_id.name()
        )
    }
}

/// Builds an output stream that converts the mixer's f32 frames into the
/// stream's sample format.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Arc<Mixer>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut scratch = vec![0.0f32; data.len()];
            mixer.mix_into(&mut scratch);

            for (dst, &src) in data.iter_mut().zip(scratch.iter()) {
                *dst = T::from_sample(src);
            }
        },
        |err| error!("Output stream error: {}", err),
        None,
    )
}

impl Device {
    /// Lists cpal devices and produces the Device trait.
    pub fn list() -> Result<Vec<Box<dyn AudioDevice>>, Box<dyn Error>> {
        Ok(Device::list_cpal_devices()?
            .into_iter()
            .map(|device| {
                let device: Box<dyn AudioDevice> = Box::new(device);
                device
            })
            .collect())
    }

    /// Lists cpal devices.
    fn list_cpal_devices() -> Result<Vec<Device>, Box<dyn Error>> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices: Vec<Device> = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            for device in host_devices {
                let mut max_channels = 0;

                let output_configs = device.supported_output_configs();
                if output_configs.is_err() {
                    continue;
                }

                for output_config in device.supported_output_configs()? {
                    if max_channels < output_config.channels() {
                        max_channels = output_config.channels();
                    }
                }

                if max_channels > 0 {
                    devices.push(Device {
                        name: device.name()?,
                        max_channels,
                        host_id,
                        device,
                        voice_tx: None,
                    })
                }
            }
        }

        devices.sort_by_key(|device| device.name.to_string());
        Ok(devices)
    }

    /// Gets the cpal device described by the configuration and starts its
    /// output stream.
    pub fn get(config: &config::audio::Audio) -> Result<Device, Box<dyn Error>> {
        let name = config.device();
        let found = if name == "default" {
            Self::default_device()?
        } else {
            Device::list_cpal_devices()?
                .into_iter()
                .find(|device| device.name.trim() == name)
        };

        match found {
            Some(mut device) => {
                let channels = config.channels().min(device.max_channels);
                let (mixer, voice_tx) =
                    Mixer::new(channels, config.sample_rate(), config.volume());

                Self::start_output_thread(device.device.clone(), Arc::new(mixer));
                device.voice_tx = Some(voice_tx);

                info!(
                    device = device.name,
                    channels,
                    sample_rate = config.sample_rate(),
                    "Audio device ready."
                );
                Ok(device)
            }
            None => Err(format!("no device found with name {}", name).into()),
        }
    }

    /// The default host's default output device.
    fn default_device() -> Result<Option<Device>, Box<dyn Error>> {
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let host = cpal::default_host();
        let Some(device) = host.default_output_device() else {
            return Ok(None);
        };

        let max_channels = device
            .supported_output_configs()?
            .map(|config| config.channels())
            .max()
            .unwrap_or(0);
        if max_channels == 0 {
            return Ok(None);
        }

        Ok(Some(Device {
            name: device.name()?,
            max_channels,
            host_id: host.id(),
            device,
            voice_tx: None,
        }))
    }

    /// Starts the thread that owns the output stream. The stream is created
    /// inside the thread because it is not Send.
    fn start_output_thread(device: cpal::Device, mixer: Arc<Mixer>) {
        thread::spawn(move || {
            let stream_config = cpal::StreamConfig {
                channels: mixer.num_channels(),
                sample_rate: mixer.sample_rate(),
                buffer_size: cpal::BufferSize::Default,
            };

            let sample_format = match device.default_output_config() {
                Ok(config) => config.sample_format(),
                Err(e) => {
                    error!("Unable to query output config: {}", e);
                    return;
                }
            };

            let stream_result = match sample_format {
                cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer),
                cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer),
                cpal::SampleFormat::I32 => build_stream::<i32>(&device, &stream_config, mixer),
                other => {
                    error!(format = ?other, "Unsupported output sample format");
                    return;
                }
            };

            match stream_result {
                Ok(stream) => {
                    if let Err(e) = stream.play() {
                        error!("Failed to start output stream: {}", e);
                        return;
                    }
                    info!("Output stream started.");

                    // Keep the stream alive for the life of the process.
                    loop {
                        thread::sleep(Duration::from_millis(100));
                    }
                }
                Err(e) => {
                    error!("Failed to create output stream: {}", e);
                }
            }
        });
    }
}

impl AudioDevice for Device {
    fn play_sample(&self, name: &str, sample: &LoadedSample) -> Result<(), Box<dyn Error>> {
        let voice_tx = self
            .voice_tx
            .as_ref()
            .ok_or("audio device has not been started")?;

        voice_tx.send(Voice::new(sample))?;
        debug!(device = self.name, sample = name, "Keystroke sample queued.");
        Ok(())
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<super::mock::Device>, Box<dyn Error>> {
        Err("not a mock".into())
    }
}
