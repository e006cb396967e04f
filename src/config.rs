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
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::audio as audio_out;
use crate::controller::{keyboard, Controller};
use crate::keys::SoundGroup;
use crate::sampler::{SampleLoader, SoundEngine};

use self::simulator::Simulator;

pub mod audio;
pub mod error;
pub mod keymap;
pub mod pack;
mod simulator;

pub use self::error::ConfigError;

/// Parses and validates a simulator config file.
fn parse_simulator(config_path: &Path) -> Result<Simulator, ConfigError> {
    let simulator: Simulator = serde_yml::from_str(&fs::read_to_string(config_path)?)?;
    simulator.pack.validate()?;
    Ok(simulator)
}

/// Initializes the sound engine from the given config file: resolves the
/// audio device and loads the whole sample pack into memory.
pub fn init_engine(config_path: &Path) -> Result<SoundEngine, Box<dyn Error>> {
    let simulator = parse_simulator(config_path)?;
    let device = audio_out::get_device(&simulator.audio)?;
    let base_path = config_path.parent().unwrap_or_else(|| Path::new("."));

    SoundEngine::load(
        device,
        &simulator.pack,
        base_path,
        simulator.key_overrides,
        simulator.audio.sample_rate(),
    )
}

/// Initializes the engine and the keyboard controller from the given config
/// file and returns the controller. The controller owns the engine and can
/// be waited on until the input stream ends.
pub fn init_engine_and_controller(config_path: &Path) -> Result<Controller, Box<dyn Error>> {
    let engine = init_engine(config_path)?;
    Controller::new(engine, Arc::new(keyboard::Driver::new()))
}

/// A loaded overview of a sample pack, for verification output.
pub struct PackSummary {
    /// Per group: the sample files and their decoded durations.
    pub groups: Vec<(SoundGroup, Vec<(String, Duration)>)>,
    /// Total memory used by the decoded pack, in bytes.
    pub memory: usize,
}

/// Loads every sample in the config's pack and reports what was found.
pub fn describe_pack(config_path: &Path) -> Result<PackSummary, Box<dyn Error>> {
    let simulator = parse_simulator(config_path)?;
    let base_path = config_path.parent().unwrap_or_else(|| Path::new("."));

    let mut loader = SampleLoader::new(simulator.audio.sample_rate());
    let loaded = loader.load_pack(&simulator.pack, base_path)?;

    let groups = SoundGroup::ALL
        .iter()
        .map(|group| {
            let samples = simulator
                .pack
                .files(*group)
                .iter()
                .map(|file| {
                    let duration = loaded
                        .get(file)
                        .map(|sample| sample.duration())
                        .unwrap_or_default();
                    (file.clone(), duration)
                })
                .collect();
            (*group, samples)
        })
        .collect();

    Ok(PackSummary {
        groups,
        memory: loader.total_memory_usage(),
    })
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::testutil::write_wav;

    /// Writes a config file plus a tiny wav pack into a tempdir and returns
    /// the config path.
    fn write_test_config(dir: &Path, device: &str) -> Result<PathBuf, Box<dyn Error>> {
        for name in [
            "std-1.wav", "std-2.wav", "shift-1.wav", "enter-1.wav", "space-1.wav",
        ] {
            write_wav(&dir.join(name), vec![vec![0.25; 32]], 44100)?;
        }

        let config_path = dir.join("thock.yaml");
        fs::write(
            &config_path,
            format!(
                r#"
audio:
  device: {}
pack:
  groups:
    standard: [std-1.wav, std-2.wav]
    shift: [shift-1.wav]
    enter: [enter-1.wav]
    spacebar: [space-1.wav]
key_overrides:
  NumpadEnter: enter
"#,
                device
            ),
        )?;
        Ok(config_path)
    }

    #[test]
    fn test_init_engine() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config_path = write_test_config(dir.path(), "mock-config-test")?;

        let mut engine = init_engine(&config_path)?;
        assert_eq!(SoundGroup::Enter, engine.classify("NumpadEnter"));

        // The engine is wired to the mock device and actually plays.
        engine.play("KeyA");
        Ok(())
    }

    #[test]
    fn test_init_engine_rejects_bad_pack() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("thock.yaml");
        fs::write(
            &config_path,
            r#"
pack:
  groups:
    standard: []
    shift: [a.wav]
    enter: [a.wav]
    spacebar: [a.wav]
"#,
        )?;

        assert!(init_engine(&config_path).is_err());
        Ok(())
    }

    #[test]
    fn test_init_engine_rejects_missing_samples() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("thock.yaml");
        // Valid shape, but the default pack's files don't exist on disk.
        fs::write(&config_path, "audio:\n  device: mock\n")?;

        assert!(init_engine(&config_path).is_err());
        Ok(())
    }

    #[test]
    fn test_describe_pack() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config_path = write_test_config(dir.path(), "mock")?;

        let summary = describe_pack(&config_path)?;
        assert_eq!(4, summary.groups.len());
        assert!(summary.memory > 0);

        let (group, samples) = &summary.groups[0];
        assert_eq!(SoundGroup::Standard, *group);
        assert_eq!(2, samples.len());
        assert!(samples.iter().all(|(_, duration)| !duration.is_zero()));
        Ok(())
    }
}
