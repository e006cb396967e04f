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
mod audio;
mod config;
mod controller;
mod keys;
mod sampler;
#[cfg(test)]
mod testutil;

use clap::{crate_version, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A mechanical keyboard typing-sound simulator."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available audio output devices.
    Devices {},
    /// Loads and verifies the sample pack from the given config.
    Pack {
        /// The path to the simulator config.
        config_path: String,
    },
    /// Plays the sound for a single keystroke, then exits.
    Play {
        /// The path to the simulator config.
        config_path: String,
        /// The key identifier to sound, e.g. KeyA or ShiftLeft.
        key: String,
    },
    /// Starts the typing surface: reads key identifiers from stdin, one per
    /// line, and plays a keystroke sound for each.
    Start {
        /// The path to the simulator config.
        config_path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Devices {} => {
            let devices = audio::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Pack { config_path } => {
            let summary = config::describe_pack(&PathBuf::from(config_path))?;

            println!("Sample pack ({} KiB in memory):", summary.memory / 1024);
            for (group, samples) in summary.groups {
                println!("- {} (count: {}):", group, samples.len());
                for (file, duration) in samples {
                    println!("  - {} ({}ms)", file, duration.as_millis());
                }
            }
        }
        Commands::Play { config_path, key } => {
            let mut engine = config::init_engine(&PathBuf::from(config_path))?;

            // Let the one-shot ring out before the process exits.
            let wait = engine.longest_sample() + Duration::from_millis(200);
            engine.play(&key);
            thread::sleep(wait);
        }
        Commands::Start { config_path } => {
            config::init_engine_and_controller(&PathBuf::from(config_path))?
                .join()
                .await?;
        }
    }

    Ok(())
}
