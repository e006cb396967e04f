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
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{error, info, span, Level};

use crate::sampler::SoundEngine;

pub mod keyboard;

/// Controller events that will trigger behavior in the sound engine.
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    /// A physical key was pressed. Carries the key identifier.
    KeyDown(String),
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Feeds keystroke events from a driver into the sound engine.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Creates a new controller with the given driver. The controller takes
    /// ownership of the engine; events are played from a single task, so the
    /// playback queues never need locking.
    pub fn new(engine: SoundEngine, driver: Arc<dyn Driver>) -> Result<Controller, Box<dyn Error>> {
        Ok(Controller {
            handle: tokio::spawn(async move { Controller::trigger_events(engine, driver).await }),
        })
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Plays keystrokes by watching the driver and getting events from it.
    async fn trigger_events(mut engine: SoundEngine, driver: Arc<dyn Driver>) {
        let span = span!(Level::INFO, "controller");
        let _enter = span.enter();

        let (events_tx, mut events_rx) = mpsc::channel(16);
        let join_handle = driver.monitor_events(events_tx);

        info!("Controller started.");

        loop {
            if let Some(event) = events_rx.recv().await {
                match event {
                    Event::KeyDown(key_id) => engine.play(&key_id),
                }
            } else {
                info!("Controller closing.");
                if let Err(e) = join_handle.await {
                    error!("Error waiting for event monitor to stop: {}", e);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::error::Error;
    use std::io;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::{sync::mpsc::Sender, task::JoinHandle};

    use super::{Controller, Driver, Event};
    use crate::audio::mock;
    use crate::config::keymap::KeyOverrides;
    use crate::keys::SoundGroup;
    use crate::sampler::{LoadedSample, PlaybackQueues, SoundEngine};

    /// A driver that replays a fixed list of keystrokes and then closes.
    struct TestDriver {
        keys: Vec<String>,
    }

    impl Driver for TestDriver {
        fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
            let keys = self.keys.clone();
            tokio::task::spawn_blocking(move || {
                for key in keys {
                    events_tx
                        .blocking_send(Event::KeyDown(key))
                        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                }
                Ok(())
            })
        }
    }

    fn test_engine(mock: &mock::Device) -> SoundEngine {
        let mut sets = HashMap::new();
        let mut samples = HashMap::new();
        for group in SoundGroup::ALL {
            let name = format!("{}-1", group);
            samples.insert(name.clone(), LoadedSample::new(vec![0.0; 4], 1, 44100));
            sets.insert(group, vec![name]);
        }

        SoundEngine::new(
            Arc::new(mock.clone()),
            PlaybackQueues::with_rng(sets, StdRng::seed_from_u64(5)),
            samples,
            KeyOverrides::default(),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_controller_plays_keystrokes() -> Result<(), Box<dyn Error>> {
        let mock = mock::Device::get("mock-controller");
        let engine = test_engine(&mock);

        let driver = Arc::new(TestDriver {
            keys: vec![
                "KeyA".to_string(),
                "Space".to_string(),
                "ShiftLeft".to_string(),
            ],
        });
        let mut controller = Controller::new(engine, driver)?;

        // The driver closes its channel after the last key, which shuts the
        // controller down once every event has been played.
        controller.join().await?;

        assert_eq!(3, mock.play_count());
        assert_eq!("spacebar-1", mock.plays()[1]);
        Ok(())
    }
}
