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
use std::{
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tracing::debug;

use crate::sampler::LoadedSample;

/// A mock device. Doesn't actually play anything.
#[derive(Clone)]
pub struct Device {
    name: String,
    /// Names of samples that were accepted for playback.
    played: Arc<Mutex<Vec<String>>>,
    /// Number of playback attempts, including rejected ones.
    attempts: Arc<AtomicUsize>,
    /// When set, every playback attempt is rejected.
    failing: Arc<AtomicBool>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            played: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the names of all samples played so far, in order.
    #[cfg(test)]
    pub fn plays(&self) -> Vec<String> {
        self.played.lock().clone()
    }

    /// Returns the number of samples played so far.
    #[cfg(test)]
    pub fn play_count(&self) -> usize {
        self.played.lock().len()
    }

    /// Returns the number of playback attempts, including failed ones.
    #[cfg(test)]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Makes every subsequent playback attempt fail (or succeed again).
    #[cfg(test)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

impl crate::audio::Device for Device {
    fn play_sample(&self, name: &str, _: &LoadedSample) -> Result<(), Box<dyn Error>> {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        if self.failing.load(Ordering::Relaxed) {
            return Err(format!("mock device {} rejected sample {}", self.name, name).into());
        }

        self.played.lock().push(name.to_string());
        debug!(device = self.name, sample = name, "Mock playback.");
        Ok(())
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<Device>, Box<dyn Error>> {
        Ok(Arc::new(self.clone()))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
