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

//! Per-group playback queues.
//!
//! Each sound group owns one shuffled copy of its sample set. Draws pop from
//! the end of the queue; an exhausted queue is replaced with a fresh uniform
//! shuffle before the draw that hit it completes, so no sample repeats until
//! every sample in the group has played once.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::keys::SoundGroup;

/// The per-group playback queues. Owned exclusively by the sound engine;
/// all mutation happens through [`PlaybackQueues::draw`].
pub struct PlaybackQueues {
    /// The immutable sample sets, one per group.
    sets: HashMap<SoundGroup, Vec<String>>,
    /// The remaining samples of the current shuffle cycle, one per group.
    /// Invariant: `queues[g].len() <= sets[g].len()`.
    queues: HashMap<SoundGroup, Vec<String>>,
    rng: StdRng,
}

impl PlaybackQueues {
    /// Creates the queues from the given sample sets, shuffling each set
    /// once up front.
    pub fn new(sets: HashMap<SoundGroup, Vec<String>>) -> PlaybackQueues {
        Self::with_rng(sets, StdRng::from_entropy())
    }

    /// Creates the queues with an explicit RNG. Tests inject a seeded RNG
    /// here to make draw sequences reproducible.
    pub fn with_rng(sets: HashMap<SoundGroup, Vec<String>>, mut rng: StdRng) -> PlaybackQueues {
        let queues = sets
            .iter()
            .map(|(group, set)| {
                let mut queue = set.clone();
                queue.shuffle(&mut rng);
                (*group, queue)
            })
            .collect();

        PlaybackQueues { sets, queues, rng }
    }

    /// Draws the next sample identifier for the given group. Refills the
    /// group's queue with a fresh shuffle when it is exhausted, so this only
    /// returns `None` for a group whose sample set is empty.
    pub fn draw(&mut self, group: SoundGroup) -> Option<String> {
        let set = self.sets.get(&group)?;
        let queue = self.queues.entry(group).or_default();

        if queue.is_empty() {
            let mut refill = set.clone();
            refill.shuffle(&mut self.rng);
            *queue = refill;
        }

        queue.pop()
    }

    /// The number of samples left in the group's current cycle.
    pub fn remaining(&self, group: SoundGroup) -> usize {
        self.queues.get(&group).map_or(0, Vec::len)
    }

    /// The size of the group's full sample set.
    pub fn set_len(&self, group: SoundGroup) -> usize {
        self.sets.get(&group).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for PlaybackQueues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("PlaybackQueues");
        for group in SoundGroup::ALL {
            s.field(group.name(), &(self.remaining(group), self.set_len(group)));
        }
        s.finish()
    }
}
