//! Simple generic replay buffer.
use super::{Batch, SimpleReplayBufferConfig};
use crate::{Env, ReplayBuffer, SaveParams, Transition};
use anyhow::{bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};

/// A replay buffer of fixed capacity.
///
/// When the buffer is full, the oldest transition is overwritten.
pub struct SimpleReplayBuffer<E: Env> {
    capacity: usize,
    i: usize,
    data: Vec<Transition<E>>,
    n_episodes: usize,
    rng: StdRng,
}

impl<E: Env> SimpleReplayBuffer<E> {
    /// Builds a replay buffer.
    pub fn build(config: &SimpleReplayBufferConfig) -> Self {
        Self {
            capacity: config.capacity,
            i: 0,
            data: Vec::with_capacity(config.capacity.min(1 << 16)),
            n_episodes: 0,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Returns the number of stored transitions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of episodes terminated so far.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Samples transitions uniformly with replacement.
    pub fn random_batch(&mut self, size: usize) -> Result<Batch<E>> {
        if self.data.is_empty() {
            bail!("Cannot sample from an empty replay buffer");
        }

        let ixs = (0..size)
            .map(|_| self.rng.gen_range(0..self.data.len()))
            .collect::<Vec<_>>();
        let trs = ixs.iter().map(|&ix| &self.data[ix]);

        Ok(Batch {
            obs: trs.clone().map(|tr| tr.obs.clone()).collect(),
            act: trs.clone().map(|tr| tr.act.clone()).collect(),
            next_obs: trs.clone().map(|tr| tr.next_obs.clone()).collect(),
            reward: trs.clone().map(|tr| tr.reward()).collect(),
            terminal: trs.map(|tr| tr.terminal[0]).collect(),
            ix_sample: ixs,
        })
    }
}

impl<E: Env> ReplayBuffer<E> for SimpleReplayBuffer<E> {
    fn add_sample(&mut self, tr: &Transition<E>) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() < self.capacity {
            self.data.push(tr.clone());
        } else {
            self.data[self.i] = tr.clone();
        }
        self.i = (self.i + 1) % self.capacity;
    }

    fn terminate_episode(&mut self) {
        self.n_episodes += 1;
    }

    fn num_steps_can_sample(&self) -> usize {
        self.data.len()
    }
}

#[derive(Serialize)]
struct SavedTransition<'a, O, A> {
    obs: &'a O,
    act: &'a A,
    reward: f32,
    next_obs: &'a O,
    terminal: i8,
}

impl<E> SaveParams for SimpleReplayBuffer<E>
where
    E: Env,
    E::Obs: Serialize,
    E::Act: Serialize,
{
    /// Writes the stored transitions, oldest first, to `replay_buffer.yaml`.
    fn save_params(&self, path: &Path) -> Result<()> {
        let n = self.data.len();
        let start = if n < self.capacity { 0 } else { self.i };
        let trs = (0..n)
            .map(|j| &self.data[(start + j) % n])
            .map(|tr| SavedTransition {
                obs: &tr.obs,
                act: &tr.act,
                reward: tr.reward(),
                next_obs: &tr.next_obs,
                terminal: tr.terminal[0],
            })
            .collect::<Vec<_>>();

        std::fs::create_dir_all(path)?;
        let mut file = File::create(path.join("replay_buffer.yaml"))?;
        file.write_all(serde_yaml::to_string(&trs)?.as_bytes())?;
        Ok(())
    }
}
