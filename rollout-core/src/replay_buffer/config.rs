//! Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use crate::TrainerConfig;
use serde::{Deserialize, Serialize};

/// Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimpleReplayBufferConfig {
    /// The maximum number of transitions. The oldest ones are overwritten.
    pub capacity: usize,

    /// Seed of the sampler of batches.
    pub seed: u64,
}

impl Default for SimpleReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            seed: 42,
        }
    }
}

impl From<&TrainerConfig> for SimpleReplayBufferConfig {
    /// Takes the capacity from `replay_buffer_size`.
    fn from(config: &TrainerConfig) -> Self {
        Self::default().capacity(config.replay_buffer_size)
    }
}

impl SimpleReplayBufferConfig {
    /// Sets the capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
