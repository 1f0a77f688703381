//! A batch of transitions sampled from [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use crate::Env;

/// A batch of transitions, with every field stacked over samples.
pub struct Batch<E: Env> {
    /// Observations.
    pub obs: Vec<E::Obs>,

    /// Actions.
    pub act: Vec<E::Act>,

    /// Next observations.
    pub next_obs: Vec<E::Obs>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Terminal flags.
    pub terminal: Vec<i8>,

    /// Sample indices.
    pub ix_sample: Vec<usize>,
}

impl<E: Env> Batch<E> {
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no samples.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}
