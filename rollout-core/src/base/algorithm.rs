//! Learning algorithm.
use super::{Env, ReplayBuffer};
use crate::{timer::Stopwatch, trainer::EvalStatistics};
use anyhow::Result;
use std::marker::PhantomData;

/// A device on which trainable components are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// The default, non-accelerator device.
    Cpu,

    /// An accelerator with the given index.
    Accelerator(usize),
}

/// Objects an [`Algorithm`] may touch during an update.
pub struct UpdateContext<'a, E, R>
where
    E: Env,
    R: ReplayBuffer<E>,
{
    /// The replay buffer filled by the training loop.
    pub replay_buffer: &'a mut R,

    /// Statistics reported at the next evaluation.
    ///
    /// Algorithms typically refresh them in the first update after
    /// [`EvalStatistics::needs_refresh`] turned `true`.
    pub eval_statistics: &'a mut EvalStatistics,

    /// Stopwatch of the current epoch, for timing sub-phases of an update.
    pub stopwatch: &'a mut Stopwatch,

    /// The number of updates done before this one.
    pub n_train_steps_total: usize,

    pub(crate) phantom: PhantomData<E>,
}

/// A learning algorithm updating trainable components.
///
/// The training loop decides when and how many times [`Algorithm::do_training`]
/// is called; what an update does is entirely up to the implementation.
pub trait Algorithm<E, R>
where
    E: Env,
    R: ReplayBuffer<E>,
{
    /// Performs one update, e.g., a gradient step.
    fn do_training(&mut self, ctx: &mut UpdateContext<E, R>) -> Result<()>;

    /// Sets trainable components to training mode (`true`) or evaluation mode.
    fn training_mode(&mut self, mode: bool);

    /// Called once before the first epoch.
    fn pretrain(&mut self) -> Result<()> {
        Ok(())
    }

    /// Moves trainable components onto `device`.
    fn to_device(&mut self, _device: Device) {}
}
