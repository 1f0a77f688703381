#![warn(missing_docs)]
//! Orchestration of reinforcement learning training loops.
//!
//! [`Trainer`] alternates data collection with an [`ExplorationPolicy`],
//! updates of an [`Algorithm`] and evaluation with a [`Policy`], and decides
//! when snapshots are persisted. Environments, policies, replay buffers and
//! algorithms are provided by the user through the traits in this crate.
pub mod checkpoint;
pub mod error;
pub mod eval_util;
pub mod path;
pub mod record;
pub mod replay_buffer;
pub mod sampler;

mod base;
pub use base::{
    set_to_eval_mode, set_to_train_mode, Act, Algorithm, Device, Diagnostics, Env,
    ExplorationPolicy, Info, ModeSwitch, Obs, Policy, Render, ReplayBuffer, SaveParams, Step,
    Transition, UpdateContext,
};

mod timer;
pub use timer::Stopwatch;

mod trainer;
pub use trainer::{
    CollectionMode, EvalStatistics, PostEpochFn, RunContext, Trainer, TrainerConfig,
};
