//! Core functionalities.
mod algorithm;
mod env;
mod policy;
mod replay_buffer;
mod save;
mod step;
pub use algorithm::{Algorithm, Device, UpdateContext};
pub use env::{set_to_eval_mode, set_to_train_mode, Diagnostics, Env, ModeSwitch, Render};
pub use policy::{ExplorationPolicy, Policy};
pub use replay_buffer::ReplayBuffer;
pub use save::SaveParams;
use std::fmt::Debug;
pub use step::{Info, Step, Transition};

/// An observation of an environment.
///
/// Environments in this crate are not vectorized, so a value of this type
/// always represents a single observation.
pub trait Obs: Clone + Debug {}

/// An action applied to an environment.
pub trait Act: Clone + Debug {}
