//! Environment.
use super::{Act, Info, Obs, Step};
use crate::{path::Path, record::Record};
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Capabilities that only some environments have (rendering, train/eval
/// modes, diagnostics) are exposed through the `as_*` accessors. The default
/// implementations return `None`, meaning that the environment does not
/// support the capability; callers treat this as a no-op rather than an error.
pub trait Env {
    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Performs an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Creates an independent copy of the environment.
    ///
    /// [`Trainer`](crate::Trainer) uses this to derive the training environment
    /// from the evaluation environment when no training environment is given,
    /// so that training and evaluation never share state.
    fn clone_env(&self) -> Result<Self>
    where
        Self: Sized;

    /// Returns the rendering capability, if any.
    fn as_render(&mut self) -> Option<&mut dyn Render> {
        None
    }

    /// Returns the train/eval mode capability, if any.
    fn as_mode_switch(&mut self) -> Option<&mut dyn ModeSwitch> {
        None
    }

    /// Returns the diagnostics capability, if any.
    fn as_diagnostics(&self) -> Option<&dyn Diagnostics<Self>>
    where
        Self: Sized,
    {
        None
    }
}

/// An environment that can be rendered.
pub trait Render {
    /// Renders the current state.
    fn render(&mut self) -> Result<()>;

    /// Closes the rendering window, if one is open.
    fn close(&mut self) {}
}

/// An environment with distinct training and evaluation modes.
pub trait ModeSwitch {
    /// Switches to training mode.
    fn train(&mut self);

    /// Switches to evaluation mode.
    fn eval(&mut self);
}

/// An environment that computes its own statistics over evaluation paths.
pub trait Diagnostics<E: Env> {
    /// Logs diagnostic information about the given paths.
    fn log_diagnostics(&self, _paths: &[Path<E>]) {}

    /// Returns statistics to be merged into the evaluation report.
    fn diagnostics(&self, paths: &[Path<E>]) -> Record;
}

/// Switches `env` into training mode if it supports modes.
pub fn set_to_train_mode<E: Env>(env: &mut E) {
    if let Some(env) = env.as_mode_switch() {
        env.train();
    }
}

/// Switches `env` into evaluation mode if it supports modes.
pub fn set_to_eval_mode<E: Env>(env: &mut E) {
    if let Some(env) = env.as_mode_switch() {
        env.eval();
    }
}
