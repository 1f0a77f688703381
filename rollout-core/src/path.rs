//! Trajectories collected by running a policy in an environment.
mod base;
mod builder;
pub use base::Path;
pub use builder::PathBuilder;
