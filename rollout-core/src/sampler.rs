//! Collect evaluation paths with a [`Policy`].
use crate::{path::Path, Env, Policy};
use anyhow::Result;
mod in_place_sampler;
pub use in_place_sampler::InPlaceSampler;

/// Collects paths for evaluation.
pub trait Sampler<E, P>
where
    E: Env,
    P: Policy<E>,
{
    /// Runs `policy` on `env` and returns the completed paths.
    ///
    /// The caller is responsible for the mode of `env` and `policy`.
    fn obtain_samples(&mut self, env: &mut E, policy: &mut P) -> Result<Vec<Path<E>>>;
}
