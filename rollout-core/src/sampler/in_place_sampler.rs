//! Default implementation of the [`Sampler`] trait.
use super::Sampler;
use crate::{
    path::{Path, PathBuilder},
    Env, Policy, Transition,
};
use anyhow::Result;

/// Collects paths sequentially in the calling thread.
///
/// Paths of at most `max_path_length` steps are collected while the total
/// number of steps plus `max_path_length` does not exceed `max_samples`,
/// so the budget is never overrun by a path cut short.
pub struct InPlaceSampler {
    max_samples: usize,
    max_path_length: usize,
}

impl InPlaceSampler {
    /// Constructs a new [`InPlaceSampler`].
    pub fn new(max_samples: usize, max_path_length: usize) -> Self {
        Self {
            max_samples,
            max_path_length,
        }
    }

    fn rollout<E, P>(&self, env: &mut E, policy: &mut P) -> Result<Option<Path<E>>>
    where
        E: Env,
        P: Policy<E>,
    {
        let mut builder = PathBuilder::new();
        let mut obs = env.reset()?;
        policy.reset();

        while builder.len() < self.max_path_length {
            let (act, agent_info) = policy.sample(&obs);
            let step = env.step(&act)?;
            let is_terminated = step.is_terminated;
            builder.push(Transition {
                obs,
                act,
                reward: vec![step.reward],
                next_obs: step.obs.clone(),
                terminal: vec![is_terminated as i8],
                agent_info,
                env_info: step.info,
            });
            if is_terminated {
                break;
            }
            obs = step.obs;
        }

        Ok(builder.take_path())
    }
}

impl<E, P> Sampler<E, P> for InPlaceSampler
where
    E: Env,
    P: Policy<E>,
{
    fn obtain_samples(&mut self, env: &mut E, policy: &mut P) -> Result<Vec<Path<E>>> {
        let mut paths = vec![];
        let mut n_steps_total = 0;

        while n_steps_total + self.max_path_length <= self.max_samples {
            match self.rollout(env, policy)? {
                Some(path) => {
                    n_steps_total += path.len();
                    paths.push(path);
                }
                None => break,
            }
        }

        Ok(paths)
    }
}
