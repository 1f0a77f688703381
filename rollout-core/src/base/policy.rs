//! Policy.
use super::Env;
use crate::record::Record;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Samples an action given an observation.
    ///
    /// The returned [`Record`] holds policy-side information about the action
    /// (e.g. log-probabilities), which is stored with the transition.
    fn sample(&mut self, obs: &E::Obs) -> (E::Act, Record);

    /// Resets the internal state of the policy at the start of a rollout.
    fn reset(&mut self) {}
}

/// A policy used for collecting training data.
pub trait ExplorationPolicy<E: Env>: Policy<E> {
    /// Informs the policy of the total number of environment steps so far.
    ///
    /// This is called before every action in the training loop and is used
    /// for time-dependent exploration schedules, e.g., noise annealing.
    fn set_num_steps_total(&mut self, _n: usize) {}
}
