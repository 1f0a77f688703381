//! Environment step.
use super::Env;
use crate::record::Record;
use std::fmt::Debug;

/// Additional information to `Obs` and `Act`.
pub trait Info: Clone + Debug {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward, before scaling.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: f32, is_terminated: bool, info: E::Info) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            info,
        }
    }
}

/// A transition `(o_t, a_t, r_t, o_t+1, d_t)` with policy and environment information.
///
/// `reward` and `terminal` are one-element vectors so that transitions can be
/// stacked uniformly. A transition is not modified after it is recorded.
pub struct Transition<E: Env> {
    /// Observation `o_t`.
    pub obs: E::Obs,

    /// Action `a_t`.
    pub act: E::Act,

    /// Scaled reward `r_t`, a single element.
    pub reward: Vec<f32>,

    /// Next observation `o_t+1`.
    pub next_obs: E::Obs,

    /// Terminal flag `d_t`, a single element.
    pub terminal: Vec<i8>,

    /// Information returned by the policy along with `a_t`.
    pub agent_info: Record,

    /// Information returned by the environment along with `o_t+1`.
    pub env_info: E::Info,
}

impl<E: Env> Transition<E> {
    /// Returns the scalar reward, 0 if `reward` is empty.
    #[inline]
    pub fn reward(&self) -> f32 {
        self.reward.first().copied().unwrap_or(0.0)
    }

    /// Returns `true` if the transition ends an episode.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal.first() == Some(&1)
    }
}

impl<E: Env> Clone for Transition<E> {
    fn clone(&self) -> Self {
        Self {
            obs: self.obs.clone(),
            act: self.act.clone(),
            reward: self.reward.clone(),
            next_obs: self.next_obs.clone(),
            terminal: self.terminal.clone(),
            agent_info: self.agent_info.clone(),
            env_info: self.env_info.clone(),
        }
    }
}
