use crate::{record::Record, Env, Transition};

/// A completed trajectory, with every field stacked over time steps.
///
/// The `i`-th element of each vector belongs to the `i`-th transition.
pub struct Path<E: Env> {
    /// Observations `o_t`.
    pub observations: Vec<E::Obs>,

    /// Actions `a_t`.
    pub actions: Vec<E::Act>,

    /// Scaled rewards `r_t`.
    pub rewards: Vec<f32>,

    /// Next observations `o_t+1`.
    pub next_observations: Vec<E::Obs>,

    /// Terminal flags.
    pub terminals: Vec<i8>,

    /// Policy information.
    pub agent_infos: Vec<Record>,

    /// Environment information.
    pub env_infos: Vec<E::Info>,
}

impl<E: Env> Path<E> {
    /// Stacks the given transitions.
    pub fn from_transitions(transitions: Vec<Transition<E>>) -> Self {
        let n = transitions.len();
        let mut path = Self {
            observations: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            next_observations: Vec::with_capacity(n),
            terminals: Vec::with_capacity(n),
            agent_infos: Vec::with_capacity(n),
            env_infos: Vec::with_capacity(n),
        };

        for tr in transitions.into_iter() {
            path.observations.push(tr.obs);
            path.actions.push(tr.act);
            path.rewards.extend(tr.reward);
            path.next_observations.push(tr.next_obs);
            path.terminals.extend(tr.terminal);
            path.agent_infos.push(tr.agent_info);
            path.env_infos.push(tr.env_info);
        }

        path
    }

    /// Splits the path back into transitions.
    pub fn into_transitions(self) -> Vec<Transition<E>> {
        let Self {
            observations,
            actions,
            rewards,
            next_observations,
            terminals,
            agent_infos,
            env_infos,
        } = self;

        observations
            .into_iter()
            .zip(actions)
            .zip(rewards)
            .zip(next_observations)
            .zip(terminals)
            .zip(agent_infos)
            .zip(env_infos)
            .map(
                |((((((obs, act), reward), next_obs), terminal), agent_info), env_info)| {
                    Transition {
                        obs,
                        act,
                        reward: vec![reward],
                        next_obs,
                        terminal: vec![terminal],
                        agent_info,
                        env_info,
                    }
                },
            )
            .collect()
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns `true` if the path has no transitions.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Returns the sum of rewards.
    pub fn total_return(&self) -> f32 {
        self.rewards.iter().sum()
    }
}

impl<E: Env> Clone for Path<E> {
    fn clone(&self) -> Self {
        Self {
            observations: self.observations.clone(),
            actions: self.actions.clone(),
            rewards: self.rewards.clone(),
            next_observations: self.next_observations.clone(),
            terminals: self.terminals.clone(),
            agent_infos: self.agent_infos.clone(),
            env_infos: self.env_infos.clone(),
        }
    }
}
