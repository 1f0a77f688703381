use super::Path;
use crate::{Env, Transition};

/// Accumulates the transitions of an in-progress trajectory.
pub struct PathBuilder<E: Env> {
    transitions: Vec<Transition<E>>,
}

impl<E: Env> Default for PathBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Env> PathBuilder<E> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            transitions: vec![],
        }
    }

    /// Appends a transition.
    pub fn push(&mut self, tr: Transition<E>) {
        self.transitions.push(tr);
    }

    /// Returns the number of accumulated transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if no transition has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Stacks the accumulated transitions into a [`Path`] and empties the builder.
    ///
    /// Returns `None` if the builder is empty; no path is materialized for an
    /// empty trajectory.
    pub fn take_path(&mut self) -> Option<Path<E>> {
        if self.transitions.is_empty() {
            None
        } else {
            let transitions = std::mem::take(&mut self.transitions);
            Some(Path::from_transitions(transitions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PathBuilder;
    use crate::{record::Record, Act, Env, Obs, Step, Transition};
    use anyhow::Result;

    #[derive(Clone, Debug, PartialEq)]
    struct O(usize);
    impl Obs for O {}

    #[derive(Clone, Debug, PartialEq)]
    struct A(i32);
    impl Act for A {}

    struct E;

    impl Env for E {
        type Obs = O;
        type Act = A;
        type Info = ();

        fn step(&mut self, _a: &A) -> Result<Step<Self>> {
            unimplemented!();
        }

        fn reset(&mut self) -> Result<O> {
            unimplemented!();
        }

        fn clone_env(&self) -> Result<Self> {
            Ok(E)
        }
    }

    fn transition(t: usize, terminal: bool) -> Transition<E> {
        Transition {
            obs: O(t),
            act: A(t as i32 * 10),
            reward: vec![t as f32],
            next_obs: O(t + 1),
            terminal: vec![terminal as i8],
            agent_info: Record::from_scalar("t", t as f32),
            env_info: (),
        }
    }

    #[test]
    fn test_empty_builder_yields_no_path() {
        let mut builder = PathBuilder::<E>::new();
        assert_eq!(builder.len(), 0);
        assert!(builder.take_path().is_none());
    }

    #[test]
    fn test_take_path_stacks_fields_in_order() {
        let mut builder = PathBuilder::<E>::new();
        builder.push(transition(0, false));
        builder.push(transition(1, false));
        builder.push(transition(2, true));
        assert_eq!(builder.len(), 3);

        let path = builder.take_path().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.observations, vec![O(0), O(1), O(2)]);
        assert_eq!(path.next_observations, vec![O(1), O(2), O(3)]);
        assert_eq!(path.actions, vec![A(0), A(10), A(20)]);
        assert_eq!(path.rewards, vec![0., 1., 2.]);
        assert_eq!(path.terminals, vec![0, 0, 1]);
        assert_eq!(path.agent_infos[2].get_scalar("t").unwrap(), 2.);
        assert_eq!(path.total_return(), 3.);

        // The builder is ready for the next trajectory
        assert!(builder.is_empty());
        builder.push(transition(5, false));
        assert_eq!(builder.take_path().unwrap().observations, vec![O(5)]);
    }

    #[test]
    fn test_into_transitions() {
        let mut builder = PathBuilder::<E>::new();
        builder.push(transition(0, false));
        builder.push(transition(1, true));
        let trs = builder.take_path().unwrap().into_transitions();
        assert_eq!(trs.len(), 2);
        assert_eq!(trs[1].obs, O(1));
        assert_eq!(trs[1].reward(), 1.);
        assert!(trs[1].is_terminal());
        assert!(!trs[0].is_terminal());
    }
}
