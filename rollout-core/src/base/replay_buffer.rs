//! Replay buffer interface consumed by the training loop.
//!
//! The training loop only pushes transitions, marks episode boundaries and
//! asks how many transitions are available. Storage layout, eviction and
//! sampling are left to implementations, e.g.,
//! [`SimpleReplayBuffer`](crate::replay_buffer::SimpleReplayBuffer).
use super::{Env, Transition};

/// Interface for buffers that store experiences from environments.
///
/// # Examples
///
/// ```ignore
/// struct CountingBuffer {
///     n: usize,
/// }
///
/// impl<E: Env> ReplayBuffer<E> for CountingBuffer {
///     fn add_sample(&mut self, _tr: &Transition<E>) {
///         self.n += 1;
///     }
///
///     fn terminate_episode(&mut self) {}
///
///     fn num_steps_can_sample(&self) -> usize {
///         self.n
///     }
/// }
/// ```
pub trait ReplayBuffer<E: Env> {
    /// Adds a transition to the buffer.
    fn add_sample(&mut self, tr: &Transition<E>);

    /// Notifies the buffer that the current episode has ended.
    fn terminate_episode(&mut self);

    /// Returns the number of transitions available for training.
    ///
    /// The training loop never removes transitions, so this value does not
    /// decrease during an epoch unless the buffer itself evicts them.
    fn num_steps_can_sample(&self) -> usize;
}
