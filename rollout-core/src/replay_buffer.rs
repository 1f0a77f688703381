//! A ring-buffer implementation of [`ReplayBuffer`](crate::ReplayBuffer).
mod base;
mod batch;
mod config;
pub use base::SimpleReplayBuffer;
pub use batch::Batch;
pub use config::SimpleReplayBufferConfig;
