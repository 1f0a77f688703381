//! Snapshots of training state and where they are written.
//!
//! [`Trainer`](crate::Trainer) captures two kinds of data:
//!
//! * [`Snapshot`] - numbered, taken every `num_epochs_per_param_save` epochs
//!   (and once as epoch `-1` before training starts).
//! * [`ExtraData`] - overwritten in place, taken every
//!   `save_extra_data_interval` epochs.
//!
//! Only the authority process of a run hands them to a [`SnapshotSink`].
mod base;
mod dir_sink;
pub use base::{ExtraData, NullSnapshotSink, Snapshot, SnapshotMeta, SnapshotSink};
pub use dir_sink::DirSnapshotSink;
