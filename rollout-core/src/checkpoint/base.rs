use crate::SaveParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A point-in-time capture of the learned components.
pub struct Snapshot<'a> {
    /// Epoch of the capture. `-1` denotes the state before training.
    pub epoch: i64,

    /// The policy used for collecting training data.
    pub exploration_policy: &'a dyn SaveParams,

    /// The policy used for evaluation.
    pub eval_policy: &'a dyn SaveParams,

    /// The training environment, if configured to be saved.
    pub env: Option<&'a dyn SaveParams>,
}

impl<'a> Snapshot<'a> {
    /// Returns the components with their names.
    pub fn components(&self) -> Vec<(&'static str, &'a dyn SaveParams)> {
        let mut cs = vec![
            ("exploration_policy", self.exploration_policy),
            ("eval_policy", self.eval_policy),
        ];
        if let Some(env) = self.env {
            cs.push(("env", env));
        }
        cs
    }
}

/// Data that is overwritten at every save rather than numbered.
pub struct ExtraData<'a> {
    /// Epoch of the capture.
    pub epoch: i64,

    /// The training environment, if configured to be saved.
    pub env: Option<&'a dyn SaveParams>,

    /// The replay buffer, if configured to be saved.
    pub replay_buffer: Option<&'a dyn SaveParams>,

    /// The learning algorithm, if configured to be saved.
    pub algorithm: Option<&'a dyn SaveParams>,
}

impl<'a> ExtraData<'a> {
    /// Returns the components with their names.
    pub fn components(&self) -> Vec<(&'static str, &'a dyn SaveParams)> {
        let mut cs = vec![];
        if let Some(env) = self.env {
            cs.push(("env", env));
        }
        if let Some(replay_buffer) = self.replay_buffer {
            cs.push(("replay_buffer", replay_buffer));
        }
        if let Some(algorithm) = self.algorithm {
            cs.push(("algorithm", algorithm));
        }
        cs
    }
}

/// Metadata written along with the components of a snapshot.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SnapshotMeta {
    /// Epoch of the capture.
    pub epoch: i64,

    /// Names of the saved components.
    pub components: Vec<String>,

    /// Local time of the capture in RFC 3339.
    pub created_at: String,
}

/// Persists snapshots.
pub trait SnapshotSink {
    /// Persists a numbered snapshot.
    fn save_itr_params(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Persists extra data, replacing the previously saved one.
    fn save_extra_data(&mut self, data: &ExtraData) -> Result<()>;
}

/// A sink discarding every snapshot.
#[derive(Default)]
pub struct NullSnapshotSink {}

impl SnapshotSink for NullSnapshotSink {
    fn save_itr_params(&mut self, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }

    fn save_extra_data(&mut self, _data: &ExtraData) -> Result<()> {
        Ok(())
    }
}
