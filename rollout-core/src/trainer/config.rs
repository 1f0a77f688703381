//! Configuration of [`Trainer`](super::Trainer).
use crate::error::TrainerError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

/// How data collection and parameter updates are interleaved.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// Train after every step taken in the environment.
    Online,

    /// Train once after every epoch of data collection.
    Batch,
}

impl FromStr for CollectionMode {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "batch" => Ok(Self::Batch),
            _ => Err(TrainerError::InvalidCollectionMode(s.to_string())),
        }
    }
}

impl fmt::Display for CollectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Batch => write!(f, "batch"),
        }
    }
}

/// Configuration of [`Trainer`](super::Trainer).
///
/// `batch_size` and `discount` are not used by the trainer itself; they are
/// kept here so that a single file configures a run.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TrainerConfig {
    /// Interleaving of data collection and training.
    pub collection_mode: CollectionMode,

    /// The number of epochs.
    pub num_epochs: usize,

    /// The number of environment steps per epoch.
    pub num_steps_per_epoch: usize,

    /// The number of environment steps per evaluation.
    pub num_steps_per_eval: usize,

    /// The number of updates per training call in `online` mode.
    pub num_updates_per_env_step: usize,

    /// The number of updates per training call in `batch` mode.
    pub num_updates_per_epoch: Option<usize>,

    /// Batch size.
    pub batch_size: usize,

    /// The maximum number of steps in a path.
    pub max_path_length: usize,

    /// Discount factor.
    pub discount: f32,

    /// Capacity of the replay buffer.
    pub replay_buffer_size: usize,

    /// Factor applied to every reward before it is recorded.
    pub reward_scale: f32,

    /// The number of transitions in the replay buffer required for training.
    ///
    /// `None` means one epoch of environment steps.
    pub min_num_steps_before_training: Option<usize>,

    /// If `true`, renders the training environment at every step.
    pub render: bool,

    /// Saves the replay buffer in extra data.
    pub save_replay_buffer: bool,

    /// Saves the algorithm in extra data.
    pub save_algorithm: bool,

    /// Saves the training environment in snapshots and extra data.
    pub save_environment: bool,

    /// Interval of saving extra data in epochs.
    pub save_extra_data_interval: usize,

    /// The number of accelerators shared by the processes of a run.
    pub num_gpus: usize,

    /// If `true`, trainable components are moved to an accelerator
    /// only while updates are performed.
    pub gpu_mode: bool,

    /// Interval of evaluation in epochs, used in `batch` mode.
    pub num_epochs_per_eval: usize,

    /// Interval of saving snapshots in epochs.
    pub num_epochs_per_param_save: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            collection_mode: CollectionMode::Online,
            num_epochs: 100,
            num_steps_per_epoch: 10000,
            num_steps_per_eval: 1000,
            num_updates_per_env_step: 1,
            num_updates_per_epoch: None,
            batch_size: 1024,
            max_path_length: 1000,
            discount: 0.99,
            replay_buffer_size: 1_000_000,
            reward_scale: 1.0,
            min_num_steps_before_training: None,
            render: false,
            save_replay_buffer: false,
            save_algorithm: false,
            save_environment: true,
            save_extra_data_interval: 100000,
            num_gpus: 1,
            gpu_mode: false,
            num_epochs_per_eval: 10,
            num_epochs_per_param_save: 100,
        }
    }
}

impl TrainerConfig {
    /// Sets the collection mode.
    pub fn collection_mode(mut self, v: CollectionMode) -> Self {
        self.collection_mode = v;
        self
    }

    /// Sets the number of epochs.
    pub fn num_epochs(mut self, v: usize) -> Self {
        self.num_epochs = v;
        self
    }

    /// Sets the number of environment steps per epoch.
    pub fn num_steps_per_epoch(mut self, v: usize) -> Self {
        self.num_steps_per_epoch = v;
        self
    }

    /// Sets the number of environment steps per evaluation.
    pub fn num_steps_per_eval(mut self, v: usize) -> Self {
        self.num_steps_per_eval = v;
        self
    }

    /// Sets the number of updates per environment step (`online` mode).
    pub fn num_updates_per_env_step(mut self, v: usize) -> Self {
        self.num_updates_per_env_step = v;
        self
    }

    /// Sets the number of updates per epoch (`batch` mode).
    pub fn num_updates_per_epoch(mut self, v: usize) -> Self {
        self.num_updates_per_epoch = Some(v);
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the maximum length of paths.
    pub fn max_path_length(mut self, v: usize) -> Self {
        self.max_path_length = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount(mut self, v: f32) -> Self {
        self.discount = v;
        self
    }

    /// Sets the capacity of the replay buffer.
    pub fn replay_buffer_size(mut self, v: usize) -> Self {
        self.replay_buffer_size = v;
        self
    }

    /// Sets the reward scale.
    pub fn reward_scale(mut self, v: f32) -> Self {
        self.reward_scale = v;
        self
    }

    /// Sets the number of buffered transitions required for training.
    pub fn min_num_steps_before_training(mut self, v: usize) -> Self {
        self.min_num_steps_before_training = Some(v);
        self
    }

    /// Enables or disables rendering.
    pub fn render(mut self, v: bool) -> Self {
        self.render = v;
        self
    }

    /// Enables or disables saving the replay buffer in extra data.
    pub fn save_replay_buffer(mut self, v: bool) -> Self {
        self.save_replay_buffer = v;
        self
    }

    /// Enables or disables saving the algorithm in extra data.
    pub fn save_algorithm(mut self, v: bool) -> Self {
        self.save_algorithm = v;
        self
    }

    /// Enables or disables saving the training environment.
    pub fn save_environment(mut self, v: bool) -> Self {
        self.save_environment = v;
        self
    }

    /// Sets the interval of saving extra data in epochs.
    pub fn save_extra_data_interval(mut self, v: usize) -> Self {
        self.save_extra_data_interval = v;
        self
    }

    /// Sets the number of accelerators.
    pub fn num_gpus(mut self, v: usize) -> Self {
        self.num_gpus = v;
        self
    }

    /// Enables or disables moving trainable components to an accelerator for updates.
    pub fn gpu_mode(mut self, v: bool) -> Self {
        self.gpu_mode = v;
        self
    }

    /// Sets the interval of evaluation in epochs.
    pub fn num_epochs_per_eval(mut self, v: usize) -> Self {
        self.num_epochs_per_eval = v;
        self
    }

    /// Sets the interval of saving snapshots in epochs.
    pub fn num_epochs_per_param_save(mut self, v: usize) -> Self {
        self.num_epochs_per_param_save = v;
        self
    }

    /// Returns the number of updates per training call for the collection mode.
    pub fn num_updates_per_train_call(&self) -> Result<usize, TrainerError> {
        match self.collection_mode {
            CollectionMode::Online => Ok(self.num_updates_per_env_step),
            CollectionMode::Batch => self
                .num_updates_per_epoch
                .ok_or(TrainerError::MissingUpdatesPerEpoch),
        }
    }

    /// Returns `min_num_steps_before_training`, one epoch of steps if unset.
    pub fn resolved_min_num_steps_before_training(&self) -> usize {
        self.min_num_steps_before_training
            .unwrap_or(self.num_steps_per_epoch)
    }

    /// Checks the consistency of the configuration.
    pub fn validate(&self) -> Result<(), TrainerError> {
        self.num_updates_per_train_call()?;

        if self.num_epochs_per_eval == 0 {
            return Err(TrainerError::ZeroInterval("num_epochs_per_eval"));
        }
        if self.num_epochs_per_param_save == 0 {
            return Err(TrainerError::ZeroInterval("num_epochs_per_param_save"));
        }
        if self.save_extra_data_interval == 0 {
            return Err(TrainerError::ZeroInterval("save_extra_data_interval"));
        }
        if self.max_path_length == 0 {
            return Err(TrainerError::ZeroInterval("max_path_length"));
        }
        if self.gpu_mode && self.num_gpus == 0 {
            return Err(TrainerError::ZeroInterval("num_gpus"));
        }
        if self.num_epochs_per_param_save % self.num_epochs_per_eval != 0 {
            return Err(TrainerError::ParamSaveNotMultipleOfEval {
                per_eval: self.num_epochs_per_eval,
                per_param_save: self.num_epochs_per_param_save,
            });
        }

        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
