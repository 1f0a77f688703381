//! Train an [`Algorithm`] with epoch-based data collection.
mod config;
mod context;
mod device;
mod stats;
use crate::{
    checkpoint::{ExtraData, NullSnapshotSink, Snapshot, SnapshotSink},
    error::TrainerError,
    eval_util::{get_average_returns, get_generic_path_information},
    path::{Path, PathBuilder},
    record::{Record, RecordValue::Scalar, Recorder},
    sampler::{InPlaceSampler, Sampler},
    set_to_eval_mode, set_to_train_mode, Algorithm, Device, Env, ExplorationPolicy, Policy,
    ReplayBuffer, SaveParams, Stopwatch, Transition, UpdateContext,
};
use anyhow::Result;
pub use config::{CollectionMode, TrainerConfig};
pub use context::RunContext;
use device::DeviceLease;
use log::info;
pub use stats::EvalStatistics;
use std::{collections::HashSet, marker::PhantomData, time::Instant};
use xxhash_rust::xxh3::Xxh3Builder;

/// A function called at the end of every epoch with the trainer and the epoch index.
pub type PostEpochFn<E, P, Q, R, A> =
    Box<dyn FnMut(&mut Trainer<E, P, Q, R, A>, usize) -> Result<()>>;

/// Stamps whose durations are not part of the training time.
const NON_TRAIN_STAMPS: [&str; 2] = ["sample", "eval"];

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and related objects.
///
/// # Training loop
///
/// [`Trainer::train()`] runs [`Algorithm::pretrain`], takes a baseline
/// snapshot at epoch `-1` on the authority process and then runs epochs
/// `0..num_epochs` in one of two collection modes:
///
/// * [`CollectionMode::Online`]: an attempt to train follows every environment
///   step, then an attempt to evaluate closes the epoch.
/// * [`CollectionMode::Batch`]: `num_steps_per_epoch` environment steps are
///   collected, training is attempted once with `num_updates_per_epoch`
///   updates, and evaluation is attempted every `num_epochs_per_eval` epochs.
///
/// Training is attempted but skipped while the replay buffer holds fewer than
/// `min_num_steps_before_training` samples. Evaluation is skipped while no
/// exploration path was completed in the epoch or while [`EvalStatistics`] have
/// not been refreshed by the algorithm since the last evaluation.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     P[ExplorationPolicy]-->|Env::Act|E[training env]
///     E -->|"Step&lt;E: Env&gt;"|T[Trainer]
///     T -->|Transition|B[PathBuilder]
///     T -->|Transition|R[ReplayBuffer]
///     R -->|UpdateContext|A[Algorithm]
///     A -->|EvalStatistics|T
///     S[Sampler] -->|"Vec&lt;Path&gt;"|T
///     T -->|Record|W[Recorder]
///     T -->|Snapshot|K[SnapshotSink]
/// ```
///
/// * The exploration policy emits an action given the current observation of
///   the training environment. The resulting [`Transition`] is pushed to both
///   the [`PathBuilder`] and the [`ReplayBuffer`].
/// * A rollout ends when the environment terminates or the path reaches
///   `max_path_length`. The completed path is kept for exploration statistics.
/// * The algorithm updates its components in [`Algorithm::do_training`] with
///   samples from the replay buffer.
/// * Evaluation paths are collected on the evaluation environment by the
///   [`Sampler`] and summarized in a [`Record`] written to the [`Recorder`].
///
/// [`Trainer::train()`]: Trainer::train
pub struct Trainer<E, P, Q, R, A>
where
    E: Env + SaveParams,
    P: ExplorationPolicy<E> + SaveParams,
    Q: Policy<E> + SaveParams,
    R: ReplayBuffer<E> + SaveParams,
    A: Algorithm<E, R> + SaveParams,
{
    /// Environment for evaluation.
    env: E,

    /// Environment for exploration, independent of `env`.
    training_env: E,

    exploration_policy: P,
    eval_policy: Q,
    replay_buffer: R,
    algorithm: A,
    eval_sampler: Box<dyn Sampler<E, Q>>,
    snapshot_sink: Box<dyn SnapshotSink>,
    ctx: RunContext,

    collection_mode: CollectionMode,
    num_epochs: usize,
    num_env_steps_per_epoch: usize,
    num_updates_per_train_call: usize,
    max_path_length: usize,
    reward_scale: f32,
    min_num_steps_before_training: usize,
    render: bool,
    save_replay_buffer: bool,
    save_algorithm: bool,
    save_environment: bool,
    save_extra_data_interval: usize,
    num_epochs_per_eval: usize,
    num_epochs_per_param_save: usize,

    /// Device of the update bursts, `None` unless exclusive-accelerator training.
    train_device: Option<Device>,

    eval_statistics: EvalStatistics,
    stopwatch: Stopwatch,
    n_env_steps_total: usize,
    n_train_steps_total: usize,
    n_rollouts_total: usize,
    epoch_start_time: Instant,

    /// Keys of the last reported row.
    old_table_keys: Option<HashSet<String, Xxh3Builder>>,

    current_path_builder: PathBuilder<E>,

    /// Paths completed in the current epoch.
    exploration_paths: Vec<Path<E>>,

    post_epoch_funcs: Vec<PostEpochFn<E, P, Q, R, A>>,

    /// Prefix of log messages in the current epoch.
    log_prefix: String,
}

impl<E, P, Q, R, A> Trainer<E, P, Q, R, A>
where
    E: Env + SaveParams,
    P: ExplorationPolicy<E> + SaveParams,
    Q: Policy<E> + SaveParams,
    R: ReplayBuffer<E> + SaveParams,
    A: Algorithm<E, R> + SaveParams,
{
    /// Constructs a trainer.
    ///
    /// `env` is used for evaluation. The training environment is a copy of it
    /// made with [`Env::clone_env`] unless given with [`Trainer::with_training_env`].
    ///
    /// Fails if `config` is inconsistent, see [`TrainerConfig::validate`].
    pub fn build(
        config: TrainerConfig,
        ctx: RunContext,
        env: E,
        exploration_policy: P,
        eval_policy: Q,
        replay_buffer: R,
        algorithm: A,
    ) -> Result<Self> {
        config.validate()?;
        let training_env = env.clone_env()?;
        let train_device = match config.gpu_mode {
            true => Some(Device::Accelerator(ctx.rank % config.num_gpus)),
            false => None,
        };
        let eval_sampler = InPlaceSampler::new(
            config.num_steps_per_eval + config.max_path_length,
            config.max_path_length,
        );

        Ok(Self {
            env,
            training_env,
            exploration_policy,
            eval_policy,
            replay_buffer,
            algorithm,
            eval_sampler: Box::new(eval_sampler),
            snapshot_sink: Box::new(NullSnapshotSink::default()),
            ctx,
            collection_mode: config.collection_mode,
            num_epochs: config.num_epochs,
            num_env_steps_per_epoch: config.num_steps_per_epoch,
            num_updates_per_train_call: config.num_updates_per_train_call()?,
            max_path_length: config.max_path_length,
            reward_scale: config.reward_scale,
            min_num_steps_before_training: config.resolved_min_num_steps_before_training(),
            render: config.render,
            save_replay_buffer: config.save_replay_buffer,
            save_algorithm: config.save_algorithm,
            save_environment: config.save_environment,
            save_extra_data_interval: config.save_extra_data_interval,
            num_epochs_per_eval: config.num_epochs_per_eval,
            num_epochs_per_param_save: config.num_epochs_per_param_save,
            train_device,
            eval_statistics: EvalStatistics::new(),
            stopwatch: Stopwatch::new(),
            n_env_steps_total: 0,
            n_train_steps_total: 0,
            n_rollouts_total: 0,
            epoch_start_time: Instant::now(),
            old_table_keys: None,
            current_path_builder: PathBuilder::new(),
            exploration_paths: vec![],
            post_epoch_funcs: vec![],
            log_prefix: String::new(),
        })
    }

    /// Sets the environment for exploration.
    pub fn with_training_env(mut self, training_env: E) -> Self {
        self.training_env = training_env;
        self
    }

    /// Sets the sampler of evaluation paths.
    pub fn with_eval_sampler(mut self, sampler: impl Sampler<E, Q> + 'static) -> Self {
        self.eval_sampler = Box::new(sampler);
        self
    }

    /// Sets where snapshots are persisted.
    pub fn with_snapshot_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.snapshot_sink = Box::new(sink);
        self
    }

    /// Registers a function called at the end of every epoch.
    ///
    /// Functions are called in the order of registration.
    pub fn add_post_epoch_fn<F>(&mut self, f: F)
    where
        F: FnMut(&mut Self, usize) -> Result<()> + 'static,
    {
        self.post_epoch_funcs.push(Box::new(f));
    }

    /// Trains the algorithm from epoch 0.
    pub fn train(&mut self, recorder: &mut dyn Recorder) -> Result<()> {
        self.train_from(0, recorder)
    }

    /// Trains the algorithm from `start_epoch`, e.g., to resume a run.
    pub fn train_from(&mut self, start_epoch: usize, recorder: &mut dyn Recorder) -> Result<()> {
        self.algorithm.pretrain()?;
        if start_epoch == 0 && self.ctx.is_authority() {
            // Baseline before any update
            self.save_itr_params(-1)?;
        }
        self.algorithm.training_mode(false);
        self.n_env_steps_total = start_epoch * self.num_env_steps_per_epoch;
        self.stopwatch.reset();

        match self.collection_mode {
            CollectionMode::Online => self.train_online(start_epoch, recorder),
            CollectionMode::Batch => self.train_batch(start_epoch, recorder),
        }
    }

    fn train_online(&mut self, start_epoch: usize, recorder: &mut dyn Recorder) -> Result<()> {
        self.current_path_builder = PathBuilder::new();
        for epoch in start_epoch..self.num_epochs {
            self.start_epoch(epoch);
            set_to_train_mode(&mut self.training_env);
            let mut obs = self.start_new_rollout()?;
            for _ in 0..self.num_env_steps_per_epoch {
                obs = self.take_step_in_env(obs)?;
                self.stopwatch.stamp("sample");

                self.try_to_train()?;
                self.stopwatch.stamp("train");
            }

            set_to_eval_mode(&mut self.env);
            self.try_to_eval(epoch, recorder)?;
            self.stopwatch.stamp("eval");
            self.end_epoch(epoch)?;
        }
        Ok(())
    }

    fn train_batch(&mut self, start_epoch: usize, recorder: &mut dyn Recorder) -> Result<()> {
        self.current_path_builder = PathBuilder::new();
        for epoch in start_epoch..self.num_epochs {
            self.start_epoch(epoch);
            set_to_train_mode(&mut self.training_env);
            let mut obs = self.start_new_rollout()?;
            for _ in 0..self.num_env_steps_per_epoch {
                obs = self.take_step_in_env(obs)?;
            }
            self.stopwatch.stamp("sample");

            self.try_to_train()?;
            self.stopwatch.stamp("train");

            set_to_eval_mode(&mut self.env);
            if epoch % self.num_epochs_per_eval == 0 {
                self.try_to_eval(epoch, recorder)?;
                self.stopwatch.stamp("eval");
            }
            self.end_epoch(epoch)?;
        }
        Ok(())
    }

    /// Takes an environment step from `obs` and returns the observation to continue with.
    ///
    /// The returned observation comes from a fresh reset if the rollout ended.
    pub fn take_step_in_env(&mut self, obs: E::Obs) -> Result<E::Obs> {
        self.exploration_policy.set_num_steps_total(self.n_env_steps_total);
        let (act, agent_info) = self.exploration_policy.sample(&obs);
        if self.render {
            if let Some(env) = self.training_env.as_render() {
                env.render()?;
            }
        }
        let step = self.training_env.step(&act)?;
        self.n_env_steps_total += 1;

        let terminal = step.is_terminated;
        let next_obs = step.obs;
        self.handle_step(Transition {
            obs,
            act,
            reward: vec![step.reward * self.reward_scale],
            next_obs: next_obs.clone(),
            terminal: vec![terminal as i8],
            agent_info,
            env_info: step.info,
        });

        if terminal || self.current_path_builder.len() >= self.max_path_length {
            self.handle_rollout_ending();
            self.start_new_rollout()
        } else {
            Ok(next_obs)
        }
    }

    /// Records a transition in the current path and the replay buffer.
    fn handle_step(&mut self, transition: Transition<E>) {
        self.replay_buffer.add_sample(&transition);
        self.current_path_builder.push(transition);
    }

    /// Ends the current rollout.
    ///
    /// The rollout is counted even if no transition was recorded, but an
    /// empty path is not kept.
    pub fn handle_rollout_ending(&mut self) {
        self.replay_buffer.terminate_episode();
        self.n_rollouts_total += 1;
        if let Some(path) = self.current_path_builder.take_path() {
            self.exploration_paths.push(path);
        }
    }

    /// Resets the exploration policy and the training environment.
    ///
    /// The current path is left as is. A rollout ends only on a terminal step
    /// or when it reaches `max_path_length`, so transitions recorded before an
    /// epoch boundary stay in the path builder.
    pub fn start_new_rollout(&mut self) -> Result<E::Obs> {
        self.exploration_policy.reset();
        self.training_env.reset()
    }

    /// Records a path collected outside of the trainer as a complete rollout.
    pub fn handle_path(&mut self, path: Path<E>) {
        for transition in path.into_transitions() {
            self.handle_step(transition);
        }
        self.handle_rollout_ending();
    }

    /// Returns `true` if the replay buffer holds enough samples to train.
    pub fn can_train(&self) -> bool {
        self.replay_buffer.num_steps_can_sample() >= self.min_num_steps_before_training
    }

    /// Performs `num_updates_per_train_call` updates if training is possible.
    ///
    /// With exclusive-accelerator training, the algorithm is placed on the
    /// accelerator during the updates and is back on the CPU when this method
    /// returns, also with an error. The algorithm is in evaluation mode
    /// again on every return.
    pub fn try_to_train(&mut self) -> Result<()> {
        if !self.can_train() {
            return Ok(());
        }

        let mut algorithm = DeviceLease::<E, R, A>::acquire(&mut self.algorithm, self.train_device);
        algorithm.training_mode(true);
        let mut result = Ok(());
        for _ in 0..self.num_updates_per_train_call {
            let mut ctx = UpdateContext {
                replay_buffer: &mut self.replay_buffer,
                eval_statistics: &mut self.eval_statistics,
                stopwatch: &mut self.stopwatch,
                n_train_steps_total: self.n_train_steps_total,
                phantom: PhantomData,
            };
            result = algorithm.do_training(&mut ctx);
            if result.is_err() {
                break;
            }
            self.n_train_steps_total += 1;
        }
        algorithm.training_mode(false);
        result
    }

    /// Returns `true` if a path was completed in this epoch and the
    /// statistics of the algorithm are up to date.
    pub fn can_evaluate(&self) -> bool {
        !self.exploration_paths.is_empty() && !self.eval_statistics.needs_refresh()
    }

    /// Saves snapshots and, if possible, evaluates the policy.
    pub fn try_to_eval(&mut self, epoch: usize, recorder: &mut dyn Recorder) -> Result<()> {
        self.try_to_eval_with(epoch, None, recorder)
    }

    /// Same as [`Trainer::try_to_eval`], evaluating on `eval_paths` if given
    /// instead of sampling new paths.
    pub fn try_to_eval_with(
        &mut self,
        epoch: usize,
        eval_paths: Option<Vec<Path<E>>>,
        recorder: &mut dyn Recorder,
    ) -> Result<()> {
        if self.ctx.is_authority() {
            if epoch % self.save_extra_data_interval == 0 {
                self.save_extra_data(epoch as i64)?;
            }
            if epoch % self.num_epochs_per_param_save == 0 {
                info!("{}Attempting itr param save...", self.log_prefix);
                self.save_itr_params(epoch as i64)?;
                info!("{}Itr{} param saved!", self.log_prefix, epoch);
            }
        }

        if !self.can_evaluate() {
            info!("{}Skipping eval for now.", self.log_prefix);
            return Ok(());
        }

        let mut record = self.evaluate(epoch, eval_paths)?;
        self.record_counters_and_times(epoch, &mut record);

        let table_keys = record.key_set();
        if let Some(old_table_keys) = &self.old_table_keys {
            if *old_table_keys != table_keys {
                let mut added = table_keys
                    .difference(old_table_keys)
                    .cloned()
                    .collect::<Vec<_>>();
                let mut removed = old_table_keys
                    .difference(&table_keys)
                    .cloned()
                    .collect::<Vec<_>>();
                added.sort();
                removed.sort();
                return Err(TrainerError::TableKeysChanged { added, removed }.into());
            }
        }
        self.old_table_keys = Some(table_keys);
        recorder.write(record);
        Ok(())
    }

    fn record_counters_and_times(&self, epoch: usize, record: &mut Record) {
        record.insert(
            "Number of train steps total",
            Scalar(self.n_train_steps_total as f32),
        );
        record.insert(
            "Number of env steps total",
            Scalar(self.n_env_steps_total as f32),
        );
        record.insert(
            "Number of rollouts total",
            Scalar(self.n_rollouts_total as f32),
        );

        let sw = &self.stopwatch;
        let secs = |name: &str| sw.last(name).map_or(0.0, |d| d.as_secs_f32());
        let names = sw.names();
        for &name in names.iter() {
            record.insert(title(name), Scalar(secs(name)));
        }
        // Seeded so that the first row has the same keys as later ones
        for name in NON_TRAIN_STAMPS.iter() {
            if !names.contains(name) {
                record.insert(title(name), Scalar(0.0));
            }
        }

        let train_time = names
            .iter()
            .filter(|&name| !NON_TRAIN_STAMPS.contains(name))
            .map(|&name| secs(name))
            .sum::<f32>();
        let sample_time = secs("sample");
        let eval_time = if epoch > 0 { secs("eval") } else { 0.0 };
        let epoch_time = train_time + sample_time + eval_time;

        record.insert("Train Time (s)", Scalar(train_time));
        record.insert("(Previous) Eval Time (s)", Scalar(eval_time));
        record.insert("Sample Time (s)", Scalar(sample_time));
        record.insert("Epoch Time (s)", Scalar(epoch_time));
        record.insert("Total Train Time (s)", Scalar(sw.total().as_secs_f32()));
        record.insert("Epoch", Scalar(epoch as f32));
    }

    /// Evaluates the policy and returns the statistics.
    ///
    /// The statistics of the algorithm are marked stale afterwards.
    pub fn evaluate(&mut self, epoch: usize, eval_paths: Option<Vec<Path<E>>>) -> Result<Record> {
        let mut record = self.eval_statistics.get().clone();
        let test_paths = match eval_paths {
            Some(paths) => paths,
            None => {
                info!("{}Collecting samples for evaluation", self.log_prefix);
                self.eval_sampler
                    .obtain_samples(&mut self.env, &mut self.eval_policy)?
            }
        };

        record.merge_inplace(get_generic_path_information(&test_paths, "Test"));
        if !self.exploration_paths.is_empty() {
            record.merge_inplace(get_generic_path_information(
                &self.exploration_paths,
                "Exploration",
            ));
        }
        if let Some(env) = self.env.as_diagnostics() {
            env.log_diagnostics(&test_paths);
            record.merge_inplace(env.diagnostics(&test_paths));
        }
        let average_return = get_average_returns(&test_paths);
        record.insert("AverageReturn", Scalar(average_return));
        info!(
            "{}Epoch {}: average return of evaluation = {}",
            self.log_prefix, epoch, average_return
        );

        self.eval_statistics.mark_stale();
        Ok(record)
    }

    /// Returns the snapshot of the learned components at `epoch`.
    pub fn get_epoch_snapshot(&self, epoch: i64) -> Snapshot<'_> {
        Snapshot {
            epoch,
            exploration_policy: &self.exploration_policy,
            eval_policy: &self.eval_policy,
            env: match self.save_environment {
                true => Some(&self.training_env as &dyn SaveParams),
                false => None,
            },
        }
    }

    /// Returns the data overwritten at every `save_extra_data_interval` epochs.
    ///
    /// The render window of the training environment is closed if rendering is on.
    pub fn get_extra_data_to_save(&mut self, epoch: i64) -> ExtraData<'_> {
        if self.render {
            if let Some(env) = self.training_env.as_render() {
                env.close();
            }
        }
        ExtraData {
            epoch,
            env: match self.save_environment {
                true => Some(&self.training_env as &dyn SaveParams),
                false => None,
            },
            replay_buffer: match self.save_replay_buffer {
                true => Some(&self.replay_buffer as &dyn SaveParams),
                false => None,
            },
            algorithm: match self.save_algorithm {
                true => Some(&self.algorithm as &dyn SaveParams),
                false => None,
            },
        }
    }

    fn save_itr_params(&mut self, epoch: i64) -> Result<()> {
        let mut sink = std::mem::replace(
            &mut self.snapshot_sink,
            Box::new(NullSnapshotSink::default()),
        );
        let result = sink.save_itr_params(&self.get_epoch_snapshot(epoch));
        self.snapshot_sink = sink;
        result
    }

    fn save_extra_data(&mut self, epoch: i64) -> Result<()> {
        let mut sink = std::mem::replace(
            &mut self.snapshot_sink,
            Box::new(NullSnapshotSink::default()),
        );
        let result = sink.save_extra_data(&self.get_extra_data_to_save(epoch));
        self.snapshot_sink = sink;
        result
    }

    /// Begins an epoch.
    pub fn start_epoch(&mut self, epoch: usize) {
        self.epoch_start_time = Instant::now();
        self.exploration_paths.clear();
        self.log_prefix = format!("Iteration #{} | ", epoch);
    }

    /// Ends an epoch and calls the functions registered with
    /// [`Trainer::add_post_epoch_fn`].
    pub fn end_epoch(&mut self, epoch: usize) -> Result<()> {
        info!(
            "{}Epoch Duration: {:.3}s",
            self.log_prefix,
            self.epoch_start_time.elapsed().as_secs_f32()
        );
        info!("{}Started Training: {}", self.log_prefix, self.can_train());
        self.log_prefix.clear();
        self.stopwatch.end_itr();

        let mut funcs = std::mem::take(&mut self.post_epoch_funcs);
        let result = funcs.iter_mut().try_for_each(|f| f(self, epoch));
        // Functions registered during the calls come after the existing ones
        funcs.append(&mut self.post_epoch_funcs);
        self.post_epoch_funcs = funcs;
        result
    }

    /// Returns the number of environment steps taken.
    pub fn n_env_steps_total(&self) -> usize {
        self.n_env_steps_total
    }

    /// Returns the number of updates done.
    pub fn n_train_steps_total(&self) -> usize {
        self.n_train_steps_total
    }

    /// Returns the number of rollouts ended.
    pub fn n_rollouts_total(&self) -> usize {
        self.n_rollouts_total
    }

    /// Returns the paths completed in the current epoch.
    pub fn exploration_paths(&self) -> &[Path<E>] {
        &self.exploration_paths
    }

    /// Returns the length of the rollout in progress.
    pub fn current_path_len(&self) -> usize {
        self.current_path_builder.len()
    }

    /// Returns the statistics reported at the next evaluation.
    pub fn eval_statistics(&self) -> &EvalStatistics {
        &self.eval_statistics
    }

    /// Returns the statistics reported at the next evaluation.
    pub fn eval_statistics_mut(&mut self) -> &mut EvalStatistics {
        &mut self.eval_statistics
    }

    /// Returns the algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Returns the algorithm.
    pub fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algorithm
    }

    /// Returns the replay buffer.
    pub fn replay_buffer(&self) -> &R {
        &self.replay_buffer
    }

    /// Returns the exploration policy.
    pub fn exploration_policy(&self) -> &P {
        &self.exploration_policy
    }

    /// Returns the environment for exploration.
    pub fn training_env(&self) -> &E {
        &self.training_env
    }

    /// Returns the environment for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Returns the stopwatch of the training loop.
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }
}

/// Capitalizes the first letter of every word, e.g., `policy_loss` to `Policy_Loss`.
fn title(name: &str) -> String {
    let mut prev_is_alphabetic = false;
    name.chars()
        .map(|c| {
            let c_ = match prev_is_alphabetic {
                true => c.to_ascii_lowercase(),
                false => c.to_ascii_uppercase(),
            };
            prev_is_alphabetic = c.is_alphabetic();
            c_
        })
        .collect()
}
