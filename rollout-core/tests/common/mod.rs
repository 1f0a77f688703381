//! Scripted environment, policy, replay buffer and algorithm for tests.
#![allow(dead_code)]
use anyhow::{bail, Result};
use rollout_core::{
    checkpoint::{ExtraData, Snapshot, SnapshotSink},
    record::{Record, RecordValue::Scalar},
    Algorithm, Device, Diagnostics, Env, ExplorationPolicy, ModeSwitch, Policy, Render,
    ReplayBuffer, RunContext, SaveParams, Step, Trainer, TrainerConfig, Transition,
    UpdateContext,
};
use std::{cell::RefCell, path::Path, rc::Rc};

/// Observation identifying the rollout (by the number of resets) and the step in it.
#[derive(Clone, Debug, PartialEq)]
pub struct Obs {
    pub episode: usize,
    pub t: usize,
}

impl rollout_core::Obs for Obs {}

#[derive(Clone, Debug, PartialEq)]
pub struct Act(pub i32);

impl rollout_core::Act for Act {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Unset,
    Train,
    Eval,
}

/// Gives reward 1 at every step and terminates at step `terminate_at` of a rollout.
pub struct ScriptedEnv {
    pub terminate_at: Option<usize>,
    pub diagnostics: bool,
    pub t: usize,
    pub n_resets: usize,
    pub n_steps: usize,
    pub n_renders: usize,
    pub n_closes: usize,
    pub mode: Mode,
}

impl ScriptedEnv {
    pub fn new(terminate_at: Option<usize>) -> Self {
        Self {
            terminate_at,
            diagnostics: false,
            t: 0,
            n_resets: 0,
            n_steps: 0,
            n_renders: 0,
            n_closes: 0,
            mode: Mode::Unset,
        }
    }

    pub fn with_diagnostics(mut self) -> Self {
        self.diagnostics = true;
        self
    }
}

impl Env for ScriptedEnv {
    type Obs = Obs;
    type Act = Act;
    type Info = ();

    fn step(&mut self, a: &Act) -> Result<Step<Self>> {
        self.t += 1;
        self.n_steps += 1;
        let obs = Obs {
            episode: self.n_resets,
            t: self.t,
        };
        let is_terminated = self.terminate_at == Some(self.t);
        Ok(Step::new(obs, a.clone(), 1.0, is_terminated, ()))
    }

    fn reset(&mut self) -> Result<Obs> {
        self.n_resets += 1;
        self.t = 0;
        Ok(Obs {
            episode: self.n_resets,
            t: 0,
        })
    }

    fn clone_env(&self) -> Result<Self> {
        let mut env = Self::new(self.terminate_at);
        env.diagnostics = self.diagnostics;
        Ok(env)
    }

    fn as_render(&mut self) -> Option<&mut dyn Render> {
        Some(self)
    }

    fn as_mode_switch(&mut self) -> Option<&mut dyn ModeSwitch> {
        Some(self)
    }

    fn as_diagnostics(&self) -> Option<&dyn Diagnostics<Self>> {
        match self.diagnostics {
            true => Some(self),
            false => None,
        }
    }
}

impl Render for ScriptedEnv {
    fn render(&mut self) -> Result<()> {
        self.n_renders += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.n_closes += 1;
    }
}

impl ModeSwitch for ScriptedEnv {
    fn train(&mut self) {
        self.mode = Mode::Train;
    }

    fn eval(&mut self) {
        self.mode = Mode::Eval;
    }
}

impl Diagnostics<ScriptedEnv> for ScriptedEnv {
    fn diagnostics(&self, paths: &[rollout_core::path::Path<ScriptedEnv>]) -> Record {
        Record::from_scalar("Env Num Paths", paths.len() as f32)
    }
}

impl SaveParams for ScriptedEnv {
    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Always takes `Act(0)`.
#[derive(Default)]
pub struct ScriptedPolicy {
    pub n_resets: usize,
    pub n_samples: usize,
    pub num_steps_total: Option<usize>,
}

impl Policy<ScriptedEnv> for ScriptedPolicy {
    fn sample(&mut self, _obs: &Obs) -> (Act, Record) {
        self.n_samples += 1;
        (Act(0), Record::empty())
    }

    fn reset(&mut self) {
        self.n_resets += 1;
    }
}

impl ExplorationPolicy<ScriptedEnv> for ScriptedPolicy {
    fn set_num_steps_total(&mut self, n: usize) {
        self.num_steps_total = Some(n);
    }
}

impl SaveParams for ScriptedPolicy {
    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Counts transitions and episode boundaries.
#[derive(Default)]
pub struct CountingBuffer {
    pub n_samples: usize,
    pub n_episodes: usize,
    pub rewards: Vec<f32>,
}

impl ReplayBuffer<ScriptedEnv> for CountingBuffer {
    fn add_sample(&mut self, tr: &Transition<ScriptedEnv>) {
        self.n_samples += 1;
        self.rewards.push(tr.reward());
    }

    fn terminate_episode(&mut self) {
        self.n_episodes += 1;
    }

    fn num_steps_can_sample(&self) -> usize {
        self.n_samples
    }
}

impl SaveParams for CountingBuffer {
    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Records how and where it was updated.
///
/// The evaluation statistics are refreshed with `Loss` whenever they are
/// stale. From the `extra_stat_from`-th refresh on, `Extra` is added as well.
pub struct ScriptedAlgorithm {
    pub n_updates: usize,
    pub n_refreshes: usize,
    pub fail_at: Option<usize>,
    pub extra_stat_from: Option<usize>,
    pub device: Device,
    pub device_log: Vec<Device>,
    pub devices_in_update: Vec<Device>,
    pub samples_in_update: Vec<usize>,
    pub training: bool,
    pub n_bursts: usize,
    pub pretrained: bool,
    pub n_hook_calls: usize,
}

impl Default for ScriptedAlgorithm {
    fn default() -> Self {
        Self {
            n_updates: 0,
            n_refreshes: 0,
            fail_at: None,
            extra_stat_from: None,
            device: Device::Cpu,
            device_log: vec![],
            devices_in_update: vec![],
            samples_in_update: vec![],
            training: false,
            n_bursts: 0,
            pretrained: false,
            n_hook_calls: 0,
        }
    }
}

impl Algorithm<ScriptedEnv, CountingBuffer> for ScriptedAlgorithm {
    fn do_training(&mut self, ctx: &mut UpdateContext<ScriptedEnv, CountingBuffer>) -> Result<()> {
        self.devices_in_update.push(self.device);
        self.samples_in_update
            .push(ctx.replay_buffer.num_steps_can_sample());
        if self.fail_at == Some(self.n_updates) {
            self.fail_at = None;
            bail!("update {} failed", self.n_updates);
        }
        self.n_updates += 1;
        ctx.stopwatch.stamp("policy_loop");

        if ctx.eval_statistics.needs_refresh() {
            let mut record = Record::from_scalar("Loss", 0.5);
            if matches!(self.extra_stat_from, Some(n) if self.n_refreshes >= n) {
                record.insert("Extra", Scalar(1.0));
            }
            ctx.eval_statistics.refresh(record);
            self.n_refreshes += 1;
        }
        Ok(())
    }

    fn training_mode(&mut self, mode: bool) {
        if mode && !self.training {
            self.n_bursts += 1;
        }
        self.training = mode;
    }

    fn pretrain(&mut self) -> Result<()> {
        self.pretrained = true;
        Ok(())
    }

    fn to_device(&mut self, device: Device) {
        self.device = device;
        self.device_log.push(device);
    }
}

impl SaveParams for ScriptedAlgorithm {
    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    Itr(i64, Vec<&'static str>),
    Extra(i64, Vec<&'static str>),
}

/// Keeps the saved snapshots in a log shared with the test.
#[derive(Default)]
pub struct RecordingSink {
    pub log: Rc<RefCell<Vec<SinkEvent>>>,
}

impl SnapshotSink for RecordingSink {
    fn save_itr_params(&mut self, snapshot: &Snapshot) -> Result<()> {
        let names = snapshot.components().iter().map(|(n, _)| *n).collect();
        self.log
            .borrow_mut()
            .push(SinkEvent::Itr(snapshot.epoch, names));
        Ok(())
    }

    fn save_extra_data(&mut self, data: &ExtraData) -> Result<()> {
        let names = data.components().iter().map(|(n, _)| *n).collect();
        self.log.borrow_mut().push(SinkEvent::Extra(data.epoch, names));
        Ok(())
    }
}

pub type ScriptedTrainer =
    Trainer<ScriptedEnv, ScriptedPolicy, ScriptedPolicy, CountingBuffer, ScriptedAlgorithm>;

/// 5 steps per epoch, paths of at most 3 steps, training from the first
/// transition, evaluation and saves in every epoch.
pub fn config() -> TrainerConfig {
    TrainerConfig::default()
        .num_epochs(1)
        .num_steps_per_epoch(5)
        .num_steps_per_eval(3)
        .max_path_length(3)
        .min_num_steps_before_training(1)
        .num_epochs_per_eval(1)
        .num_epochs_per_param_save(1)
        .save_extra_data_interval(1)
}

pub fn build_trainer(
    config: TrainerConfig,
    terminate_at: Option<usize>,
    algorithm: ScriptedAlgorithm,
) -> Result<ScriptedTrainer> {
    build_trainer_with_ctx(config, RunContext::single(), terminate_at, algorithm)
}

pub fn build_trainer_with_ctx(
    config: TrainerConfig,
    ctx: RunContext,
    terminate_at: Option<usize>,
    algorithm: ScriptedAlgorithm,
) -> Result<ScriptedTrainer> {
    Trainer::build(
        config,
        ctx,
        ScriptedEnv::new(terminate_at),
        ScriptedPolicy::default(),
        ScriptedPolicy::default(),
        CountingBuffer::default(),
        algorithm,
    )
}
