mod common;
use anyhow::Result;
use common::{build_trainer, config, Obs, ScriptedAlgorithm};
use rollout_core::{path::Path, record::BufferedRecorder, Transition};
use test_log::test;

#[test]
fn test_terminal_step_ends_rollout() -> Result<()> {
    let mut trainer = build_trainer(config(), Some(3), ScriptedAlgorithm::default())?;
    trainer.start_epoch(0);
    let mut obs = trainer.start_new_rollout()?;
    for _ in 0..5 {
        obs = trainer.take_step_in_env(obs)?;
    }

    assert_eq!(trainer.n_env_steps_total(), 5);
    assert_eq!(trainer.n_rollouts_total(), 1);
    assert_eq!(trainer.exploration_paths().len(), 1);
    assert_eq!(trainer.current_path_len(), 2);

    let path = &trainer.exploration_paths()[0];
    assert_eq!(path.len(), 3);
    assert_eq!(path.terminals, vec![0, 0, 1]);
    assert_eq!(path.next_observations[2], Obs { episode: 1, t: 3 });

    // The rollout after the terminal step starts from a reset
    assert_eq!(obs, Obs { episode: 2, t: 2 });
    assert_eq!(trainer.training_env().n_resets, 2);
    assert_eq!(trainer.exploration_policy().n_resets, 2);

    assert_eq!(trainer.replay_buffer().n_samples, 5);
    assert_eq!(trainer.replay_buffer().n_episodes, 1);
    Ok(())
}

#[test]
fn test_max_path_length_ends_rollout() -> Result<()> {
    let mut trainer = build_trainer(config(), None, ScriptedAlgorithm::default())?;
    trainer.start_epoch(0);
    let mut obs = trainer.start_new_rollout()?;
    for _ in 0..7 {
        obs = trainer.take_step_in_env(obs)?;
    }

    assert_eq!(trainer.n_rollouts_total(), 2);
    assert_eq!(trainer.current_path_len(), 1);
    for path in trainer.exploration_paths() {
        assert_eq!(path.len(), 3);
        assert_eq!(path.terminals, vec![0, 0, 0]);
    }
    assert_eq!(obs, Obs { episode: 3, t: 1 });
    Ok(())
}

#[test]
fn test_step_counter_and_reward_scale() -> Result<()> {
    let mut trainer = build_trainer(
        config().reward_scale(2.0),
        Some(3),
        ScriptedAlgorithm::default(),
    )?;
    trainer.start_epoch(0);
    let mut obs = trainer.start_new_rollout()?;
    for i in 0..4 {
        obs = trainer.take_step_in_env(obs)?;
        assert_eq!(trainer.n_env_steps_total(), i + 1);
        // The policy is informed of the steps taken before its action
        assert_eq!(trainer.exploration_policy().num_steps_total, Some(i));
    }

    assert_eq!(trainer.replay_buffer().rewards, vec![2.0; 4]);
    assert_eq!(trainer.exploration_paths()[0].rewards, vec![2.0; 3]);
    Ok(())
}

#[test]
fn test_ending_empty_rollout_keeps_no_path() -> Result<()> {
    let mut trainer = build_trainer(config(), Some(3), ScriptedAlgorithm::default())?;
    trainer.start_epoch(0);
    trainer.handle_rollout_ending();

    assert_eq!(trainer.n_rollouts_total(), 1);
    assert_eq!(trainer.replay_buffer().n_episodes, 1);
    assert!(trainer.exploration_paths().is_empty());
    Ok(())
}

#[test]
fn test_rollout_continues_across_epochs() -> Result<()> {
    let mut trainer = build_trainer(config(), Some(3), ScriptedAlgorithm::default())?;
    trainer.start_epoch(0);
    let mut obs = trainer.start_new_rollout()?;
    for _ in 0..5 {
        obs = trainer.take_step_in_env(obs)?;
    }
    assert_eq!(trainer.current_path_len(), 2);
    assert_eq!(trainer.n_rollouts_total(), 1);

    trainer.start_epoch(1);
    let obs = trainer.start_new_rollout()?;

    // The reset does not end the rollout
    assert_eq!(obs, Obs { episode: 3, t: 0 });
    assert_eq!(trainer.current_path_len(), 2);
    assert_eq!(trainer.n_rollouts_total(), 1);
    assert_eq!(trainer.replay_buffer().n_episodes, 1);
    assert!(trainer.exploration_paths().is_empty());

    // It ends on reaching max_path_length
    trainer.take_step_in_env(obs)?;
    assert_eq!(trainer.n_rollouts_total(), 2);
    assert_eq!(trainer.exploration_paths().len(), 1);
    assert_eq!(trainer.exploration_paths()[0].len(), 3);
    Ok(())
}

#[test]
fn test_unfinished_rollouts_are_not_evaluated() -> Result<()> {
    let config = config().num_epochs(2).max_path_length(100);
    let mut trainer = build_trainer(config, None, ScriptedAlgorithm::default())?;
    let mut recorder = BufferedRecorder::new();
    trainer.train(&mut recorder)?;

    assert_eq!(trainer.n_env_steps_total(), 10);
    assert_eq!(trainer.current_path_len(), 10);
    assert_eq!(trainer.n_rollouts_total(), 0);
    assert_eq!(trainer.replay_buffer().n_episodes, 0);
    assert!(recorder.is_empty());
    Ok(())
}

#[test]
fn test_handle_path() -> Result<()> {
    let mut trainer = build_trainer(config(), Some(3), ScriptedAlgorithm::default())?;
    trainer.start_epoch(0);

    let transitions = (0..4)
        .map(|t| Transition {
            obs: Obs { episode: 0, t },
            act: common::Act(1),
            reward: vec![0.5],
            next_obs: Obs { episode: 0, t: t + 1 },
            terminal: vec![(t == 3) as i8],
            agent_info: Default::default(),
            env_info: (),
        })
        .collect::<Vec<_>>();
    trainer.handle_path(Path::from_transitions(transitions));

    assert_eq!(trainer.replay_buffer().n_samples, 4);
    assert_eq!(trainer.replay_buffer().n_episodes, 1);
    assert_eq!(trainer.n_rollouts_total(), 1);
    assert_eq!(trainer.exploration_paths()[0].total_return(), 2.0);
    // Paths collected elsewhere do not count as environment steps
    assert_eq!(trainer.n_env_steps_total(), 0);
    Ok(())
}

#[test]
fn test_transition_without_reward_or_terminal() {
    let transition = Transition::<common::ScriptedEnv> {
        obs: Obs { episode: 0, t: 0 },
        act: common::Act(1),
        reward: vec![],
        next_obs: Obs { episode: 0, t: 1 },
        terminal: vec![],
        agent_info: Default::default(),
        env_info: (),
    };
    assert_eq!(transition.reward(), 0.0);
    assert!(!transition.is_terminal());
}
