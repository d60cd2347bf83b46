//! Episode loop shared by the learning agents

use rand::Rng;
use serde::{Deserialize, Serialize};

use gridworld_rl_core::{
    validate_epsilon, Dynamics, GridMdp, GridState, Learner, RLError, Result, Reward, Transition,
};

use crate::schedule::ScheduleConfig;

/// How long and how exploratory training is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Episodes to run
    pub episodes: usize,
    /// Step budget per episode
    pub max_steps_per_episode: usize,
    /// ε as a function of the episode index
    pub schedule: ScheduleConfig,
}

impl TrainingConfig {
    /// Reject an empty step budget or an out-of-range ε schedule
    pub fn validate(&self) -> Result<()> {
        if self.max_steps_per_episode == 0 {
            return Err(RLError::InvalidConfig(
                "max_steps_per_episode must be positive".to_string(),
            ));
        }
        self.schedule.validate()
    }
}

/// Learning-curve data for one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Zero-based episode number
    pub index: usize,
    /// Exploration rate used
    pub epsilon: f64,
    /// Undiscounted return
    pub total_reward: Reward,
    /// Moves made
    pub steps: usize,
    /// Whether every goal was collected
    pub reached_terminal: bool,
}

/// Run episode `index` of choose → stochastic transition → learn from `start`
pub fn run_episode<E, L, R>(
    env: &E,
    learner: &mut L,
    start: GridState,
    index: usize,
    epsilon: f64,
    max_steps: usize,
    rng: &mut R,
) -> Result<EpisodeSummary>
where
    E: GridMdp + ?Sized,
    L: Learner + ?Sized,
    R: Rng + ?Sized,
{
    let epsilon = validate_epsilon(epsilon)?;
    let mut state = start;
    let mut previous = None;
    let mut total_reward = Reward::ZERO;
    let mut steps = 0;

    while steps < max_steps && !env.is_terminal(&state) {
        let action = learner.choose_action(&state, previous, epsilon);
        let outcome = env.transition(&state, action, Dynamics::Stochastic, rng);
        learner.learn(&Transition {
            state,
            action,
            reward: outcome.reward,
            next_state: outcome.next_state,
            previous_position: previous,
        });
        total_reward += outcome.reward;
        steps += 1;
        previous = Some(state.position);
        state = outcome.next_state;
    }
    Ok(EpisodeSummary {
        index,
        epsilon,
        total_reward,
        steps,
        reached_terminal: env.is_terminal(&state),
    })
}

/// Train `learner` for `config.episodes` episodes, each starting at `start`
pub fn train<E, L, R>(
    env: &E,
    learner: &mut L,
    start: GridState,
    config: &TrainingConfig,
    rng: &mut R,
) -> Result<Vec<EpisodeSummary>>
where
    E: GridMdp + ?Sized,
    L: Learner + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    let schedule = config.schedule.build();
    let mut summaries = Vec::with_capacity(config.episodes);
    tracing::info!(episodes = config.episodes, %start, "training started");

    for index in 0..config.episodes {
        let epsilon = schedule.value(index);
        let summary = run_episode(
            env,
            learner,
            start,
            index,
            epsilon,
            config.max_steps_per_episode,
            rng,
        )?;

        #[allow(clippy::cast_precision_loss)]
        let steps = summary.steps as f64;
        metrics::increment_counter!("gridworld_training_episodes_total");
        metrics::histogram!("gridworld_episode_reward", summary.total_reward.value());
        metrics::histogram!("gridworld_episode_steps", steps);
        tracing::debug!(
            episode = index,
            epsilon,
            total_reward = summary.total_reward.value(),
            steps = summary.steps,
            reached_terminal = summary.reached_terminal,
            "episode finished"
        );
        summaries.push(summary);
    }

    let solved = summaries.iter().filter(|s| s.reached_terminal).count();
    tracing::info!(episodes = config.episodes, solved, "training finished");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridworld_rl_core::{AgentConfig, RewardConfig};
    use gridworld_rl_env::{GridWorld, GridWorldConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::QLearningAgent;

    fn corridor() -> GridWorld {
        GridWorld::new(&GridWorldConfig {
            grid_size: 3,
            obstacles: Vec::new(),
            goals: vec![(3, 3).into()],
            start: (1, 1).into(),
            intended_action_probability: 0.8,
            rewards: RewardConfig::mild(),
        })
        .unwrap()
    }

    #[test]
    fn test_summaries_follow_schedule() {
        let env = corridor();
        let mut agent = QLearningAgent::for_env(&env, &AgentConfig::default(), Some(2)).unwrap();
        let config = TrainingConfig {
            episodes: 20,
            max_steps_per_episode: 50,
            schedule: ScheduleConfig::Linear {
                start: 1.0,
                end: 0.0,
                episodes: 10,
            },
        };
        let mut rng = StdRng::seed_from_u64(9);
        let summaries = train(&env, &mut agent, env.start_state(), &config, &mut rng).unwrap();

        assert_eq!(summaries.len(), 20);
        assert_eq!(summaries[0].epsilon, 1.0);
        assert_eq!(summaries[15].epsilon, 0.0);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.index, i);
            assert!(summary.steps <= 50);
            assert!(summary.reached_terminal || summary.steps == 50);
        }
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let env = corridor();
        let mut agent = QLearningAgent::for_env(&env, &AgentConfig::default(), Some(2)).unwrap();
        let config = TrainingConfig {
            episodes: 1,
            max_steps_per_episode: 10,
            schedule: ScheduleConfig::Constant { value: 2.0 },
        };
        let mut rng = StdRng::seed_from_u64(0);
        let result = train(&env, &mut agent, env.start_state(), &config, &mut rng);
        assert!(matches!(result, Err(RLError::InvalidConfig(_))));
    }
}
