//! Example: solve the 4x4 scenario with all three solvers

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use gridworld_rl_agent::{
    train, ApproxQAgent, FeatureExtractor, QLearningAgent, ScheduleConfig, TrainingConfig,
    ValueIterationAgent,
};
use gridworld_rl_core::AgentConfig;
use gridworld_rl_env::{GridWorld, GridWorldConfig};

const SCENARIO: &str = r#"{
    "grid_size": 4,
    "obstacles": [{"x": 1, "y": 3}, {"x": 2, "y": 1}, {"x": 3, "y": 2}],
    "goals": [{"x": 2, "y": 2}],
    "start": {"x": 1, "y": 1},
    "rewards": {
        "step_cost": -1.0,
        "stuck_penalty": -10.0,
        "collection_reward": 100.0,
        "terminal_bonus": 500.0
    }
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GridWorldConfig::from_json_str(SCENARIO).context("parsing scenario")?;
    let env = GridWorld::new(&config).context("building grid world")?;
    let agent_config = AgentConfig::default();
    let max_steps = 50;

    println!("scene: {}", env.scene().to_json()?);

    let mut planner = ValueIterationAgent::new(&env, &agent_config)?;
    let report = planner.solve()?;
    println!("value iteration: {} sweeps, converged = {}", report.sweeps, report.converged);
    println!("{}", planner.simulate_path(env.start_state(), max_steps)?.to_json()?);

    let training = TrainingConfig {
        episodes: 1000,
        max_steps_per_episode: 100,
        schedule: ScheduleConfig::Linear {
            start: 1.0,
            end: 0.05,
            episodes: 800,
        },
    };
    let mut rng = StdRng::seed_from_u64(7);

    let mut tabular = QLearningAgent::for_env(&env, &agent_config, Some(1))?;
    let curve = train(&env, &mut tabular, env.start_state(), &training, &mut rng)?;
    let solved = curve.iter().filter(|e| e.reached_terminal).count();
    println!("q-learning: {solved}/{} episodes solved", curve.len());
    println!("{}", tabular.simulate_path(&env, env.start_state(), max_steps)?.to_json()?);

    let mut approx = ApproxQAgent::new(FeatureExtractor::new(&env), &agent_config, Some(2))?;
    let curve = train(&env, &mut approx, env.start_state(), &training, &mut rng)?;
    let solved = curve.iter().filter(|e| e.reached_terminal).count();
    println!("approximate q-learning: {solved}/{} episodes solved", curve.len());
    println!("weights: {}", approx.weights());
    println!("{}", approx.simulate_path(&env, env.start_state(), max_steps)?.to_json()?);

    Ok(())
}
