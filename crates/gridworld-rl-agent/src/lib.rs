//! Solvers for the grid-world MDP
//!
//! This crate provides:
//! - Value iteration over the full state space
//! - Tabular Q-learning
//! - Q-learning with a linear approximation over hand-crafted features
//! - Greedy rollouts, ε schedules and a training loop shared by the learners

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod approx_q;
pub mod exploration;
pub mod features;
pub mod q_learning;
pub mod rollout;
pub mod schedule;
pub mod training;
pub mod value_iteration;

// Re-export agents
pub use approx_q::ApproxQAgent;
pub use q_learning::QLearningAgent;
pub use value_iteration::{SolveReport, SolverPhase, ValueIterationAgent};

// Re-export supporting components
pub use exploration::{epsilon_greedy, seeded_rng};
pub use features::{Feature, FeatureExtractor, FEATURE_COUNT};
pub use rollout::simulate_path;
pub use schedule::{ConstantSchedule, ExponentialSchedule, LinearSchedule, Schedule, ScheduleConfig};
pub use training::{run_episode, train, EpisodeSummary, TrainingConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ApproxQAgent, EpisodeSummary, FeatureExtractor, QLearningAgent, ScheduleConfig,
        TrainingConfig, ValueIterationAgent,
    };
    pub use gridworld_rl_env::prelude::*;
}
