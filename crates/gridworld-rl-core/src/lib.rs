//! Core grid-world MDP types and traits
//!
//! This crate provides the shared vocabulary of the workspace: positions,
//! goal masks and states, actions, the reward policy, the [`GridMdp`]
//! interface every solver queries, and the path traces solvers hand out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod reward;
pub mod state;
pub mod trajectory;
pub mod value;

// Re-export core traits and types
pub use action::{Action, PathAction, NUM_ACTIONS};
pub use agent::{validate_epsilon, AgentConfig, GreedyPolicy, Learner};
pub use environment::{Dynamics, GridMdp, StepOutcome};
pub use error::{RLError, Result};
pub use reward::{Reward, RewardConfig, StepEvent};
pub use state::{GoalMask, GridState, Position, StateIndexer, MAX_GOALS};
pub use trajectory::{PathStep, PathTrace, Transition};
pub use value::ActionValues;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionValues, AgentConfig, Dynamics, GoalMask, GreedyPolicy, GridMdp, GridState,
        Learner, PathTrace, Position, Result, Reward, RewardConfig, Transition,
    };
}
