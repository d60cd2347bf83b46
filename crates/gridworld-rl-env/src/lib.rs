//! Grid-world environment for the goal-collection MDP
//!
//! This crate provides:
//! - The static grid topology and its 4-connected adjacency
//! - A memoized breadth-first shortest-path oracle
//! - The stochastic transition and reward model ([`GridWorld`])
//! - Lazy state-space enumeration for dynamic programming
//! - Random goal and obstacle placement

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod distance;
pub mod grid_world;
pub mod layout;
pub mod placement;
pub mod space;
pub mod topology;

// Re-export environment types
pub use distance::ShortestPathOracle;
pub use grid_world::{GridWorld, GridWorldConfig};
pub use layout::{GoalLayout, GoalSite, SceneLayout};
pub use placement::{generate_goal_layout, generate_obstacles};
pub use space::StateSpace;
pub use topology::GridTopology;

// Re-export core types
pub use gridworld_rl_core::{
    Action, Dynamics, GoalMask, GridMdp, GridState, Position, Reward, RewardConfig, StepEvent,
    StepOutcome,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{GoalLayout, GridTopology, GridWorld, GridWorldConfig, ShortestPathOracle};
    pub use gridworld_rl_core::prelude::*;
}
