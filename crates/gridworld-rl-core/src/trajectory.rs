//! Transitions fed to learners and path traces handed to renderers

use serde::{Deserialize, Serialize};

use crate::{Action, GridState, PathAction, Position, Reward};

/// Single learning transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// State the action was taken in
    pub state: GridState,
    /// Intended action
    pub action: Action,
    /// Reward received
    pub reward: Reward,
    /// Resulting state
    pub next_state: GridState,
    /// Position occupied before `state`, if any
    pub previous_position: Option<Position>,
}

/// One entry of a path trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// State reached
    pub state: GridState,
    /// Action that reached it, or `Start`
    pub action: PathAction,
    /// Reward accumulated up to and including this step
    pub cumulative_reward: Reward,
}

/// Greedy rollout of a trained policy, starting with a `Start` entry at reward 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTrace {
    steps: Vec<PathStep>,
}

impl PathTrace {
    /// Create a trace holding only the start entry
    #[must_use]
    pub fn new(start: GridState) -> Self {
        Self {
            steps: vec![PathStep {
                state: start,
                action: PathAction::Start,
                cumulative_reward: Reward::ZERO,
            }],
        }
    }

    /// Append a move and its reward
    pub fn push(&mut self, action: Action, next_state: GridState, reward: Reward) {
        let cumulative_reward = self.total_reward() + reward;
        self.steps.push(PathStep {
            state: next_state,
            action: PathAction::Move(action),
            cumulative_reward,
        });
    }

    /// All entries, start first
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of moves (the start entry excluded)
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len() - 1
    }

    /// Whether no move was made
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// State at the end of the trace
    #[must_use]
    pub fn final_state(&self) -> GridState {
        self.last().state
    }

    /// Reward accumulated over the whole trace
    #[must_use]
    pub fn total_reward(&self) -> Reward {
        self.last().cumulative_reward
    }

    /// Whether the trace ends in a terminal state
    #[must_use]
    pub fn reached_terminal(&self) -> bool {
        self.final_state().is_terminal()
    }

    /// Actions taken, in order
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.steps.iter().filter_map(|step| match step.action {
            PathAction::Move(action) => Some(action),
            PathAction::Start => None,
        })
    }

    /// Discounted return of the trace from its start
    #[must_use]
    pub fn discounted_return(&self, gamma: f64) -> f64 {
        self.steps
            .windows(2)
            .map(|pair| (pair[1].cumulative_reward.0 - pair[0].cumulative_reward.0))
            .rev()
            .fold(0.0, |running, reward| reward + gamma * running)
    }

    /// JSON form for the renderer
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn last(&self) -> &PathStep {
        // never empty: `new` seeds the start entry
        &self.steps[self.steps.len() - 1]
    }
}
