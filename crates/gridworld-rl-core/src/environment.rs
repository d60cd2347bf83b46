//! The MDP interface every solver talks to

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Action, GridState, Reward, StateIndexer, StepEvent};

/// How the executed action relates to the intended one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dynamics {
    /// The intended action may slip to a perpendicular one
    Stochastic,
    /// The intended action is always executed
    Deterministic,
}

/// Result of a single transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// State after the move
    pub next_state: GridState,
    /// Reward for the move
    pub reward: Reward,
    /// Action actually executed (differs from the intended one on a slip)
    pub executed: Action,
    /// What happened
    pub event: StepEvent,
}

impl StepOutcome {
    /// The `(next_state, reward)` pair
    #[must_use]
    pub fn into_pair(self) -> (GridState, Reward) {
        (self.next_state, self.reward)
    }
}

/// A grid-world Markov decision process.
///
/// Solvers query the model only through this trait.
pub trait GridMdp {
    /// Side length of the square grid
    fn grid_size(&self) -> i32;

    /// Number of goal cells
    fn goal_count(&self) -> usize;

    /// Apply `executed` to `state` with no randomness.
    ///
    /// Terminal states are absorbing: they come back unchanged with zero reward.
    fn resolve(&self, state: &GridState, executed: Action) -> StepOutcome;

    /// Pick the action that actually runs when `intended` is requested
    fn execute_action<R: Rng + ?Sized>(&self, intended: Action, rng: &mut R) -> Action;

    /// Every state of the MDP, enumerated lazily
    fn states(&self) -> Box<dyn Iterator<Item = GridState> + '_>;

    /// Terminal iff every goal is collected
    fn is_terminal(&self, state: &GridState) -> bool {
        state.is_terminal()
    }

    /// Dense encoding for tables sized to this MDP
    fn indexer(&self) -> StateIndexer {
        StateIndexer::new(self.grid_size(), self.goal_count())
    }

    /// One step of the model
    fn transition<R: Rng + ?Sized>(
        &self,
        state: &GridState,
        action: Action,
        dynamics: Dynamics,
        rng: &mut R,
    ) -> StepOutcome {
        if self.is_terminal(state) {
            return self.resolve(state, action);
        }
        let executed = match dynamics {
            Dynamics::Deterministic => action,
            Dynamics::Stochastic => self.execute_action(action, rng),
        };
        self.resolve(state, executed)
    }

    /// One step with the intended action always executed
    fn transition_deterministic(&self, state: &GridState, action: Action) -> StepOutcome {
        self.resolve(state, action)
    }
}
