//! Grid actions and the path-trace action label

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of actions available in every state
pub const NUM_ACTIONS: usize = 4;

/// Unit moves on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// (0, +1)
    Up,
    /// (0, -1)
    Down,
    /// (-1, 0)
    Left,
    /// (+1, 0)
    Right,
}

impl Action {
    /// All actions in evaluation order; greedy ties go to the earliest
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Displacement `(dx, dy)` of the move
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, 1),
            Action::Down => (0, -1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// The two actions at right angles to this one
    #[must_use]
    pub fn perpendicular(self) -> [Action; 2] {
        match self {
            Action::Up | Action::Down => [Action::Left, Action::Right],
            Action::Left | Action::Right => [Action::Up, Action::Down],
        }
    }

    /// Position of the action in [`Action::ALL`]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Inverse of [`Action::index`]
    #[must_use]
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Uniformly random action
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Action {
        Self::ALL[rng.gen_range(0..NUM_ACTIONS)]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(name)
    }
}

/// Action label of a path-trace entry: the sentinel `Start` or a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAction {
    /// First entry of every trace
    Start,
    /// A move taken by the policy
    Move(Action),
}

impl fmt::Display for PathAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathAction::Start => f.write_str("Start"),
            PathAction::Move(action) => action.fmt(f),
        }
    }
}
