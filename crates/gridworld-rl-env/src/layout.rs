//! Goal placement and the static scene handed to renderers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use gridworld_rl_core::{GoalMask, Position, RLError, Result, MAX_GOALS};

/// Goal cells keyed by position; insertion order is the goal index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoalLayout {
    sites: IndexMap<Position, usize>,
}

impl GoalLayout {
    /// Goals in index order; duplicates are rejected
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Result<Self> {
        let mut sites = IndexMap::new();
        for position in positions {
            let index = sites.len();
            if sites.insert(position, index).is_some() {
                return Err(RLError::InvalidConfig(format!("duplicate goal at {position}")));
            }
        }
        if sites.len() > MAX_GOALS {
            return Err(RLError::InvalidConfig(format!(
                "{} goals requested, at most {MAX_GOALS} supported",
                sites.len()
            )));
        }
        Ok(Self { sites })
    }

    /// Number of goals
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether there are no goals
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Goal index of the cell, if it holds a goal
    #[must_use]
    pub fn index_of(&self, position: Position) -> Option<usize> {
        self.sites.get(&position).copied()
    }

    /// Cell of goal `index`
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<Position> {
        self.sites.get_index(index).map(|(position, _)| *position)
    }

    /// Goal positions in index order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.sites.keys().copied()
    }

    /// Positions of goals `mask` has not collected yet
    pub fn uncollected<'a>(&'a self, mask: &'a GoalMask) -> impl Iterator<Item = Position> + 'a {
        mask.uncollected().filter_map(|index| self.position_of(index))
    }

    /// Whether `position` holds a goal `mask` has not collected
    #[must_use]
    pub fn is_uncollected_goal(&self, position: Position, mask: &GoalMask) -> bool {
        self.index_of(position)
            .is_some_and(|index| !mask.is_collected(index))
    }
}

/// One goal cell as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSite {
    /// Cell holding the goal
    pub position: Position,
    /// Goal index in the mask
    pub index: usize,
}

/// Static scenery: grid size, goals and obstacles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneLayout {
    /// Side length
    pub grid_size: i32,
    /// Goals in index order
    pub goals: Vec<GoalSite>,
    /// Obstacle cells, sorted
    pub obstacles: Vec<Position>,
}

impl SceneLayout {
    /// JSON form for the renderer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
