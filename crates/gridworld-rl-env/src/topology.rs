//! Grid bounds, obstacles and 4-connected adjacency

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use gridworld_rl_core::{Action, Position, RLError, Result};

/// Static grid geometry: side length and obstacle cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTopology {
    size: i32,
    obstacles: HashSet<Position>,
}

impl GridTopology {
    /// Create a topology, rejecting obstacles outside the grid
    pub fn new(size: i32, obstacles: impl IntoIterator<Item = Position>) -> Result<Self> {
        if size < 1 {
            return Err(RLError::InvalidConfig(format!(
                "grid size must be at least 1, got {size}"
            )));
        }
        let obstacles: HashSet<Position> = obstacles.into_iter().collect();
        if let Some(outside) = obstacles.iter().find(|p| !p.within(size)) {
            return Err(RLError::InvalidConfig(format!(
                "obstacle {outside} lies outside the {size}x{size} grid"
            )));
        }
        Ok(Self { size, obstacles })
    }

    /// Side length
    #[must_use]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Obstacle cells
    #[must_use]
    pub fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    /// Inside the grid bounds
    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        position.within(self.size)
    }

    /// Whether `position` is an obstacle cell
    #[must_use]
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }

    /// In bounds and not an obstacle
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        self.in_bounds(position) && !self.is_obstacle(position)
    }

    /// Target cell of `action` from `from`, or `None` when the move is blocked
    #[must_use]
    pub fn step(&self, from: Position, action: Action) -> Option<Position> {
        let candidate = from.offset(action);
        self.is_free(candidate).then_some(candidate)
    }

    /// Free 4-connected neighbours of `position`
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        Action::ALL
            .into_iter()
            .filter_map(move |action| self.step(position, action))
    }

    /// Every free cell, column by column
    pub fn free_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (1..=self.size)
            .flat_map(move |x| (1..=self.size).map(move |y| Position::new(x, y)))
            .filter(|p| !self.is_obstacle(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> GridTopology {
        GridTopology::new(
            4,
            [Position::new(1, 3), Position::new(2, 1), Position::new(3, 2)],
        )
        .unwrap()
    }

    #[test]
    fn test_step_blocked_by_edge_and_obstacle() {
        let topo = scenario();
        let start = Position::new(1, 1);
        assert_eq!(topo.step(start, Action::Left), None);
        assert_eq!(topo.step(start, Action::Down), None);
        assert_eq!(topo.step(start, Action::Right), None);
        assert_eq!(topo.step(start, Action::Up), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_neighbors() {
        let topo = scenario();
        let mut around: Vec<_> = topo.neighbors(Position::new(2, 2)).collect();
        around.sort();
        assert_eq!(around, vec![Position::new(1, 2), Position::new(2, 3)]);
    }

    #[test]
    fn test_free_cells() {
        let topo = scenario();
        assert_eq!(topo.free_cells().count(), 13);
        assert!(topo.free_cells().all(|p| topo.is_free(p)));
    }

    #[test]
    fn test_rejects_obstacle_outside_grid() {
        assert!(GridTopology::new(3, [Position::new(4, 1)]).is_err());
        assert!(GridTopology::new(0, []).is_err());
    }
}
