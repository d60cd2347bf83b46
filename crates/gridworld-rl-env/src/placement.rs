//! Random goal and obstacle placement

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use gridworld_rl_core::{Position, RLError, Result};

use crate::layout::GoalLayout;

fn candidate_cells(grid_size: i32, excluded: &HashSet<Position>, start: Position) -> Vec<Position> {
    (1..=grid_size)
        .flat_map(|x| (1..=grid_size).map(move |y| Position::new(x, y)))
        .filter(|p| *p != start && !excluded.contains(p))
        .collect()
}

fn sample_cells<R: Rng + ?Sized>(cells: &[Position], count: usize, rng: &mut R) -> Result<Vec<Position>> {
    if cells.len() < count {
        return Err(RLError::InfeasiblePlacement {
            requested: count,
            available: cells.len(),
        });
    }
    Ok(cells.choose_multiple(rng, count).copied().collect())
}

/// Place `goal_count` goals on distinct free cells other than `start`.
///
/// Fails with [`RLError::InfeasiblePlacement`] when there are too few free cells.
pub fn generate_goal_layout<R: Rng + ?Sized>(
    grid_size: i32,
    goal_count: usize,
    obstacles: &HashSet<Position>,
    start: Position,
    rng: &mut R,
) -> Result<GoalLayout> {
    let cells = candidate_cells(grid_size, obstacles, start);
    let chosen = sample_cells(&cells, goal_count, rng)?;
    tracing::debug!(goal_count, free = cells.len(), "goals placed");
    GoalLayout::new(chosen)
}

/// Place `obstacle_count` obstacles on distinct cells other than `start`.
///
/// Fails with [`RLError::InfeasiblePlacement`] when there are too few cells.
pub fn generate_obstacles<R: Rng + ?Sized>(
    grid_size: i32,
    obstacle_count: usize,
    start: Position,
    rng: &mut R,
) -> Result<HashSet<Position>> {
    let cells = candidate_cells(grid_size, &HashSet::new(), start);
    let chosen = sample_cells(&cells, obstacle_count, rng)?;
    tracing::debug!(obstacle_count, "obstacles placed");
    Ok(chosen.into_iter().collect())
}
