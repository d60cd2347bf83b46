//! Lazy enumeration of the state space

use gridworld_rl_core::{GoalMask, GridState, Position};

use crate::topology::GridTopology;

/// Every `(free cell, goal mask)` pair, produced on demand.
///
/// The product grows as `2^goals`, so it is never materialized.
#[derive(Debug, Clone)]
pub struct StateSpace {
    cells: Vec<Position>,
    goals: GoalMask,
    cell: usize,
    bits: u64,
}

impl StateSpace {
    /// Enumerate the states of `topology` with every mask as long as `goals`
    #[must_use]
    pub fn new(topology: &GridTopology, goals: GoalMask) -> Self {
        Self {
            cells: topology.free_cells().collect(),
            goals,
            cell: 0,
            bits: 0,
        }
    }

    fn masks_per_cell(&self) -> u64 {
        1 << self.goals.len()
    }
}

impl Iterator for StateSpace {
    type Item = GridState;

    fn next(&mut self) -> Option<Self::Item> {
        let position = *self.cells.get(self.cell)?;
        let state = GridState::new(position, self.goals.with_bits(self.bits));
        self.bits += 1;
        if self.bits == self.masks_per_cell() {
            self.bits = 0;
            self.cell += 1;
        }
        Some(state)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_cells = self.cells.len().saturating_sub(self.cell);
        let remaining = (remaining_cells as u64 * self.masks_per_cell()).saturating_sub(self.bits);
        (remaining as usize, Some(remaining as usize))
    }
}

impl ExactSizeIterator for StateSpace {}
