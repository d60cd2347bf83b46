//! Grid positions, goal masks and the composite MDP state

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::Action;
use crate::RLError;

/// Largest number of goals a [`GoalMask`] can track
pub const MAX_GOALS: usize = 63;

/// A 1-indexed grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column, 1-indexed
    pub x: i32,
    /// Row, 1-indexed, growing upwards
    pub y: i32,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one unit away in the direction of `action`.
    ///
    /// The result may lie outside the grid; bounds are the topology's concern.
    #[must_use]
    pub fn offset(self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether the position lies inside a `size` × `size` grid
    #[must_use]
    pub fn within(self, size: i32) -> bool {
        (1..=size).contains(&self.x) && (1..=size).contains(&self.y)
    }

    /// Dense row-major index of the cell in a `size` × `size` grid
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn index(self, size: i32) -> usize {
        debug_assert!(self.within(size));
        ((self.x - 1) * size + (self.y - 1)) as usize
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Which goals have been collected, one bit per goal in goal-index order.
///
/// Bits only ever turn on within an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGoalMask")]
pub struct GoalMask {
    bits: u64,
    len: u8,
}

#[derive(Deserialize)]
struct RawGoalMask {
    bits: u64,
    len: usize,
}

impl TryFrom<RawGoalMask> for GoalMask {
    type Error = RLError;

    fn try_from(raw: RawGoalMask) -> crate::Result<Self> {
        Self::from_bits(raw.bits, raw.len)
    }
}

impl GoalMask {
    /// A mask of `len` goals, none collected.
    ///
    /// Fails with [`RLError::InvalidConfig`] when `len` exceeds [`MAX_GOALS`].
    pub fn empty(len: usize) -> crate::Result<Self> {
        let len = u8::try_from(len)
            .ok()
            .filter(|&l| usize::from(l) <= MAX_GOALS)
            .ok_or_else(|| {
                RLError::InvalidConfig(format!(
                    "{len} goals requested, at most {MAX_GOALS} supported"
                ))
            })?;
        Ok(Self { bits: 0, len })
    }

    /// Build a mask from raw bits; bits beyond `len` are dropped
    pub fn from_bits(bits: u64, len: usize) -> crate::Result<Self> {
        Ok(Self::empty(len)?.with_bits(bits))
    }

    /// Build a mask from per-goal flags
    pub fn from_flags(flags: &[bool]) -> crate::Result<Self> {
        let bits = flags
            .iter()
            .enumerate()
            .filter(|&(_, &collected)| collected)
            .fold(0_u64, |acc, (i, _)| acc | (1 << i));
        Self::from_bits(bits, flags.len())
    }

    /// Same goals, collection status replaced by `bits`; bits beyond `len` are dropped
    #[must_use]
    pub fn with_bits(self, bits: u64) -> Self {
        Self {
            bits: bits & Self::full_bits(self.len()),
            len: self.len,
        }
    }

    fn full_bits(len: usize) -> u64 {
        if len == 0 {
            0
        } else {
            u64::MAX >> (64 - len)
        }
    }

    /// Raw bit representation
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of goals tracked
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Whether the mask tracks no goals at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether goal `index` has been collected
    #[must_use]
    pub fn is_collected(&self, index: usize) -> bool {
        index < self.len() && self.bits & (1 << index) != 0
    }

    /// Copy of this mask with goal `index` collected
    #[must_use]
    pub fn with_collected(self, index: usize) -> Self {
        debug_assert!(index < self.len());
        Self {
            bits: self.bits | (1 << index),
            len: self.len,
        }
    }

    /// Number of collected goals
    #[must_use]
    pub fn collected_count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// True once every goal is collected
    #[must_use]
    pub fn all_collected(&self) -> bool {
        self.bits == Self::full_bits(self.len())
    }

    /// Indices of goals not yet collected
    pub fn uncollected(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&i| !self.is_collected(i))
    }

    /// Per-goal flags in goal-index order
    #[must_use]
    pub fn flags(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.is_collected(i)).collect()
    }
}

impl fmt::Display for GoalMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            f.write_str(if self.is_collected(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// The MDP state: agent position plus collected goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridState {
    /// Agent position
    pub position: Position,
    /// Goal collection status
    pub goals: GoalMask,
}

impl GridState {
    /// Create a new state
    #[must_use]
    pub fn new(position: Position, goals: GoalMask) -> Self {
        Self { position, goals }
    }

    /// Episode start: at `position` with nothing collected
    pub fn initial(position: Position, goal_count: usize) -> crate::Result<Self> {
        Ok(Self::new(position, GoalMask::empty(goal_count)?))
    }

    /// Terminal iff every goal has been collected
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.goals.all_collected()
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.position, self.goals)
    }
}

/// Dense integer encoding of [`GridState`]:
/// `position_index × 2^goal_count + goal_bits`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateIndexer {
    grid_size: i32,
    goal_count: usize,
}

impl StateIndexer {
    /// Create an indexer for a `grid_size` × `grid_size` grid with `goal_count` goals
    #[must_use]
    pub fn new(grid_size: i32, goal_count: usize) -> Self {
        Self {
            grid_size,
            goal_count,
        }
    }

    /// Number of goal masks per cell
    #[must_use]
    pub fn masks_per_cell(&self) -> usize {
        1 << self.goal_count
    }

    /// Total number of encodable states, obstacle cells included
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn len(&self) -> usize {
        (self.grid_size * self.grid_size) as usize * self.masks_per_cell()
    }

    /// Whether no state is encodable
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense index of `state`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(&self, state: &GridState) -> usize {
        state.position.index(self.grid_size) * self.masks_per_cell() + state.goals.bits() as usize
    }

    /// Dense index of `state`, or an error if it does not fit this grid
    pub fn checked_index(&self, state: &GridState) -> crate::Result<usize> {
        if !state.position.within(self.grid_size) || state.goals.len() != self.goal_count {
            return Err(crate::RLError::InvalidState(format!(
                "{state} does not fit a {0}x{0} grid with {1} goals",
                self.grid_size, self.goal_count
            )));
        }
        Ok(self.index(state))
    }
}
