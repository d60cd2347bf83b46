//! Memoized shortest-path distances on the obstacle grid

use dashmap::DashMap;
use std::collections::{HashSet, VecDeque};

use gridworld_rl_core::Position;

use crate::topology::GridTopology;

/// Breadth-first shortest-path oracle with an order-independent cache.
///
/// Each unordered pair of cells is searched at most once. The topology is
/// immutable, so cached entries never go stale.
#[derive(Debug)]
pub struct ShortestPathOracle {
    topology: GridTopology,
    cache: DashMap<(Position, Position), Option<u32>>,
}

impl ShortestPathOracle {
    /// Create an oracle over `topology` with an empty cache
    #[must_use]
    pub fn new(topology: GridTopology) -> Self {
        Self {
            topology,
            cache: DashMap::new(),
        }
    }

    /// The topology searched
    #[must_use]
    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    /// Hop count of a shortest obstacle-free path, `None` if unreachable.
    ///
    /// Blocked or out-of-bounds endpoints are unreachable.
    pub fn distance(&self, a: Position, b: Position) -> Option<u32> {
        let key = if a <= b { (a, b) } else { (b, a) };
        *self
            .cache
            .entry(key)
            .or_insert_with(|| bfs(&self.topology, key.0, key.1))
    }

    /// Distance from `from` to the closest reachable target
    pub fn nearest<I>(&self, from: Position, targets: I) -> Option<u32>
    where
        I: IntoIterator<Item = Position>,
    {
        targets
            .into_iter()
            .filter_map(|target| self.distance(from, target))
            .min()
    }

    /// Number of cached pairs
    #[must_use]
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}

fn bfs(topology: &GridTopology, start: Position, goal: Position) -> Option<u32> {
    if !topology.is_free(start) || !topology.is_free(goal) {
        return None;
    }
    if start == goal {
        return Some(0);
    }
    tracing::trace!(%start, %goal, "distance cache miss");

    let mut queue = VecDeque::from([(start, 0_u32)]);
    let mut visited = HashSet::from([start]);
    while let Some((cell, dist)) = queue.pop_front() {
        for next in topology.neighbors(cell) {
            if next == goal {
                return Some(dist + 1);
            }
            if visited.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
    None
}
