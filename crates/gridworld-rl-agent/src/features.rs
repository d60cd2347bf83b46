//! Hand-crafted features for the linear Q-function approximation

use ndarray::Array1;

use gridworld_rl_core::{Action, GridState, Position};
use gridworld_rl_env::{GoalLayout, GridTopology, GridWorld, ShortestPathOracle};

/// Length of every feature vector
pub const FEATURE_COUNT: usize = 5;

/// Slot of each feature in the vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Always 1.0
    Bias = 0,
    /// The move leaves the grid or hits an obstacle
    Collision = 1,
    /// The move brings the agent strictly closer to the nearest uncollected goal
    Progress = 2,
    /// The move lands on an uncollected goal
    Collection = 3,
    /// The move enters the cell occupied one step earlier; never set on a collision
    Reversal = 4,
}

impl Feature {
    /// Every feature in vector order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Bias,
        Feature::Collision,
        Feature::Progress,
        Feature::Collection,
        Feature::Reversal,
    ];

    /// Position in the feature vector
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Turns `(state, action, previous position)` into a feature vector.
///
/// Owns a [`ShortestPathOracle`] whose cache fills as features are queried.
#[derive(Debug)]
pub struct FeatureExtractor {
    oracle: ShortestPathOracle,
    goals: GoalLayout,
}

impl FeatureExtractor {
    /// Extractor for the layout of `env`
    #[must_use]
    pub fn new(env: &GridWorld) -> Self {
        Self::from_parts(env.topology().clone(), env.goals().clone())
    }

    /// Extractor over an explicit topology and goal layout
    #[must_use]
    pub fn from_parts(topology: GridTopology, goals: GoalLayout) -> Self {
        Self {
            oracle: ShortestPathOracle::new(topology),
            goals,
        }
    }

    /// The distance oracle backing the progress feature
    #[must_use]
    pub fn oracle(&self) -> &ShortestPathOracle {
        &self.oracle
    }

    /// Feature vector for taking `action` in `state`
    #[must_use]
    pub fn features(
        &self,
        state: &GridState,
        action: Action,
        previous_position: Option<Position>,
    ) -> Array1<f64> {
        let current = state.position;
        let candidate = self.oracle.topology().step(current, action);
        let collided = candidate.is_none();
        let resulting = candidate.unwrap_or(current);

        let before = self.nearest_goal(current, state);
        let after = if collided {
            None
        } else {
            self.nearest_goal(resulting, state)
        };
        // None stands for an unreachable goal, i.e. +inf
        let progress = match (after, before) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let collection = !collided && self.goals.is_uncollected_goal(resulting, &state.goals);
        let reversal = candidate.is_some() && candidate == previous_position;

        let mut features = Array1::zeros(FEATURE_COUNT);
        features[Feature::Bias.index()] = 1.0;
        features[Feature::Collision.index()] = indicator(collided);
        features[Feature::Progress.index()] = indicator(progress);
        features[Feature::Collection.index()] = indicator(collection);
        features[Feature::Reversal.index()] = indicator(reversal);
        features
    }

    fn nearest_goal(&self, from: Position, state: &GridState) -> Option<u32> {
        self.oracle
            .nearest(from, self.goals.uncollected(&state.goals))
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridworld_rl_core::{GoalMask, RewardConfig};
    use gridworld_rl_env::GridWorldConfig;

    fn scenario() -> GridWorld {
        GridWorld::new(&GridWorldConfig {
            grid_size: 4,
            obstacles: vec![(1, 3).into(), (2, 1).into(), (3, 2).into()],
            goals: vec![(2, 2).into()],
            start: (1, 1).into(),
            intended_action_probability: 1.0,
            rewards: RewardConfig::harsh_stuck(),
        })
        .unwrap()
    }

    fn at(x: i32, y: i32) -> GridState {
        GridState::new(Position::new(x, y), GoalMask::empty(1).unwrap())
    }

    fn feature(f: &Array1<f64>, which: Feature) -> f64 {
        f[which.index()]
    }

    #[test]
    fn test_collision_into_obstacle() {
        let extractor = FeatureExtractor::new(&scenario());
        let f = extractor.features(&at(1, 1), Action::Right, None);
        assert_eq!(f.len(), FEATURE_COUNT);
        assert_eq!(feature(&f, Feature::Bias), 1.0);
        assert_eq!(feature(&f, Feature::Collision), 1.0);
        assert_eq!(feature(&f, Feature::Progress), 0.0);
        assert_eq!(feature(&f, Feature::Collection), 0.0);
    }

    #[test]
    fn test_collision_at_border() {
        let extractor = FeatureExtractor::new(&scenario());
        let f = extractor.features(&at(1, 1), Action::Left, None);
        assert_eq!(feature(&f, Feature::Collision), 1.0);
    }

    #[test]
    fn test_progress_and_collection() {
        let extractor = FeatureExtractor::new(&scenario());
        let up = extractor.features(&at(1, 1), Action::Up, None);
        assert_eq!(feature(&up, Feature::Collision), 0.0);
        assert_eq!(feature(&up, Feature::Progress), 1.0);
        assert_eq!(feature(&up, Feature::Collection), 0.0);

        let right = extractor.features(&at(1, 2), Action::Right, Some(Position::new(1, 1)));
        assert_eq!(feature(&right, Feature::Progress), 1.0);
        assert_eq!(feature(&right, Feature::Collection), 1.0);
        assert_eq!(feature(&right, Feature::Reversal), 0.0);
    }

    #[test]
    fn test_reversal() {
        let extractor = FeatureExtractor::new(&scenario());
        let back = extractor.features(&at(1, 2), Action::Down, Some(Position::new(1, 1)));
        assert_eq!(feature(&back, Feature::Reversal), 1.0);
        assert_eq!(feature(&back, Feature::Progress), 0.0);

        let none = extractor.features(&at(1, 2), Action::Down, None);
        assert_eq!(feature(&none, Feature::Reversal), 0.0);
    }

    #[test]
    fn test_collision_after_stuck_step_is_not_a_reversal() {
        let extractor = FeatureExtractor::new(&scenario());
        // a bump left from (1, 1) leaves the previous position equal to the current one
        let stuck = Some(Position::new(1, 1));
        for action in [Action::Down, Action::Left, Action::Right] {
            let f = extractor.features(&at(1, 1), action, stuck);
            assert_eq!(feature(&f, Feature::Collision), 1.0, "{action}");
            assert_eq!(feature(&f, Feature::Reversal), 0.0, "{action}");
        }
        let up = extractor.features(&at(1, 1), Action::Up, stuck);
        assert_eq!(feature(&up, Feature::Reversal), 0.0);
    }

    #[test]
    fn test_no_progress_once_goals_collected() {
        let extractor = FeatureExtractor::new(&scenario());
        let done = GridState::new(Position::new(1, 2), GoalMask::from_flags(&[true]).unwrap());
        let f = extractor.features(&done, Action::Up, None);
        assert_eq!(feature(&f, Feature::Progress), 0.0);
        assert_eq!(feature(&f, Feature::Collection), 0.0);
    }
}
