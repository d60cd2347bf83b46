//! The goal-collecting grid-world MDP

use rand::Rng;
use serde::{Deserialize, Serialize};

use gridworld_rl_core::{
    Action, GridMdp, GridState, Position, RLError, Result, RewardConfig, StepEvent, StepOutcome,
};

use crate::layout::{GoalLayout, GoalSite, SceneLayout};
use crate::space::StateSpace;
use crate::topology::GridTopology;

fn default_intended_action_probability() -> f64 {
    0.8
}

/// Configuration for a [`GridWorld`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorldConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// Obstacle cells
    #[serde(default)]
    pub obstacles: Vec<Position>,
    /// Goal cells; list order is the goal index
    pub goals: Vec<Position>,
    /// Where episodes begin
    pub start: Position,
    /// Probability that the intended action is the one executed
    #[serde(default = "default_intended_action_probability")]
    pub intended_action_probability: f64,
    /// Reward magnitudes
    pub rewards: RewardConfig,
}

impl GridWorldConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Range checks that need no topology
    pub fn validate(&self) -> Result<()> {
        let p = self.intended_action_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(RLError::InvalidConfig(format!(
                "intended_action_probability must lie in (0, 1], got {p}"
            )));
        }
        self.rewards.validate()
    }
}

/// Grid world where the agent collects every goal while avoiding obstacles.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct GridWorld {
    topology: GridTopology,
    goals: GoalLayout,
    start: Position,
    start_state: GridState,
    intended_action_probability: f64,
    rewards: RewardConfig,
}

impl GridWorld {
    /// Build and validate an environment from its configuration
    pub fn new(config: &GridWorldConfig) -> Result<Self> {
        config.validate()?;
        let topology = GridTopology::new(config.grid_size, config.obstacles.iter().copied())?;
        let goals = GoalLayout::new(config.goals.iter().copied())?;
        Self::from_parts(
            topology,
            goals,
            config.start,
            config.intended_action_probability,
            config.rewards,
        )
    }

    /// Assemble an environment from prebuilt parts, e.g. generated placements
    pub fn from_parts(
        topology: GridTopology,
        goals: GoalLayout,
        start: Position,
        intended_action_probability: f64,
        rewards: RewardConfig,
    ) -> Result<Self> {
        if !topology.is_free(start) {
            return Err(RLError::InvalidConfig(format!("start {start} is not a free cell")));
        }
        if let Some(blocked) = goals.positions().find(|g| !topology.is_free(*g)) {
            return Err(RLError::InvalidConfig(format!("goal {blocked} is not a free cell")));
        }
        if !(intended_action_probability > 0.0 && intended_action_probability <= 1.0) {
            return Err(RLError::InvalidConfig(format!(
                "intended_action_probability must lie in (0, 1], got {intended_action_probability}"
            )));
        }
        rewards.validate()?;
        let start_state = GridState::initial(start, goals.len())?;

        tracing::debug!(
            grid_size = topology.size(),
            obstacles = topology.obstacles().len(),
            goals = goals.len(),
            %start,
            "grid world created"
        );
        Ok(Self {
            topology,
            goals,
            start,
            start_state,
            intended_action_probability,
            rewards,
        })
    }

    /// Grid geometry
    #[must_use]
    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    /// Goal cells
    #[must_use]
    pub fn goals(&self) -> &GoalLayout {
        &self.goals
    }

    /// Start cell
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Start cell with nothing collected
    #[must_use]
    pub fn start_state(&self) -> GridState {
        self.start_state
    }

    /// Probability that the intended action executes
    #[must_use]
    pub fn intended_action_probability(&self) -> f64 {
        self.intended_action_probability
    }

    /// Reward magnitudes
    #[must_use]
    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Static scenery for the renderer
    #[must_use]
    pub fn scene(&self) -> SceneLayout {
        let goals = self
            .goals
            .positions()
            .enumerate()
            .map(|(index, position)| GoalSite { position, index })
            .collect();
        let mut obstacles: Vec<Position> = self.topology.obstacles().iter().copied().collect();
        obstacles.sort();
        SceneLayout {
            grid_size: self.topology.size(),
            goals,
            obstacles,
        }
    }
}

impl GridMdp for GridWorld {
    fn grid_size(&self) -> i32 {
        self.topology.size()
    }

    fn goal_count(&self) -> usize {
        self.goals.len()
    }

    fn resolve(&self, state: &GridState, executed: Action) -> StepOutcome {
        if state.is_terminal() {
            return StepOutcome {
                next_state: *state,
                reward: self.rewards.reward_for(StepEvent::Absorbed),
                executed,
                event: StepEvent::Absorbed,
            };
        }

        let target = self.topology.step(state.position, executed);
        let position = target.unwrap_or(state.position);

        let mut goals = state.goals;
        let collected = self
            .goals
            .index_of(position)
            .filter(|&index| !goals.is_collected(index));
        if let Some(index) = collected {
            goals = goals.with_collected(index);
        }
        let next_state = GridState::new(position, goals);

        let event = match (collected, target) {
            (Some(_), _) if next_state.is_terminal() => StepEvent::Completed,
            (Some(_), _) => StepEvent::Collected,
            (None, None) => StepEvent::Stuck,
            (None, Some(_)) => StepEvent::Moved,
        };
        tracing::trace!(from = %state, to = %next_state, action = %executed, ?event, "transition");

        StepOutcome {
            next_state,
            reward: self.rewards.reward_for(event),
            executed,
            event,
        }
    }

    fn execute_action<R: Rng + ?Sized>(&self, intended: Action, rng: &mut R) -> Action {
        if rng.gen::<f64>() < self.intended_action_probability {
            intended
        } else {
            intended.perpendicular()[rng.gen_range(0..2)]
        }
    }

    fn states(&self) -> Box<dyn Iterator<Item = GridState> + '_> {
        Box::new(StateSpace::new(&self.topology, self.start_state.goals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridworld_rl_core::{Dynamics, Reward};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scenario(p: f64) -> GridWorld {
        GridWorld::new(&GridWorldConfig {
            grid_size: 4,
            obstacles: vec![Position::new(1, 3), Position::new(2, 1), Position::new(3, 2)],
            goals: vec![Position::new(2, 2)],
            start: Position::new(1, 1),
            intended_action_probability: p,
            rewards: RewardConfig::harsh_stuck(),
        })
        .unwrap()
    }

    #[test]
    fn test_up_then_right_collects_goal_with_terminal_bonus() {
        let env = scenario(0.8);
        let s0 = env.start_state();

        let first = env.transition_deterministic(&s0, Action::Up);
        assert_eq!(first.next_state.position, Position::new(1, 2));
        assert_eq!(first.reward, Reward(-1.0));
        assert_eq!(first.event, StepEvent::Moved);

        let second = env.transition_deterministic(&first.next_state, Action::Right);
        assert_eq!(second.next_state.position, Position::new(2, 2));
        assert_eq!(second.event, StepEvent::Completed);
        assert_eq!(second.reward, Reward(500.0));
        assert_eq!(second.next_state.goals.collected_count(), 1);
        assert!(env.is_terminal(&second.next_state));
    }

    #[test]
    fn test_stuck_move_keeps_position_and_pays_stuck_penalty() {
        let env = scenario(1.0);
        let s0 = env.start_state();
        for action in [Action::Down, Action::Left, Action::Right] {
            let outcome = env.transition_deterministic(&s0, action);
            assert_eq!(outcome.next_state, s0);
            assert_eq!(outcome.event, StepEvent::Stuck);
            assert_eq!(outcome.reward, Reward(-10.0));
        }
    }

    #[test]
    fn test_terminal_state_absorbs() {
        let env = scenario(0.5);
        let done = GridState::new(Position::new(2, 2), env.start_state().goals.with_collected(0));
        let mut rng = StdRng::seed_from_u64(3);
        for action in Action::ALL {
            for dynamics in [Dynamics::Stochastic, Dynamics::Deterministic] {
                let outcome = env.transition(&done, action, dynamics, &mut rng);
                assert_eq!(outcome.into_pair(), (done, Reward(0.0)));
            }
        }
    }

    #[test]
    fn test_collection_outranks_stuck() {
        // An enumerated state standing on its own uncollected goal
        let env = scenario(1.0);
        let on_goal = GridState::initial(Position::new(2, 2), 1).unwrap();
        let outcome = env.transition_deterministic(&on_goal, Action::Right);
        assert_eq!(outcome.event, StepEvent::Completed);
        assert_eq!(outcome.reward, Reward(500.0));
    }

    #[test]
    fn test_collected_reward_when_goals_remain() {
        let env = GridWorld::new(&GridWorldConfig {
            grid_size: 3,
            obstacles: vec![],
            goals: vec![Position::new(2, 1), Position::new(3, 3)],
            start: Position::new(1, 1),
            intended_action_probability: 1.0,
            rewards: RewardConfig::mild(),
        })
        .unwrap();
        let outcome = env.transition_deterministic(&env.start_state(), Action::Right);
        assert_eq!(outcome.event, StepEvent::Collected);
        assert_eq!(outcome.reward, Reward(10.0));
        assert!(!outcome.next_state.is_terminal());

        // Stepping back onto a collected goal is an ordinary move
        let away = env.transition_deterministic(&outcome.next_state, Action::Up);
        let back = env.transition_deterministic(&away.next_state, Action::Down);
        assert_eq!(back.event, StepEvent::Moved);
        assert_eq!(back.next_state.goals, outcome.next_state.goals);
    }

    #[test]
    fn test_slip_is_never_the_reverse() {
        let env = scenario(0.01);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let executed = env.execute_action(Action::Up, &mut rng);
            assert_ne!(executed, Action::Down);
        }
    }

    #[test]
    fn test_slip_frequencies_follow_intended_probability() {
        const DRAWS: usize = 100_000;
        let env = scenario(0.8);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0_usize; 4];
        for _ in 0..DRAWS {
            counts[env.execute_action(Action::Up, &mut rng).index()] += 1;
        }
        let share = |action: Action| counts[action.index()] as f64 / DRAWS as f64;

        approx::assert_abs_diff_eq!(share(Action::Up), 0.8, epsilon = 0.01);
        approx::assert_abs_diff_eq!(share(Action::Left), 0.1, epsilon = 0.01);
        approx::assert_abs_diff_eq!(share(Action::Right), 0.1, epsilon = 0.01);
        assert_eq!(counts[Action::Down.index()], 0);
    }

    #[test]
    fn test_full_intended_probability_never_slips() {
        let env = scenario(1.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for action in Action::ALL {
                assert_eq!(env.execute_action(action, &mut rng), action);
                let outcome = env.transition(&env.start_state(), action, Dynamics::Stochastic, &mut rng);
                assert_eq!(outcome.executed, action);
            }
        }
    }

    #[test]
    fn test_config_rejects_goal_on_obstacle() {
        let config = GridWorldConfig {
            grid_size: 4,
            obstacles: vec![Position::new(2, 2)],
            goals: vec![Position::new(2, 2)],
            start: Position::new(1, 1),
            intended_action_probability: 1.0,
            rewards: RewardConfig::harsh_stuck(),
        };
        assert!(matches!(GridWorld::new(&config), Err(RLError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "grid_size": 4,
            "obstacles": [{"x": 1, "y": 3}, {"x": 2, "y": 1}, {"x": 3, "y": 2}],
            "goals": [{"x": 2, "y": 2}],
            "start": {"x": 1, "y": 1},
            "rewards": {"step_cost": -1.0, "stuck_penalty": -10.0,
                        "collection_reward": 100.0, "terminal_bonus": 500.0}
        }"#;
        let config = GridWorldConfig::from_json_str(json).unwrap();
        approx::assert_relative_eq!(config.intended_action_probability, 0.8);
        let env = GridWorld::new(&config).unwrap();
        assert_eq!(env.goal_count(), 1);
        assert_eq!(env.states().count(), 13 * 2);
    }

    #[test]
    fn test_scene_lists_goals_in_index_order() {
        let env = scenario(1.0);
        let scene = env.scene();
        assert_eq!(scene.grid_size, 4);
        assert_eq!(scene.goals, vec![GoalSite { position: Position::new(2, 2), index: 0 }]);
        assert_eq!(scene.obstacles.len(), 3);
        assert!(scene.to_json().unwrap().contains("\"grid_size\": 4"));
    }
}
