//! Q-learning with a linear function approximation

use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;

use gridworld_rl_core::{
    Action, ActionValues, AgentConfig, GreedyPolicy, GridMdp, GridState, Learner, PathTrace,
    Position, RLError, Result, Transition, NUM_ACTIONS,
};

use crate::exploration::{epsilon_greedy, seeded_rng};
use crate::features::{FeatureExtractor, FEATURE_COUNT};
use crate::rollout;

/// Approximates `Q(s, a) = w[a] · f(s, a, prev)` with one weight row per action
#[derive(Debug)]
pub struct ApproxQAgent {
    extractor: FeatureExtractor,
    weights: Array2<f64>,
    learning_rate: f64,
    gamma: f64,
    rng: StdRng,
}

impl ApproxQAgent {
    /// Agent with all weights at zero
    pub fn new(extractor: FeatureExtractor, config: &AgentConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor,
            weights: Array2::zeros((NUM_ACTIONS, FEATURE_COUNT)),
            learning_rate: config.learning_rate,
            gamma: config.gamma,
            rng: seeded_rng(seed),
        })
    }

    /// Agent resuming from previously learned weights
    pub fn with_weights(
        extractor: FeatureExtractor,
        weights: Array2<f64>,
        config: &AgentConfig,
        seed: Option<u64>,
    ) -> Result<Self> {
        let expected = NUM_ACTIONS * FEATURE_COUNT;
        if weights.dim() != (NUM_ACTIONS, FEATURE_COUNT) {
            return Err(RLError::DimensionMismatch {
                expected,
                actual: weights.len(),
            });
        }
        let mut agent = Self::new(extractor, config, seed)?;
        agent.weights = weights;
        Ok(agent)
    }

    /// Weight matrix, one row per action in [`Action::ALL`] order
    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// The feature pipeline
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Estimated `Q(state, action)`
    pub fn predict(&self, state: &GridState, action: Action, previous: Option<Position>) -> f64 {
        let features = self.extractor.features(state, action, previous);
        self.weights.row(action.index()).dot(&features)
    }

    /// Estimates for every action
    pub fn q_values(&self, state: &GridState, previous: Option<Position>) -> ActionValues {
        ActionValues::from_fn(|action| self.predict(state, action, previous))
    }

    /// ε-greedy action for `state`
    pub fn choose_action(&mut self, state: &GridState, previous: Option<Position>, epsilon: f64) -> Action {
        let values = self.q_values(state, previous);
        epsilon_greedy(&values, epsilon, &mut self.rng)
    }

    /// Semi-gradient TD(0) update; returns the TD error.
    ///
    /// The lookahead at `next_state` treats the current position as the previous one.
    pub fn update(
        &mut self,
        state: &GridState,
        action: Action,
        reward: f64,
        next_state: &GridState,
        previous: Option<Position>,
    ) -> f64 {
        let target = if next_state.is_terminal() {
            reward
        } else {
            reward + self.gamma * self.q_values(next_state, Some(state.position)).max_value()
        };
        let features = self.extractor.features(state, action, previous);
        let td_error = target - self.weights.row(action.index()).dot(&features);
        self.weights
            .row_mut(action.index())
            .scaled_add(self.learning_rate * td_error, &features);
        tracing::trace!(%state, %action, reward, td_error, "weight update");
        td_error
    }

    /// Greedy deterministic rollout, tracking the previous position for the features
    pub fn simulate_path<E: GridMdp + ?Sized>(
        &self,
        env: &E,
        start: GridState,
        max_steps: usize,
    ) -> Result<PathTrace> {
        rollout::simulate_path(env, self, start, max_steps)
    }
}

impl GreedyPolicy for ApproxQAgent {
    fn greedy_action(&self, state: &GridState, previous: Option<Position>) -> Result<Option<Action>> {
        if state.is_terminal() {
            return Ok(None);
        }
        Ok(Some(self.q_values(state, previous).best_action()))
    }
}

impl Learner for ApproxQAgent {
    fn choose_action(&mut self, state: &GridState, previous: Option<Position>, epsilon: f64) -> Action {
        ApproxQAgent::choose_action(self, state, previous, epsilon)
    }

    fn learn(&mut self, transition: &Transition) -> f64 {
        self.update(
            &transition.state,
            transition.action,
            transition.reward.value(),
            &transition.next_state,
            transition.previous_position,
        )
    }
}
