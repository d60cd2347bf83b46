//! Tabular Q-learning

use ndarray::Array2;
use rand::rngs::StdRng;

use gridworld_rl_core::{
    Action, ActionValues, AgentConfig, GreedyPolicy, GridMdp, GridState, Learner, PathTrace,
    Position, Result, StateIndexer, Transition, NUM_ACTIONS,
};

use crate::exploration::{epsilon_greedy, seeded_rng};
use crate::rollout;

/// Q-learning over a dense `(state, action)` table.
///
/// Rows are addressed with [`StateIndexer`], so the table covers every
/// position × goal-mask combination of the grid.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    table: Array2<f64>,
    indexer: StateIndexer,
    learning_rate: f64,
    gamma: f64,
    rng: StdRng,
}

impl QLearningAgent {
    /// Agent with an all-zero table sized for `indexer`
    pub fn new(indexer: StateIndexer, config: &AgentConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: Array2::zeros((indexer.len(), NUM_ACTIONS)),
            indexer,
            learning_rate: config.learning_rate,
            gamma: config.gamma,
            rng: seeded_rng(seed),
        })
    }

    /// Agent sized for `env`
    pub fn for_env<E: GridMdp + ?Sized>(env: &E, config: &AgentConfig, seed: Option<u64>) -> Result<Self> {
        Self::new(env.indexer(), config, seed)
    }

    /// Q-values of `state`
    pub fn q_values(&self, state: &GridState) -> ActionValues {
        let row = self.table.row(self.indexer.index(state));
        ActionValues::from_fn(|action| row[action.index()])
    }

    /// Greedy action, `None` for terminal states
    pub fn greedy_action(&self, state: &GridState) -> Option<Action> {
        (!state.is_terminal()).then(|| self.q_values(state).best_action())
    }

    /// ε-greedy action for `state`
    pub fn choose_action(&mut self, state: &GridState, epsilon: f64) -> Action {
        let values = self.q_values(state);
        epsilon_greedy(&values, epsilon, &mut self.rng)
    }

    /// TD(0) update; returns the TD error
    pub fn update(&mut self, state: &GridState, action: Action, reward: f64, next_state: &GridState) -> f64 {
        let bootstrap = if next_state.is_terminal() {
            0.0
        } else {
            self.q_values(next_state).max_value()
        };
        let target = reward + self.gamma * bootstrap;
        let cell = &mut self.table[[self.indexer.index(state), action.index()]];
        let td_error = target - *cell;
        *cell += self.learning_rate * td_error;
        tracing::trace!(%state, %action, reward, td_error, "q-table update");
        td_error
    }

    /// Number of table rows
    pub fn state_count(&self) -> usize {
        self.table.nrows()
    }

    /// Greedy deterministic rollout of the learned table
    pub fn simulate_path<E: GridMdp + ?Sized>(
        &self,
        env: &E,
        start: GridState,
        max_steps: usize,
    ) -> Result<PathTrace> {
        rollout::simulate_path(env, self, start, max_steps)
    }
}

impl GreedyPolicy for QLearningAgent {
    fn greedy_action(&self, state: &GridState, _previous: Option<Position>) -> Result<Option<Action>> {
        self.indexer.checked_index(state)?;
        Ok(QLearningAgent::greedy_action(self, state))
    }
}

impl Learner for QLearningAgent {
    fn choose_action(&mut self, state: &GridState, _previous: Option<Position>, epsilon: f64) -> Action {
        QLearningAgent::choose_action(self, state, epsilon)
    }

    fn learn(&mut self, transition: &Transition) -> f64 {
        self.update(
            &transition.state,
            transition.action,
            transition.reward.value(),
            &transition.next_state,
        )
    }
}
