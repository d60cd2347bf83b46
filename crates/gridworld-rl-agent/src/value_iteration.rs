//! Value iteration over the full state space

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use gridworld_rl_core::{
    Action, ActionValues, AgentConfig, GreedyPolicy, GridMdp, GridState, PathTrace, Position,
    RLError, Result, StateIndexer,
};

use crate::rollout;

/// Lifecycle of a [`ValueIterationAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverPhase {
    /// Values are zero, nothing has run
    Initialized,
    /// Sweeps in progress
    Iterating,
    /// A sweep changed no value by `theta` or more
    Converged,
    /// The sweep cap was hit before convergence
    SweepLimit,
    /// A greedy action is stored for every non-terminal state
    PolicyDerived,
}

/// Outcome of the sweep loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Sweeps performed
    pub sweeps: usize,
    /// Largest value change in the last sweep
    pub final_delta: f64,
    /// Whether `final_delta < theta`
    pub converged: bool,
    /// Wall-clock time of the sweep loop
    pub elapsed: Duration,
}

/// Dynamic-programming solver.
///
/// Plans against the deterministic transition even when the environment slips,
/// so the derived policy is optimal for the relaxed model.
#[derive(Debug)]
pub struct ValueIterationAgent<'a, E: GridMdp> {
    env: &'a E,
    gamma: f64,
    theta: f64,
    max_sweeps: Option<usize>,
    indexer: StateIndexer,
    values: Vec<f64>,
    policy: Vec<Option<Action>>,
    phase: SolverPhase,
    report: Option<SolveReport>,
}

impl<'a, E: GridMdp> ValueIterationAgent<'a, E> {
    /// Solver for `env` with every value at zero
    pub fn new(env: &'a E, config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let indexer = env.indexer();
        Ok(Self {
            env,
            gamma: config.gamma,
            theta: config.convergence_theta,
            max_sweeps: config.max_sweeps,
            values: vec![0.0; indexer.len()],
            policy: vec![None; indexer.len()],
            indexer,
            phase: SolverPhase::Initialized,
            report: None,
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// Sweep statistics, once the sweep loop has run
    pub fn report(&self) -> Option<SolveReport> {
        self.report
    }

    /// Run sweeps to convergence and derive the greedy policy
    pub fn solve(&mut self) -> Result<SolveReport> {
        let report = self.iterate();
        self.derive_policy()?;
        Ok(report)
    }

    /// In-place sweeps until no value moves by `theta` or the cap is hit
    pub fn iterate(&mut self) -> SolveReport {
        let started = Instant::now();
        let env = self.env;
        self.phase = SolverPhase::Iterating;
        tracing::info!(
            states = self.indexer.len(),
            gamma = self.gamma,
            theta = self.theta,
            "value iteration started"
        );

        let mut sweeps = 0;
        let (final_delta, converged) = loop {
            let mut delta: f64 = 0.0;
            for state in env.states().filter(|s| !env.is_terminal(s)) {
                let best = self.lookahead(&state).max_value();
                let slot = &mut self.values[self.indexer.index(&state)];
                delta = delta.max((best - *slot).abs());
                *slot = best;
            }
            sweeps += 1;
            tracing::debug!(sweep = sweeps, delta, "sweep finished");

            if delta < self.theta {
                break (delta, true);
            }
            if self.max_sweeps.is_some_and(|cap| sweeps >= cap) {
                break (delta, false);
            }
        };

        let report = SolveReport {
            sweeps,
            final_delta,
            converged,
            elapsed: started.elapsed(),
        };
        if converged {
            self.phase = SolverPhase::Converged;
            tracing::info!(
                sweeps,
                final_delta,
                elapsed_ms = report.elapsed.as_millis(),
                "value iteration converged"
            );
        } else {
            self.phase = SolverPhase::SweepLimit;
            tracing::warn!(sweeps, final_delta, "value iteration hit its sweep cap");
        }
        self.report = Some(report);
        report
    }

    /// Store the greedy action of every non-terminal state
    pub fn derive_policy(&mut self) -> Result<()> {
        if !matches!(
            self.phase,
            SolverPhase::Converged | SolverPhase::SweepLimit | SolverPhase::PolicyDerived
        ) {
            return Err(RLError::SolverPhase(format!(
                "cannot derive a policy while {:?}",
                self.phase
            )));
        }
        let env = self.env;
        let mut derived = 0_usize;
        for state in env.states().filter(|s| !env.is_terminal(s)) {
            let action = self.lookahead(&state).best_action();
            self.policy[self.indexer.index(&state)] = Some(action);
            derived += 1;
        }
        self.phase = SolverPhase::PolicyDerived;
        tracing::info!(states = derived, "policy derived");
        Ok(())
    }

    /// Current estimate of `V(state)`; zero for terminal states
    pub fn value(&self, state: &GridState) -> Result<f64> {
        Ok(self.values[self.indexer.checked_index(state)?])
    }

    /// One-step lookahead `r(s, a) + γ V(s')`
    pub fn q_value(&self, state: &GridState, action: Action) -> f64 {
        let outcome = self.env.transition_deterministic(state, action);
        outcome.reward.value() + self.gamma * self.values[self.indexer.index(&outcome.next_state)]
    }

    /// Lookahead for every action
    pub fn q_values(&self, state: &GridState) -> ActionValues {
        self.lookahead(state)
    }

    /// Largest `|V(s) − max_a q(s, a)|` over non-terminal states
    pub fn bellman_residual(&self) -> f64 {
        self.env
            .states()
            .filter(|s| !self.env.is_terminal(s))
            .map(|s| (self.values[self.indexer.index(&s)] - self.lookahead(&s).max_value()).abs())
            .fold(0.0, f64::max)
    }

    /// Stored action for `state`.
    ///
    /// `Ok(None)` for terminal states. A non-terminal state without a stored
    /// action is a [`RLError::MissingPolicyAction`].
    pub fn policy_action(&self, state: &GridState) -> Result<Option<Action>> {
        if self.phase != SolverPhase::PolicyDerived {
            return Err(RLError::SolverPhase(format!(
                "policy queried while {:?}",
                self.phase
            )));
        }
        if self.env.is_terminal(state) {
            return Ok(None);
        }
        let index = self.indexer.checked_index(state)?;
        match self.policy[index] {
            Some(action) => Ok(Some(action)),
            None => Err(RLError::MissingPolicyAction(state.to_string())),
        }
    }

    /// Greedy deterministic rollout of the derived policy
    pub fn simulate_path(&self, start: GridState, max_steps: usize) -> Result<PathTrace> {
        rollout::simulate_path(self.env, self, start, max_steps)
    }

    fn lookahead(&self, state: &GridState) -> ActionValues {
        ActionValues::from_fn(|action| self.q_value(state, action))
    }
}

impl<E: GridMdp> GreedyPolicy for ValueIterationAgent<'_, E> {
    fn greedy_action(&self, state: &GridState, _previous: Option<Position>) -> Result<Option<Action>> {
        self.policy_action(state)
    }
}
