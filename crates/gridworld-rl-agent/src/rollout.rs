//! Greedy rollouts of a trained policy

use gridworld_rl_core::{GreedyPolicy, GridMdp, GridState, PathTrace, Result};

/// Follow `policy` greedily from `start` under deterministic dynamics.
///
/// Stops at a terminal state or after `max_steps` moves, whichever comes first.
pub fn simulate_path<E, P>(env: &E, policy: &P, start: GridState, max_steps: usize) -> Result<PathTrace>
where
    E: GridMdp + ?Sized,
    P: GreedyPolicy + ?Sized,
{
    let mut trace = PathTrace::new(start);
    let mut state = start;
    let mut previous = None;

    for _ in 0..max_steps {
        if env.is_terminal(&state) {
            break;
        }
        let Some(action) = policy.greedy_action(&state, previous)? else {
            break;
        };
        let outcome = env.transition_deterministic(&state, action);
        tracing::trace!(%state, %action, next = %outcome.next_state, "rollout step");
        trace.push(action, outcome.next_state, outcome.reward);
        previous = Some(state.position);
        state = outcome.next_state;
    }

    if env.is_terminal(&state) {
        tracing::info!(
            steps = trace.len(),
            total_reward = trace.total_reward().value(),
            "rollout reached the goal"
        );
    } else {
        tracing::warn!(
            steps = trace.len(),
            max_steps,
            final_state = %state,
            "rollout stopped before collecting every goal"
        );
    }
    Ok(trace)
}
