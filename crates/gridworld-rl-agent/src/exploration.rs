//! ε-greedy action selection and seeded random sources

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gridworld_rl_core::{Action, ActionValues};

/// Random generator seeded from `seed`, or from entropy when `None`
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// With probability `epsilon` a uniformly random action, otherwise the greedy one.
///
/// Greedy ties go to the earliest action in [`Action::ALL`].
pub fn epsilon_greedy<R: Rng + ?Sized>(values: &ActionValues, epsilon: f64, rng: &mut R) -> Action {
    if rng.gen::<f64>() < epsilon {
        Action::sample(rng)
    } else {
        values.best_action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_epsilon_is_greedy() {
        let mut rng = seeded_rng(Some(3));
        let values = ActionValues([0.0, 2.0, 2.0, -1.0]);
        for _ in 0..100 {
            assert_eq!(epsilon_greedy(&values, 0.0, &mut rng), Action::Down);
        }
    }

    #[test]
    fn test_full_epsilon_explores_every_action() {
        let mut rng = seeded_rng(Some(5));
        let values = ActionValues([1.0, 0.0, 0.0, 0.0]);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[epsilon_greedy(&values, 1.0, &mut rng).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
