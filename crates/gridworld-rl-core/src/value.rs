//! Per-state action values

use serde::{Deserialize, Serialize};

use crate::action::{Action, NUM_ACTIONS};

/// Q-values of one state, indexed by [`Action::index`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionValues(pub [f64; NUM_ACTIONS]);

impl ActionValues {
    /// Build from a closure evaluated for every action in order
    pub fn from_fn<F: FnMut(Action) -> f64>(mut f: F) -> Self {
        let mut values = [0.0; NUM_ACTIONS];
        for action in Action::ALL {
            values[action.index()] = f(action);
        }
        Self(values)
    }

    /// Value of `action`
    #[must_use]
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    /// Greedy action and its value; ties go to the earliest action in [`Action::ALL`]
    #[must_use]
    pub fn best(&self) -> (Action, f64) {
        let mut best = (Action::ALL[0], self.0[0]);
        for action in &Action::ALL[1..] {
            let value = self.get(*action);
            if value > best.1 {
                best = (*action, value);
            }
        }
        best
    }

    /// Greedy action
    #[must_use]
    pub fn best_action(&self) -> Action {
        self.best().0
    }

    /// Largest value
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.best().1
    }
}
