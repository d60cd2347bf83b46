//! Agent traits and hyperparameter configuration

use serde::{Deserialize, Serialize};

use crate::{Action, GridState, Position, RLError, Transition};

/// Hyperparameters shared by the solvers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Step size α of the TD updates
    pub learning_rate: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Value iteration stops once a sweep changes no value by this much
    pub convergence_theta: f64,
    /// Optional cap on value-iteration sweeps
    #[serde(default)]
    pub max_sweeps: Option<usize>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            gamma: 0.9,
            convergence_theta: 1e-6,
            max_sweeps: None,
        }
    }
}

impl AgentConfig {
    /// Check every hyperparameter against its recognized range
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(RLError::InvalidConfig(format!(
                "discount gamma must lie in (0, 1), got {}",
                self.gamma
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(RLError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.convergence_theta > 0.0 && self.convergence_theta.is_finite()) {
            return Err(RLError::InvalidConfig(format!(
                "convergence theta must be positive, got {}",
                self.convergence_theta
            )));
        }
        Ok(())
    }
}

/// Check that an exploration rate lies in [0, 1]
pub fn validate_epsilon(epsilon: f64) -> crate::Result<f64> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(epsilon)
    } else {
        Err(RLError::InvalidConfig(format!(
            "exploration epsilon must lie in [0, 1], got {epsilon}"
        )))
    }
}

/// A policy that can be rolled out greedily
pub trait GreedyPolicy {
    /// Best action in `state`, `None` for terminal states.
    ///
    /// `previous_position` is the cell occupied one step earlier, if any.
    fn greedy_action(
        &self,
        state: &GridState,
        previous_position: Option<Position>,
    ) -> crate::Result<Option<Action>>;
}

/// An agent that learns online from transitions
pub trait Learner: GreedyPolicy {
    /// ε-greedy action choice
    fn choose_action(
        &mut self,
        state: &GridState,
        previous_position: Option<Position>,
        epsilon: f64,
    ) -> Action;

    /// Apply one TD update; returns the TD error
    fn learn(&mut self, transition: &Transition) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_gamma_bounds() {
        for gamma in [0.0, 1.0, -0.5, f64::NAN] {
            let config = AgentConfig {
                gamma,
                ..AgentConfig::default()
            };
            assert!(config.validate().is_err(), "gamma {gamma} accepted");
        }
    }

    #[test]
    fn test_epsilon_bounds() {
        assert!(validate_epsilon(0.0).is_ok());
        assert!(validate_epsilon(1.0).is_ok());
        assert!(validate_epsilon(1.5).is_err());
    }

    #[test]
    fn test_config_from_json_defaults_max_sweeps() {
        let json = r#"{"learning_rate":0.5,"gamma":0.95,"convergence_theta":0.001}"#;
        let config: AgentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_sweeps, None);
        assert!(config.validate().is_ok());
    }
}
