//! Exploration-rate schedules evaluated once per episode

use serde::{Deserialize, Serialize};

use gridworld_rl_core::{validate_epsilon, Result};

/// Maps an episode index to an exploration rate
pub trait Schedule: Send + Sync {
    /// Value for episode `t`
    fn value(&self, t: usize) -> f64;
}

/// Linear interpolation from `start` to `end` over `episodes`, then flat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSchedule {
    /// Value at episode 0
    pub start: f64,
    /// Value from episode `episodes` on
    pub end: f64,
    /// Length of the ramp
    pub episodes: usize,
}

impl LinearSchedule {
    /// Create a new linear schedule
    #[must_use]
    pub fn new(start: f64, end: f64, episodes: usize) -> Self {
        Self {
            start,
            end,
            episodes,
        }
    }
}

impl Schedule for LinearSchedule {
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, t: usize) -> f64 {
        if t >= self.episodes {
            self.end
        } else {
            let progress = t as f64 / self.episodes as f64;
            self.start + (self.end - self.start) * progress
        }
    }
}

/// `start · decay_rate^t`, floored at `min_value`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialSchedule {
    /// Value at episode 0
    pub start: f64,
    /// Floor
    pub min_value: f64,
    /// Per-episode multiplier
    pub decay_rate: f64,
}

impl ExponentialSchedule {
    /// Create a new exponential schedule
    #[must_use]
    pub fn new(start: f64, min_value: f64, decay_rate: f64) -> Self {
        Self {
            start,
            min_value,
            decay_rate,
        }
    }
}

impl Schedule for ExponentialSchedule {
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, t: usize) -> f64 {
        (self.start * self.decay_rate.powf(t as f64)).max(self.min_value)
    }
}

/// The same value every episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantSchedule {
    /// Constant value
    pub value: f64,
}

impl Schedule for ConstantSchedule {
    fn value(&self, _t: usize) -> f64 {
        self.value
    }
}

/// Serializable choice of exploration schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleConfig {
    /// See [`LinearSchedule`]
    Linear {
        /// Value at episode 0
        start: f64,
        /// Final value
        end: f64,
        /// Length of the ramp
        episodes: usize,
    },
    /// See [`ExponentialSchedule`]
    Exponential {
        /// Value at episode 0
        start: f64,
        /// Floor
        min_value: f64,
        /// Per-episode multiplier
        decay_rate: f64,
    },
    /// See [`ConstantSchedule`]
    Constant {
        /// Constant value
        value: f64,
    },
}

impl ScheduleConfig {
    /// Check that every value the schedule can produce is a valid ε
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Linear { start, end, .. } => {
                validate_epsilon(start)?;
                validate_epsilon(end)?;
            }
            Self::Exponential {
                start,
                min_value,
                decay_rate,
            } => {
                validate_epsilon(start)?;
                validate_epsilon(min_value)?;
                validate_epsilon(decay_rate)?;
            }
            Self::Constant { value } => {
                validate_epsilon(value)?;
            }
        }
        Ok(())
    }

    /// Instantiate the schedule
    #[must_use]
    pub fn build(&self) -> Box<dyn Schedule> {
        match *self {
            Self::Linear {
                start,
                end,
                episodes,
            } => Box::new(LinearSchedule::new(start, end, episodes)),
            Self::Exponential {
                start,
                min_value,
                decay_rate,
            } => Box::new(ExponentialSchedule::new(start, min_value, decay_rate)),
            Self::Constant { value } => Box::new(ConstantSchedule { value }),
        }
    }
}
