//! Reward signals and the grid-world reward policy

use serde::{Deserialize, Serialize};

/// Reward signal from the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reward(pub f64);

impl Reward {
    /// No reward
    pub const ZERO: Reward = Reward(0.0);

    /// Create a new reward
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

impl std::ops::Add for Reward {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl std::ops::AddAssign for Reward {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::ops::Mul<f64> for Reward {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

impl std::iter::Sum for Reward {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Reward::ZERO, |acc, r| acc + r)
    }
}

/// What happened on a single transition; decides which reward applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    /// The input state was already terminal
    Absorbed,
    /// Moved into a free cell without collecting anything
    Moved,
    /// Blocked by the grid edge or an obstacle
    Stuck,
    /// Collected a goal, others remain
    Collected,
    /// Collected the last remaining goal
    Completed,
}

/// Reward magnitudes for the four kinds of step.
///
/// Exactly one applies per step, by priority:
/// terminal bonus, collection reward, stuck penalty, step cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Charged on an ordinary move (negative)
    pub step_cost: f64,
    /// Charged when the move is blocked (negative, usually harsher than `step_cost`)
    pub stuck_penalty: f64,
    /// Paid when a goal is newly collected (positive)
    pub collection_reward: f64,
    /// Paid instead of `collection_reward` when the last goal is collected
    pub terminal_bonus: f64,
}

impl RewardConfig {
    /// Create a reward configuration
    #[must_use]
    pub fn new(step_cost: f64, stuck_penalty: f64, collection_reward: f64, terminal_bonus: f64) -> Self {
        Self {
            step_cost,
            stuck_penalty,
            collection_reward,
            terminal_bonus,
        }
    }

    /// Small step cost, harsh wall penalty, large collection rewards
    #[must_use]
    pub fn harsh_stuck() -> Self {
        Self::new(-1.0, -10.0, 100.0, 500.0)
    }

    /// Moderate penalties and small collection rewards
    #[must_use]
    pub fn mild() -> Self {
        Self::new(-1.0, -5.0, 10.0, 100.0)
    }

    /// Reward paid for a step with the given outcome
    #[must_use]
    pub fn reward_for(&self, event: StepEvent) -> Reward {
        Reward(match event {
            StepEvent::Absorbed => 0.0,
            StepEvent::Moved => self.step_cost,
            StepEvent::Stuck => self.stuck_penalty,
            StepEvent::Collected => self.collection_reward,
            StepEvent::Completed => self.terminal_bonus,
        })
    }

    /// Check signs and finiteness of every magnitude
    pub fn validate(&self) -> crate::Result<()> {
        let checks = [
            ("step_cost", self.step_cost, self.step_cost < 0.0),
            ("stuck_penalty", self.stuck_penalty, self.stuck_penalty < 0.0),
            ("collection_reward", self.collection_reward, self.collection_reward > 0.0),
            ("terminal_bonus", self.terminal_bonus, self.terminal_bonus > 0.0),
        ];
        for (name, value, sign_ok) in checks {
            if !value.is_finite() || !sign_ok {
                return Err(crate::RLError::InvalidConfig(format!(
                    "{name} has the wrong sign or is not finite: {value}"
                )));
            }
        }
        if self.stuck_penalty > self.step_cost {
            tracing::warn!(
                step_cost = self.step_cost,
                stuck_penalty = self.stuck_penalty,
                "stuck penalty is milder than the step cost; wall-bumping will be cheap"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_for_each_event() {
        let rewards = RewardConfig::new(-1.0, -10.0, 100.0, 500.0);
        assert_eq!(rewards.reward_for(StepEvent::Absorbed), Reward(0.0));
        assert_eq!(rewards.reward_for(StepEvent::Moved), Reward(-1.0));
        assert_eq!(rewards.reward_for(StepEvent::Stuck), Reward(-10.0));
        assert_eq!(rewards.reward_for(StepEvent::Collected), Reward(100.0));
        assert_eq!(rewards.reward_for(StepEvent::Completed), Reward(500.0));
    }

    #[test]
    fn test_validate_rejects_positive_step_cost() {
        let rewards = RewardConfig::new(1.0, -10.0, 100.0, 500.0);
        assert!(rewards.validate().is_err());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(RewardConfig::harsh_stuck().validate().is_ok());
        assert!(RewardConfig::mild().validate().is_ok());
    }

    #[test]
    fn test_reward_sum() {
        let total: Reward = [Reward(-1.0), Reward(-1.0), Reward(500.0)].into_iter().sum();
        assert_eq!(total, Reward(498.0));
    }
}
