//! Selection policies for the MCTS algorithm
//!
//! Selection policies are multi-armed bandits: they score a child from its
//! statistics and its parent's visit count, and the tree descends into the
//! child with the best score. Any policy must give unvisited children an
//! infinite score so every child is tried before any is revisited.

use std::f64;

use crate::{tree::NodeStats, utils};

/// Trait for bandit strategies that score children during selection
pub trait SelectionPolicy: Send + Sync {
    /// Scores a child; higher scores are selected first
    fn score(&self, child: &NodeStats, parent_visits: u64) -> f64;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// This is the classic selection policy for MCTS (UCT), which balances
/// exploration and exploitation using the UCB1 formula:
///
/// ```text
/// UCB1 = average_reward + exploration_constant * sqrt(ln(parent_visits) / child_visits)
/// ```
///
/// Higher exploration constants favor exploration (trying less-visited nodes),
/// while lower values favor exploitation (choosing nodes with higher values).
/// The default constant is sqrt(2).
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value for a child
    pub fn ucb1_value(&self, total_reward: f64, child_visits: u64, parent_visits: u64) -> f64 {
        utils::ucb1_value(
            total_reward,
            child_visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(f64::consts::SQRT_2)
    }
}

impl SelectionPolicy for UCB1Policy {
    fn score(&self, child: &NodeStats, parent_visits: u64) -> f64 {
        self.ucb1_value(child.total_reward, child.visits, parent_visits)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

/// Upper Confidence Bound 1 Tuned (UCB1-Tuned) selection policy
///
/// An improved version of UCB1 that takes into account the variance
/// of the rewards:
///
/// ```text
/// V = variance + sqrt(2 * ln(parent_visits) / child_visits)
/// UCB1-Tuned = average_reward + c * sqrt(ln(parent_visits) / child_visits * min(1/4, V))
/// ```
///
/// The 1/4 cap is the largest variance of a reward bounded in [0, 1].
#[derive(Debug, Clone)]
pub struct UCB1TunedPolicy {
    /// Exploration constant
    pub exploration_constant: f64,
}

impl UCB1TunedPolicy {
    /// Creates a new UCB1-Tuned policy
    pub fn new(exploration_constant: f64) -> Self {
        UCB1TunedPolicy {
            exploration_constant,
        }
    }
}

impl Default for UCB1TunedPolicy {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SelectionPolicy for UCB1TunedPolicy {
    fn score(&self, child: &NodeStats, parent_visits: u64) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }

        let log_parent = (parent_visits.max(1) as f64).ln();
        let n = child.visits as f64;
        let variance_bound = child.variance() + (2.0 * log_parent / n).sqrt();
        let exploration =
            self.exploration_constant * (log_parent / n * variance_bound.min(0.25)).sqrt();

        child.average_reward() + exploration
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl SelectionPolicy for Box<dyn SelectionPolicy> {
    fn score(&self, child: &NodeStats, parent_visits: u64) -> f64 {
        (**self).score(child, parent_visits)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        (**self).clone_box()
    }
}
