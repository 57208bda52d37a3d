//! Configuration options for the MCTS algorithm
//!
//! This module defines the configuration parameters that control the
//! behavior of the MCTS algorithm.

use std::time::Duration;

use crate::{MCTSError, Result};

/// Criteria for selecting the best child after search is complete
///
/// This determines how the final action is selected after the search budget is exhausted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BestChildCriteria {
    /// Select the child with the most visits
    ///
    /// This is generally more robust under high-variance rewards, as it relies on
    /// statistical confidence rather than potentially noisy value estimates.
    MostVisits,

    /// Select the child with the highest average reward
    HighestValue,

    /// Sample a child from a softmax over average rewards
    ///
    /// Lower temperatures concentrate the distribution on the best children.
    Probabilistic {
        /// Softmax temperature, must be positive
        temperature: f64,
    },

    /// Play a terminal winning child when there is one
    ///
    /// A winning child is a terminal child with a positive average reward;
    /// among several, the highest average wins. Without one this falls back
    /// to [`BestChildCriteria::HighestValue`].
    HeuristicWin,
}

/// How to break ties between children with equal scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep the first child in expansion order
    First,
    /// Pick uniformly among the tied children using the search RNG
    Random,
}

/// Configuration for the MCTS algorithm
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use uct_mcts::{MCTSConfig, config::BestChildCriteria};
/// use std::time::Duration;
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_max_iterations(10_000)
///     .with_max_time(Duration::from_secs(5))
///     .with_best_child_criteria(BestChildCriteria::MostVisits)
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// Exploration constant for UCB1
    ///
    /// Controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited nodes.
    /// The standard value is sqrt(2).
    pub exploration_constant: f64,

    /// Maximum number of iterations to run
    ///
    /// With several workers this budget is split between them.
    pub max_iterations: usize,

    /// Maximum time to run the search
    ///
    /// Checked at the start of every iteration; a running rollout is never interrupted.
    pub max_time: Option<Duration>,

    /// Maximum depth of the search tree
    ///
    /// Nodes at this depth are never expanded; simulations start from them instead.
    pub max_depth: Option<usize>,

    /// Maximum number of moves in a single rollout
    pub max_rollout_steps: Option<usize>,

    /// Criteria for selecting the best child after search
    pub best_child_criteria: BestChildCriteria,

    /// Tie-breaking rule during selection and final action choice
    pub tie_break: TieBreak,

    /// Seed for the search RNG; `None` seeds from OS entropy
    pub seed: Option<u64>,

    /// Number of root-parallel workers
    pub workers: usize,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: std::f64::consts::SQRT_2,
            max_iterations: 10_000,
            max_time: None,
            max_depth: None,
            max_rollout_steps: None,
            best_child_criteria: BestChildCriteria::MostVisits,
            tie_break: TieBreak::First,
            seed: None,
            workers: 1,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the maximum number of iterations
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the maximum time to run the search
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Sets the maximum depth to search
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the maximum number of moves per rollout
    pub fn with_max_rollout_steps(mut self, steps: usize) -> Self {
        self.max_rollout_steps = Some(steps);
        self
    }

    /// Sets the criteria for selecting the best child
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Sets the tie-breaking rule
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Sets the RNG seed, making searches reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of root-parallel workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Checks that the configuration describes a runnable search
    ///
    /// A zero iteration or time budget is valid: the search then returns
    /// without running any iteration.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.workers == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "at least one worker is required".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(MCTSError::InvalidConfiguration(
                "max depth of 0 never expands the root".to_string(),
            ));
        }
        if let BestChildCriteria::Probabilistic { temperature } = self.best_child_criteria {
            if !temperature.is_finite() || temperature <= 0.0 {
                return Err(MCTSError::InvalidConfiguration(format!(
                    "softmax temperature must be positive, got {}",
                    temperature
                )));
            }
        }
        Ok(())
    }
}
