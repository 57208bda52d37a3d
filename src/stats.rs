//! Statistics collection for MCTS searches
//!
//! This module provides structures for collecting and reporting statistics
//! about MCTS search processes and the decisions they produce.

use std::time::Duration;

use crate::utils;

/// Statistics collected during an MCTS search
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of iterations performed
    pub iterations: usize,

    /// Total time spent searching
    pub total_time: Duration,

    /// Total number of nodes in the tree (summed over workers)
    pub tree_size: usize,

    /// Maximum depth reached in the tree
    pub max_depth: usize,

    /// Whether the search was stopped early due to time constraints
    pub stopped_early: bool,

    /// Total number of moves played during rollouts
    pub rollout_steps: usize,

    /// Number of workers that took part in the search
    pub workers: usize,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            total_time: Duration::from_secs(0),
            tree_size: 1, // Start with root node
            max_depth: 0,
            stopped_early: false,
            rollout_steps: 0,
            workers: 1,
        }
    }

    /// Combines the statistics of parallel workers
    pub fn merge(parts: &[SearchStatistics], total_time: Duration) -> Self {
        SearchStatistics {
            iterations: parts.iter().map(|s| s.iterations).sum(),
            total_time,
            tree_size: parts.iter().map(|s| s.tree_size).sum(),
            max_depth: parts.iter().map(|s| s.max_depth).max().unwrap_or(0),
            stopped_early: parts.iter().any(|s| s.stopped_early),
            rollout_steps: parts.iter().map(|s| s.rollout_steps).sum(),
            workers: parts.len().max(1),
        }
    }

    /// Returns the average time per iteration in microseconds
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.iterations as f64
    }

    /// Returns the number of iterations per second
    pub fn iterations_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / self.total_time.as_secs_f64()
    }

    /// Returns the average number of moves per rollout
    pub fn avg_rollout_length(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.rollout_steps as f64 / self.iterations as f64
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        format!(
            "MCTS Search Statistics:\n\
             - Iterations: {}\n\
             - Workers: {}\n\
             - Total time: {:.3} seconds\n\
             - Tree size: {} nodes\n\
             - Max depth: {}\n\
             - Avg rollout length: {:.1}\n\
             - Avg time per iteration: {:.3} µs\n\
             - Iterations per second: {:.1}\n\
             - Stopped early: {}",
            self.iterations,
            self.workers,
            self.total_time.as_secs_f64(),
            self.tree_size,
            self.max_depth,
            self.avg_rollout_length(),
            self.avg_time_per_iteration_us(),
            self.iterations_per_second(),
            self.stopped_early
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics of one root child, used for the final decision
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    /// Action leading to the child
    pub action: A,
    /// Visits of the child
    pub visits: u64,
    /// Reward accumulated at the child, from the perspective of the player choosing it
    pub total_reward: f64,
    /// Whether the child's state ends the game
    pub terminal: bool,
}

impl<A> ChildStats<A> {
    /// Average reward of the child
    pub fn average_reward(&self) -> f64 {
        utils::exploitation_term(self.total_reward, self.visits)
    }

    /// A terminal child that paid off for the player choosing it
    pub fn is_winning(&self) -> bool {
        self.terminal && self.visits > 0 && self.average_reward() > 0.0
    }
}

/// The action chosen by a search, with the statistics backing it
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<A> {
    /// The chosen root action
    pub action: A,
    /// Visits of the chosen child
    pub visits: u64,
    /// Average reward of the chosen child
    pub average_reward: f64,
}

impl<A: Clone> From<&ChildStats<A>> for Decision<A> {
    fn from(stats: &ChildStats<A>) -> Self {
        Decision {
            action: stats.action.clone(),
            visits: stats.visits,
            average_reward: stats.average_reward(),
        }
    }
}
