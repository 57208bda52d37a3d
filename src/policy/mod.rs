//! Policies for different phases of the MCTS algorithm
//!
//! This module contains implementations of various policies used in MCTS:
//! - Selection policies: How to choose which nodes to explore
//! - Expansion policies: Which untried action to expand
//! - Simulation policies: How to play out games from a node
//! - Backpropagation policies: Which reward each node on the path receives

pub mod backpropagation;
pub mod expansion;
pub mod selection;
pub mod simulation;

pub use backpropagation::{BackpropagationPolicy, DiscountedPolicy, StandardPolicy};
pub use expansion::{ExpansionPolicy, FirstUntriedPolicy, RandomExpansionPolicy};
pub use selection::{SelectionPolicy, UCB1Policy, UCB1TunedPolicy};
pub use simulation::{Playout, RandomPolicy, SimulationPolicy, UniformPolicy};

use crate::game_state::GameState;

/// The four phase policies used by one search
pub struct PolicySet<S: GameState> {
    /// Bandit used during selection
    pub selection: Box<dyn SelectionPolicy>,
    /// Picks the untried action to expand
    pub expansion: Box<dyn ExpansionPolicy<S>>,
    /// Plays rollouts
    pub simulation: Box<dyn SimulationPolicy<S>>,
    /// Chooses the reward credited during backpropagation
    pub backpropagation: Box<dyn BackpropagationPolicy<S>>,
}

impl<S: GameState> PolicySet<S> {
    /// UCB1 with the given exploration constant, random expansion,
    /// default-policy rollouts and standard backpropagation
    pub fn uct(exploration_constant: f64) -> Self {
        PolicySet {
            selection: Box::new(UCB1Policy::new(exploration_constant)),
            expansion: Box::new(RandomExpansionPolicy::new()),
            simulation: Box::new(RandomPolicy::new()),
            backpropagation: Box::new(StandardPolicy::new()),
        }
    }
}

impl<S: GameState> Clone for PolicySet<S> {
    fn clone(&self) -> Self {
        PolicySet {
            selection: self.selection.clone_box(),
            expansion: self.expansion.clone_box(),
            simulation: self.simulation.clone_box(),
            backpropagation: self.backpropagation.clone_box(),
        }
    }
}
