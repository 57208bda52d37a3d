//! Expansion policies determine which untried action to expand
//! when the selection phase stops at a node that is not fully expanded.

use rand::rngs::StdRng;
use rand::Rng;

use crate::{game_state::GameState, tree::Node};

/// Trait for policies that select which action to expand
pub trait ExpansionPolicy<S: GameState>: Send + Sync {
    /// Returns an index into `node.untried_actions`, or `None` if there is nothing to expand
    fn select_action_to_expand(&self, node: &Node<S>, rng: &mut StdRng) -> Option<usize>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn ExpansionPolicy<S>>;
}

/// Random expansion policy
///
/// Selects an untried action uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomExpansionPolicy;

impl RandomExpansionPolicy {
    /// Creates a new random expansion policy
    pub fn new() -> Self {
        RandomExpansionPolicy
    }
}

impl Default for RandomExpansionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> ExpansionPolicy<S> for RandomExpansionPolicy {
    fn select_action_to_expand(&self, node: &Node<S>, rng: &mut StdRng) -> Option<usize> {
        if node.untried_actions.is_empty() {
            return None;
        }
        Some(rng.gen_range(0..node.untried_actions.len()))
    }

    fn clone_box(&self) -> Box<dyn ExpansionPolicy<S>> {
        Box::new(self.clone())
    }
}

/// In-order expansion policy
///
/// Expands untried actions in the order the domain listed them.
#[derive(Debug, Clone)]
pub struct FirstUntriedPolicy;

impl FirstUntriedPolicy {
    /// Creates a new in-order expansion policy
    pub fn new() -> Self {
        FirstUntriedPolicy
    }
}

impl Default for FirstUntriedPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> ExpansionPolicy<S> for FirstUntriedPolicy {
    fn select_action_to_expand(&self, node: &Node<S>, _rng: &mut StdRng) -> Option<usize> {
        if node.untried_actions.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn clone_box(&self) -> Box<dyn ExpansionPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement ExpansionPolicy for Box<dyn ExpansionPolicy>
impl<S: GameState> ExpansionPolicy<S> for Box<dyn ExpansionPolicy<S>> {
    fn select_action_to_expand(&self, node: &Node<S>, rng: &mut StdRng) -> Option<usize> {
        (**self).select_action_to_expand(node, rng)
    }

    fn clone_box(&self) -> Box<dyn ExpansionPolicy<S>> {
        (**self).clone_box()
    }
}
