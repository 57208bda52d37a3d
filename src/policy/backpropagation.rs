//! Backpropagation policies for the MCTS algorithm
//!
//! Backpropagation policies decide which reward each node on the path to the
//! root is credited with. The tree itself guarantees one visit and one reward
//! addition per node; the policy only chooses the reward.

use crate::{game_state::GameState, policy::simulation::Playout, reward::Reward};

/// Trait for policies that turn a playout into per-node rewards
pub trait BackpropagationPolicy<S: GameState>: Send + Sync {
    /// Reward credited to a node whose incoming move was made by `player`
    fn credit(&self, playout: &Playout<S>, player: &S::Player) -> S::Reward;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>>;
}

/// Standard backpropagation policy
///
/// Credits each node with the playout result seen by the player who moved
/// into it, which handles alternating and multi-player turn orders alike.
#[derive(Debug, Clone)]
pub struct StandardPolicy;

impl StandardPolicy {
    /// Creates a new standard policy
    pub fn new() -> Self {
        StandardPolicy
    }
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> BackpropagationPolicy<S> for StandardPolicy {
    fn credit(&self, playout: &Playout<S>, player: &S::Player) -> S::Reward {
        playout.state.get_result(player)
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>> {
        Box::new(self.clone())
    }
}

/// Discounted backpropagation policy
///
/// Scales the result by `discount ^ rollout_steps`, so outcomes reached
/// quickly weigh more than the same outcome reached after a long rollout.
#[derive(Debug, Clone)]
pub struct DiscountedPolicy {
    /// Discount factor per rollout move, in [0, 1]
    pub discount: f64,
}

impl DiscountedPolicy {
    /// Creates a new discounted policy; the factor is clamped to [0, 1]
    pub fn new(discount: f64) -> Self {
        DiscountedPolicy {
            discount: discount.clamp(0.0, 1.0),
        }
    }
}

impl<S: GameState> BackpropagationPolicy<S> for DiscountedPolicy {
    fn credit(&self, playout: &Playout<S>, player: &S::Player) -> S::Reward {
        let exponent = i32::try_from(playout.steps).unwrap_or(i32::MAX);
        playout
            .state
            .get_result(player)
            .scaled(self.discount.powi(exponent))
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement BackpropagationPolicy for Box<dyn BackpropagationPolicy>
impl<S: GameState> BackpropagationPolicy<S> for Box<dyn BackpropagationPolicy<S>> {
    fn credit(&self, playout: &Playout<S>, player: &S::Player) -> S::Reward {
        (**self).credit(playout, player)
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>> {
        (**self).clone_box()
    }
}
