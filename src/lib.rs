//! # uct-mcts
//!
//! A Monte Carlo Tree Search (MCTS) engine driven by the Upper Confidence Trees
//! (UCT) bandit rule.
//!
//! The search is generic over any game or decision process implementing
//! [`GameState`]. The tree is stored in an arena with index links, every random
//! decision draws from one seedable RNG, and each phase of the algorithm is a
//! pluggable policy.
//!
//! ## Features
//!
//! - Generic implementation that works with any game or decision process
//! - UCB1 (UCT) and UCB1-Tuned selection, pluggable through [`SelectionPolicy`]
//! - Iteration and wall-clock budgets
//! - Best action by visit count, average reward or softmax sampling
//! - Subtree reuse between moves with [`MCTS::advance_root`]
//! - Optional root-parallel search over several worker trees
//! - Reproducible searches from a fixed seed
//!
//! ## Basic Usage
//!
//! ```
//! use uct_mcts::{Action, GameState, MCTSConfig, NoPlayer, MCTS};
//!
//! // Pick one of two levers; only lever A pays out
//! #[derive(Clone, Debug, PartialEq, Eq)]
//! enum Lever {
//!     A,
//!     B,
//! }
//!
//! impl Action for Lever {
//!     fn id(&self) -> usize {
//!         match self {
//!             Lever::A => 0,
//!             Lever::B => 1,
//!         }
//!     }
//! }
//!
//! #[derive(Clone)]
//! struct Bandit {
//!     pulled: Option<Lever>,
//! }
//!
//! impl GameState for Bandit {
//!     type Action = Lever;
//!     type Player = NoPlayer;
//!     type Reward = f64;
//!
//!     fn get_legal_actions(&self) -> Vec<Lever> {
//!         if self.pulled.is_some() {
//!             return vec![];
//!         }
//!         vec![Lever::A, Lever::B]
//!     }
//!
//!     fn apply_action(&self, action: &Lever) -> Self {
//!         Bandit {
//!             pulled: Some(action.clone()),
//!         }
//!     }
//!
//!     fn is_terminal(&self) -> bool {
//!         self.pulled.is_some()
//!     }
//!
//!     fn get_result(&self, _for_player: &NoPlayer) -> f64 {
//!         match self.pulled {
//!             Some(Lever::A) => 1.0,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn get_current_player(&self) -> NoPlayer {
//!         NoPlayer
//!     }
//! }
//!
//! fn main() -> Result<(), uct_mcts::MCTSError> {
//!     let config = MCTSConfig::default()
//!         .with_max_iterations(100)
//!         .with_seed(7);
//!
//!     let mut mcts = MCTS::new(Bandit { pulled: None }, config)?;
//!     let decision = mcts.search()?;
//!
//!     assert_eq!(decision.action, Lever::A);
//!     println!("{}", mcts.get_statistics().summary());
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Every iteration runs four phases:
//!
//! 1. **Selection**: Starting from the root, descend into the child with the best
//!    bandit score until reaching a terminal node or one with untried actions.
//! 2. **Expansion**: Expand one untried action into a new child node.
//! 3. **Simulation**: Play the domain's default policy from the new node to the
//!    end of the game on a copy of its state.
//! 4. **Backpropagation**: Walk back to the root, adding one visit and the
//!    simulation's reward, seen by the player who moved into each node.
//!
//! An iteration only writes to the tree once its rollout has succeeded, so an
//! error never leaves partial statistics behind.
//!
//! ## Customizing Policies
//!
//! ```
//! # use uct_mcts::{Action, GameState, MCTSConfig, MCTS};
//! # #[derive(Clone, Debug, PartialEq, Eq)]
//! # struct Move(u8);
//! # impl Action for Move { fn id(&self) -> usize { self.0 as usize } }
//! # #[derive(Clone)]
//! # struct Countdown(u8);
//! # impl GameState for Countdown {
//! #     type Action = Move;
//! #     type Player = usize;
//! #     type Reward = f64;
//! #     fn get_legal_actions(&self) -> Vec<Move> {
//! #         if self.0 == 0 { vec![] } else { vec![Move(0), Move(1)] }
//! #     }
//! #     fn apply_action(&self, _: &Move) -> Self { Countdown(self.0 - 1) }
//! #     fn is_terminal(&self) -> bool { self.0 == 0 }
//! #     fn get_result(&self, _: &usize) -> f64 { 0.5 }
//! #     fn get_current_player(&self) -> usize { 0 }
//! # }
//! use uct_mcts::policy::{
//!     backpropagation::DiscountedPolicy, expansion::FirstUntriedPolicy,
//!     selection::UCB1TunedPolicy, simulation::UniformPolicy,
//! };
//!
//! let config = MCTSConfig::default().with_max_iterations(10);
//! let mut mcts = MCTS::new(Countdown(3), config)
//!     .unwrap()
//!     .with_selection_policy(UCB1TunedPolicy::new(1.0))
//!     .with_expansion_policy(FirstUntriedPolicy::new())
//!     .with_simulation_policy(UniformPolicy::new())
//!     .with_backpropagation_policy(DiscountedPolicy::new(0.95));
//!
//! assert!(mcts.search().is_ok());
//! ```

pub mod config;
pub mod game_state;
pub mod mcts;
pub mod parallel;
pub mod policy;
pub mod reward;
pub mod stats;
pub mod tree;
pub mod utils;

pub use config::MCTSConfig;
pub use game_state::{Action, GameState, NoPlayer, Player};
pub use mcts::MCTS;
pub use policy::{BackpropagationPolicy, ExpansionPolicy, SelectionPolicy, SimulationPolicy};
pub use reward::{Reward, Score};
pub use stats::{ChildStats, Decision, SearchStatistics};
pub use tree::{Node, NodeId, NodeStats, Tree};

/// Error types for the MCTS algorithm
#[derive(thiserror::Error, Debug)]
pub enum MCTSError {
    /// The root state is terminal, so there is no action to choose
    #[error("No legal actions available from current state")]
    NoLegalActions,

    /// The search ended without any root child to choose from
    ///
    /// Happens when the budget ran out before the first iteration completed.
    /// Extending the budget is the usual remedy.
    #[error("Search produced no decision after {iterations} iterations")]
    EmptyResult {
        /// Iterations completed by the search
        iterations: usize,
    },

    /// The domain model broke its contract, e.g. a non-terminal state without actions
    #[error("Domain contract violation: {0}")]
    DomainContractViolation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl MCTSError {
    /// Returns true for [`MCTSError::EmptyResult`]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, MCTSError::EmptyResult { .. })
    }
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;
