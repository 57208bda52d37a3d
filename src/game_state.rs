//! Traits defining the domain model searched by MCTS.
//!
//! The GameState trait is the only interface the search core depends on. It
//! must be implemented for any game or decision process that will be searched.

use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::reward::Reward;

/// Trait for actions that can be taken in a game
///
/// Actions represent the moves or decisions that can be made in a game.
pub trait Action: Clone + Debug + Send + Sync {
    /// Returns a unique identifier for this action
    ///
    /// Two actions available from the same state must have different ids.
    /// Ids are used to merge statistics from parallel workers and to find
    /// the retained subtree when re-rooting.
    fn id(&self) -> usize;
}

/// Trait for players in a game
///
/// Players represent the entities making decisions in a game.
pub trait Player: Clone + Debug + PartialEq + Send + Sync {}

/// Trait defining the game state interface required for MCTS
///
/// This trait must be implemented for any game or decision process that will be
/// used with the MCTS algorithm. It defines how to get legal actions, apply actions,
/// determine if the game is over, and evaluate terminal states.
///
/// # Contract
///
/// - `get_legal_actions` returns an empty list if and only if the state is terminal.
///   A non-terminal state without legal actions aborts the search with
///   [`MCTSError::DomainContractViolation`](crate::MCTSError::DomainContractViolation).
/// - `apply_action` is pure and deterministic.
pub trait GameState: Clone + Send + Sync {
    /// The type of actions that can be taken in this game
    type Action: Action;

    /// The type of players in this game
    type Player: Player;

    /// The reward type produced when evaluating a state
    type Reward: Reward;

    /// Returns the list of legal actions from this state
    ///
    /// # Example
    ///
    /// ```
    /// # use uct_mcts::{GameState, Action};
    /// # #[derive(Debug, Clone, PartialEq)]
    /// # struct MyAction(usize);
    /// # impl Action for MyAction { fn id(&self) -> usize { self.0 } }
    /// # #[derive(Debug, Clone, PartialEq)]
    /// # struct MyPlayer;
    /// # impl uct_mcts::Player for MyPlayer {}
    /// # #[derive(Clone)]
    /// # struct MyGame;
    /// # impl GameState for MyGame {
    /// # type Action = MyAction;
    /// # type Player = MyPlayer;
    /// # type Reward = f64;
    /// fn get_legal_actions(&self) -> Vec<MyAction> {
    ///     vec![MyAction(0), MyAction(1), MyAction(2)]
    /// }
    /// # fn apply_action(&self, _action: &MyAction) -> Self { self.clone() }
    /// # fn is_terminal(&self) -> bool { false }
    /// # fn get_result(&self, _: &MyPlayer) -> f64 { 0.5 }
    /// # fn get_current_player(&self) -> MyPlayer { MyPlayer }
    /// # }
    /// ```
    fn get_legal_actions(&self) -> Vec<Self::Action>;

    /// Applies an action to the current state, returning the new state
    ///
    /// This must not modify `self`: MCTS explores many paths from the same state.
    fn apply_action(&self, action: &Self::Action) -> Self;

    /// Returns true if this state is terminal (game over)
    fn is_terminal(&self) -> bool;

    /// Returns the reward of this state from the perspective of the given player
    ///
    /// Called on the final state of every simulation. When a rollout is cut off
    /// by `max_rollout_steps` the state may be non-terminal, in which case this
    /// should return a heuristic estimate.
    fn get_result(&self, for_player: &Self::Player) -> Self::Reward;

    /// Returns the player whose turn it is in this state
    fn get_current_player(&self) -> Self::Player;

    /// Chooses the action to play from this state during a simulation
    ///
    /// The default implementation picks uniformly among the legal actions.
    /// Override it with a heuristic to get more informative rollouts.
    /// Returning `None` for a non-terminal state violates the domain contract.
    fn default_policy<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Self::Action> {
        self.get_legal_actions().choose(rng).cloned()
    }
}

/// Simplified implementation of Player trait for common types
impl Player for usize {}
impl Player for u8 {}
impl Player for i32 {}
impl Player for char {}

/// Unit marker for single-agent domains with no explicit player representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoPlayer;

impl Player for NoPlayer {}
