//! Simulation policies for the MCTS algorithm
//!
//! Simulation policies play a game out from a given state on a private copy
//! of that state. They never touch the tree.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{game_state::GameState, MCTSError, Result};

/// The end of a rollout
#[derive(Debug, Clone)]
pub struct Playout<S> {
    /// Final state: terminal, or the state where the step cap stopped the rollout
    pub state: S,
    /// Number of moves played
    pub steps: usize,
}

/// Trait for policies that simulate games
pub trait SimulationPolicy<S: GameState>: Send + Sync {
    /// Plays from `state` until a terminal state or `max_steps` moves
    fn simulate(&self, state: &S, max_steps: Option<usize>, rng: &mut StdRng)
        -> Result<Playout<S>>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>>;
}

/// Shared rollout loop; `choose` picks the next move for a non-terminal state
fn play_out<S, F>(state: &S, max_steps: Option<usize>, mut choose: F) -> Result<Playout<S>>
where
    S: GameState,
    F: FnMut(&S) -> Option<S::Action>,
{
    let mut current = state.clone();
    let mut steps = 0;

    while !current.is_terminal() && max_steps.map_or(true, |max| steps < max) {
        let action = choose(&current).ok_or_else(|| {
            MCTSError::DomainContractViolation(format!(
                "no move available from a non-terminal state after {} rollout steps",
                steps
            ))
        })?;
        current = current.apply_action(&action);
        steps += 1;
    }

    Ok(Playout {
        state: current,
        steps,
    })
}

/// Default-policy simulation
///
/// Plays the moves chosen by [`GameState::default_policy`] until the game ends.
/// With the trait's default implementation this is a uniform random playout.
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> SimulationPolicy<S> for RandomPolicy {
    fn simulate(
        &self,
        state: &S,
        max_steps: Option<usize>,
        rng: &mut StdRng,
    ) -> Result<Playout<S>> {
        play_out(state, max_steps, |s| s.default_policy(&mut *rng))
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        Box::new(self.clone())
    }
}

/// Uniform simulation
///
/// Ignores any heuristic default policy and picks uniformly among the legal
/// actions at every step.
#[derive(Debug, Clone)]
pub struct UniformPolicy;

impl UniformPolicy {
    /// Creates a new uniform policy
    pub fn new() -> Self {
        UniformPolicy
    }
}

impl Default for UniformPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> SimulationPolicy<S> for UniformPolicy {
    fn simulate(
        &self,
        state: &S,
        max_steps: Option<usize>,
        rng: &mut StdRng,
    ) -> Result<Playout<S>> {
        play_out(state, max_steps, |s| {
            s.get_legal_actions().choose(&mut *rng).cloned()
        })
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement SimulationPolicy for Box<dyn SimulationPolicy>
impl<S: GameState> SimulationPolicy<S> for Box<dyn SimulationPolicy<S>> {
    fn simulate(
        &self,
        state: &S,
        max_steps: Option<usize>,
        rng: &mut StdRng,
    ) -> Result<Playout<S>> {
        (**self).simulate(state, max_steps, rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        (**self).clone_box()
    }
}
