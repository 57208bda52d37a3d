//! Main implementation of the Monte Carlo Tree Search algorithm
//!
//! This module contains the core MCTS implementation, orchestrating the
//! four phases of selection, expansion, simulation, and backpropagation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    config::{BestChildCriteria, MCTSConfig, TieBreak},
    game_state::{Action, GameState},
    parallel,
    policy::{
        BackpropagationPolicy, ExpansionPolicy, PolicySet, SelectionPolicy, SimulationPolicy,
    },
    stats::{ChildStats, Decision, SearchStatistics},
    tree::{NodeId, Tree},
    utils, MCTSError, Result,
};

/// The main Monte Carlo Tree Search implementation
///
/// This struct is the search handle: it owns the tree, the configuration,
/// the phase policies and the random source, and provides methods to run
/// the search and retrieve results.
pub struct MCTS<S: GameState> {
    /// The search tree; reused across searches and re-rooted by `advance_root`
    tree: Tree<S>,

    /// Configuration for the search
    config: MCTSConfig,

    /// Statistics gathered during the last search
    statistics: SearchStatistics,

    /// Phase policies
    policies: PolicySet<S>,

    /// Random source for every random decision of the search
    rng: StdRng,
}

impl<S: GameState + 'static> MCTS<S> {
    /// Creates a new MCTS instance with the given initial state and configuration
    ///
    /// Fails with [`MCTSError::InvalidConfiguration`] for an invalid config and with
    /// [`MCTSError::DomainContractViolation`] when the initial state is not terminal
    /// but has no legal actions.
    pub fn new(initial_state: S, config: MCTSConfig) -> Result<Self> {
        config.validate()?;

        let tree = Tree::new(initial_state)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let policies = PolicySet::uct(config.exploration_constant);

        Ok(MCTS {
            tree,
            config,
            statistics: SearchStatistics::new(),
            policies,
            rng,
        })
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.policies.selection = Box::new(policy);
        self
    }

    /// Sets the expansion policy to use
    pub fn with_expansion_policy<P: ExpansionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.policies.expansion = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.policies.simulation = Box::new(policy);
        self
    }

    /// Sets the backpropagation policy to use
    pub fn with_backpropagation_policy<P: BackpropagationPolicy<S> + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.policies.backpropagation = Box::new(policy);
        self
    }

    /// Runs the search with the configured budgets and returns the best action
    pub fn search(&mut self) -> Result<Decision<S::Action>> {
        self.run(self.config.max_iterations, self.config.max_time)
    }

    /// Runs the search for the specified number of iterations
    ///
    /// The configured time limit still applies.
    pub fn search_for_iterations(&mut self, iterations: usize) -> Result<Decision<S::Action>> {
        self.run(iterations, self.config.max_time)
    }

    /// Runs the search for the specified duration
    ///
    /// The iteration budget is lifted; only the duration bounds the search.
    pub fn search_for_time(&mut self, duration: Duration) -> Result<Decision<S::Action>> {
        self.run(usize::MAX, Some(duration))
    }

    fn run(
        &mut self,
        iterations: usize,
        max_time: Option<Duration>,
    ) -> Result<Decision<S::Action>> {
        if self.tree.root_node().is_terminal() {
            return Err(MCTSError::NoLegalActions);
        }

        let (statistics, children) = if self.config.workers > 1 {
            parallel::search_root_parallel(
                &mut self.tree,
                &self.policies,
                &self.config,
                iterations,
                max_time,
                &mut self.rng,
            )?
        } else {
            let statistics = run_iterations(
                &mut self.tree,
                &self.policies,
                &self.config,
                iterations,
                max_time,
                None,
                &mut self.rng,
            )?;
            (statistics, self.tree.child_statistics(NodeId::ROOT))
        };

        log::debug!(
            "search finished: {} iterations in {:?}, {} nodes",
            statistics.iterations,
            statistics.total_time,
            statistics.tree_size
        );
        let completed = statistics.iterations;
        self.statistics = statistics;

        choose_best(
            &children,
            self.config.best_child_criteria,
            self.config.tie_break,
            &mut self.rng,
        )
        .ok_or(MCTSError::EmptyResult {
            iterations: completed,
        })
    }

    /// Moves the root to the child reached by `action`
    ///
    /// When that child exists its subtree and statistics are kept and
    /// `observed_state` replaces its stored state; every other node is dropped.
    /// Otherwise the tree is rebuilt from `observed_state`. Returns whether
    /// the subtree was reused.
    pub fn advance_root(&mut self, action: &S::Action, observed_state: S) -> Result<bool> {
        match self.tree.find_child(NodeId::ROOT, action.id()) {
            Some(child) => {
                self.tree.reroot(child, observed_state);
                Ok(true)
            }
            None => {
                self.tree = Tree::new(observed_state)?;
                log::debug!("action {:?} was never expanded, tree rebuilt", action);
                Ok(false)
            }
        }
    }

    /// Discards the tree and starts over from `state`
    pub fn reset_root(&mut self, state: S) -> Result<()> {
        self.tree = Tree::new(state)?;
        Ok(())
    }

    /// Statistics of the root's children in expansion order
    pub fn root_statistics(&self) -> Vec<ChildStats<S::Action>> {
        self.tree.child_statistics(NodeId::ROOT)
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the search tree
    pub fn tree(&self) -> &Tree<S> {
        &self.tree
    }

    /// Returns the configuration
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Returns a visualization of the search tree
    pub fn visualize_tree(&self) -> String {
        self.tree.visualize()
    }
}

/// Runs up to `iterations` iterations on `tree`, checking the time limit before each
///
/// A raised `abort` flag stops the loop at the next iteration boundary.
pub(crate) fn run_iterations<S: GameState>(
    tree: &mut Tree<S>,
    policies: &PolicySet<S>,
    config: &MCTSConfig,
    iterations: usize,
    max_time: Option<Duration>,
    abort: Option<&AtomicBool>,
    rng: &mut StdRng,
) -> Result<SearchStatistics> {
    let start_time = Instant::now();
    let mut statistics = SearchStatistics::new();

    for _ in 0..iterations {
        if let Some(max_duration) = max_time {
            if start_time.elapsed() >= max_duration {
                statistics.stopped_early = true;
                log::debug!("search stopped early due to time limit");
                break;
            }
        }
        if abort.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
            statistics.stopped_early = true;
            log::debug!("search aborted by another worker");
            break;
        }

        statistics.rollout_steps += execute_iteration(tree, policies, config, rng)?;
        statistics.iterations += 1;
    }

    statistics.total_time = start_time.elapsed();
    statistics.tree_size = tree.len();
    statistics.max_depth = tree.max_depth();
    Ok(statistics)
}

/// Executes a single iteration and returns the rollout length
///
/// Nothing is written to the tree until the rollout has succeeded, so a
/// failing iteration leaves the tree exactly as it was.
fn execute_iteration<S: GameState>(
    tree: &mut Tree<S>,
    policies: &PolicySet<S>,
    config: &MCTSConfig,
    rng: &mut StdRng,
) -> Result<usize> {
    // 1. Selection
    let selected = selection(tree, policies, config, rng);

    // 2. Expansion, prepared but not yet committed
    let node = tree.get(selected);
    let expandable = !node.is_terminal() && !at_depth_limit(config, node.depth);
    let expansion = if expandable {
        match policies.expansion.select_action_to_expand(node, rng) {
            Some(index) => Some((index, tree.prepare_child(selected, index)?)),
            None => None,
        }
    } else {
        None
    };

    // 3. Simulation
    let start_state = match &expansion {
        Some((_, child)) => &child.state,
        None => &node.state,
    };
    let playout = policies
        .simulation
        .simulate(start_state, config.max_rollout_steps, rng)?;

    // 4. Backpropagation
    let leaf = match expansion {
        Some((index, child)) => tree.commit_child(selected, index, child),
        None => selected,
    };
    let backpropagation = &policies.backpropagation;
    let updated = tree.backpropagate(leaf, |player| backpropagation.credit(&playout, player));

    log::trace!(
        "iteration: leaf {:?}, path length {}, rollout steps {}",
        leaf,
        updated,
        playout.steps
    );
    Ok(playout.steps)
}

/// Selection phase: descend until a terminal, depth-limited or not fully expanded node
fn selection<S: GameState>(
    tree: &Tree<S>,
    policies: &PolicySet<S>,
    config: &MCTSConfig,
    rng: &mut StdRng,
) -> NodeId {
    let mut current = tree.root();

    loop {
        let node = tree.get(current);
        if node.is_terminal() || !node.is_fully_expanded() || at_depth_limit(config, node.depth) {
            return current;
        }

        match tree.select_child(current, policies.selection.as_ref(), config.tie_break, rng) {
            Some(child) => current = child,
            None => return current,
        }
    }
}

fn at_depth_limit(config: &MCTSConfig, depth: usize) -> bool {
    config.max_depth.map_or(false, |max| depth >= max)
}

/// Picks the final action among root children according to `criteria`
pub(crate) fn choose_best<A: Clone>(
    children: &[ChildStats<A>],
    criteria: BestChildCriteria,
    tie_break: TieBreak,
    rng: &mut StdRng,
) -> Option<Decision<A>> {
    let index = match criteria {
        BestChildCriteria::MostVisits => {
            let visits: Vec<f64> = children.iter().map(|c| c.visits as f64).collect();
            utils::argmax(&visits, tie_break, rng)?
        }
        BestChildCriteria::HighestValue => {
            let values: Vec<f64> = children.iter().map(|c| c.average_reward()).collect();
            utils::argmax(&values, tie_break, rng)?
        }
        BestChildCriteria::Probabilistic { temperature } => {
            let values: Vec<f64> = children.iter().map(|c| c.average_reward()).collect();
            utils::sample_index(&utils::softmax(&values, temperature), rng)?
        }
        BestChildCriteria::HeuristicWin => {
            let any_win = children.iter().any(|c| c.is_winning());
            let values: Vec<f64> = children
                .iter()
                .map(|c| {
                    if !any_win || c.is_winning() {
                        c.average_reward()
                    } else {
                        f64::NAN
                    }
                })
                .collect();
            utils::argmax(&values, tie_break, rng)?
        }
    };

    children.get(index).map(Decision::from)
}
