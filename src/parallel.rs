//! Root-parallel search
//!
//! Each worker searches its own independent tree from the root state on the
//! rayon thread pool. Trees are never shared, so there is nothing to lock;
//! root-child statistics are merged by action id once every worker is done.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    config::MCTSConfig,
    game_state::{Action, GameState},
    mcts::run_iterations,
    policy::PolicySet,
    stats::{ChildStats, SearchStatistics},
    tree::{NodeId, Tree},
    Result,
};

/// Splits an iteration budget into per-worker budgets summing to `iterations`
pub fn split_budget(iterations: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let base = iterations / workers;
    let remainder = iterations % workers;
    (0..workers)
        .map(|w| base + usize::from(w < remainder))
        .collect()
}

/// Merges root-child statistics from several trees by action id
///
/// Children keep the order in which their action was first seen, so a
/// `First` tie-break stays deterministic.
pub fn merge_root_statistics<A: Action>(per_worker: Vec<Vec<ChildStats<A>>>) -> Vec<ChildStats<A>> {
    let mut merged: Vec<ChildStats<A>> = Vec::new();
    let mut positions: HashMap<usize, usize> = HashMap::new();

    for child in per_worker.into_iter().flatten() {
        match positions.get(&child.action.id()) {
            Some(&pos) => {
                merged[pos].visits += child.visits;
                merged[pos].total_reward += child.total_reward;
            }
            None => {
                positions.insert(child.action.id(), merged.len());
                merged.push(child);
            }
        }
    }

    merged
}

/// Runs `config.workers` independent searches and merges their root statistics
///
/// Worker 0 searches `tree` itself, which is handed back afterwards even
/// when a worker fails, so the caller keeps its tree for re-rooting. The
/// first failing worker stops all others at their next iteration.
pub(crate) fn search_root_parallel<S: GameState>(
    tree: &mut Tree<S>,
    policies: &PolicySet<S>,
    config: &MCTSConfig,
    iterations: usize,
    max_time: Option<Duration>,
    rng: &mut StdRng,
) -> Result<(SearchStatistics, Vec<ChildStats<S::Action>>)> {
    let root_state = tree.root_node().state.clone();
    let budgets = split_budget(iterations, config.workers);

    let mut worker_trees = Vec::with_capacity(budgets.len());
    for _ in 0..budgets.len() {
        worker_trees.push(Tree::new(root_state.clone())?);
    }
    // Worker 0 continues the caller's tree
    std::mem::swap(tree, &mut worker_trees[0]);

    let jobs: Vec<(Tree<S>, u64, usize)> = worker_trees
        .into_iter()
        .zip(budgets)
        .map(|(worker_tree, budget)| (worker_tree, rng.gen::<u64>(), budget))
        .collect();

    log::debug!("starting root-parallel search with {} workers", jobs.len());
    let start_time = Instant::now();
    let abort = AtomicBool::new(false);

    let results: Vec<(Tree<S>, Result<SearchStatistics>)> = jobs
        .into_par_iter()
        .map(|(mut worker_tree, seed, budget)| {
            let mut worker_rng = StdRng::seed_from_u64(seed);
            let outcome = run_iterations(
                &mut worker_tree,
                policies,
                config,
                budget,
                max_time,
                Some(&abort),
                &mut worker_rng,
            );
            if outcome.is_err() {
                abort.store(true, Ordering::Relaxed);
            }
            (worker_tree, outcome)
        })
        .collect();

    let mut parts = Vec::with_capacity(results.len());
    let mut per_worker = Vec::with_capacity(results.len());
    let mut first_error = None;
    let mut trees = Vec::with_capacity(results.len());

    for (worker_tree, outcome) in results {
        match outcome {
            Ok(statistics) => parts.push(statistics),
            Err(err) => {
                log::warn!("root-parallel worker failed: {}", err);
                first_error.get_or_insert(err);
            }
        }
        per_worker.push(worker_tree.child_statistics(NodeId::ROOT));
        trees.push(worker_tree);
    }

    if let Some(primary) = trees.into_iter().next() {
        *tree = primary;
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    let statistics = SearchStatistics::merge(&parts, start_time.elapsed());
    Ok((statistics, merge_root_statistics(per_worker)))
}
