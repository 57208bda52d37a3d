//! Utility functions for the MCTS algorithm
//!
//! This module contains the bandit formulas and small selection helpers
//! used throughout the MCTS implementation.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::TieBreak;

/// Calculates the exploitation term for UCB1
///
/// This is simply the average reward for a node.
pub fn exploitation_term(total_reward: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    total_reward / visits as f64
}

/// Calculates the exploration term for UCB1
///
/// This is the term that encourages exploration of less-visited nodes.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }
    if parent_visits == 0 {
        return 0.0;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCB1 value for a node
///
/// UCB1 balances exploitation (using known good nodes) with exploration
/// (trying less-visited nodes that might be better).
pub fn ucb1_value(
    total_reward: f64,
    visits: u64,
    parent_visits: u64,
    exploration_constant: f64,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    let exploitation = exploitation_term(total_reward, visits);
    let exploration = exploration_term(parent_visits, visits, exploration_constant);

    exploitation + exploration
}

/// Returns the index of the largest score, breaking ties per `tie_break`
///
/// NaN scores never win. Returns `None` for an empty or all-NaN slice.
pub fn argmax(scores: &[f64], tie_break: TieBreak, rng: &mut StdRng) -> Option<usize> {
    let mut best_value = f64::NEG_INFINITY;
    let mut best: Vec<usize> = Vec::new();

    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.is_empty() || score > best_value {
            best_value = score;
            best.clear();
            best.push(i);
        } else if score == best_value {
            best.push(i);
        }
    }

    match (tie_break, best.len()) {
        (_, 0) => None,
        (TieBreak::First, _) | (_, 1) => Some(best[0]),
        (TieBreak::Random, n) => Some(best[rng.gen_range(0..n)]),
    }
}

/// Computes a numerically stable softmax over `values`
pub fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values
        .iter()
        .map(|v| ((v - max) / temperature).exp())
        .collect();
    let sum = exps.iter().sum::<f64>().max(f64::MIN_POSITIVE);

    exps.into_iter().map(|e| e / sum).collect()
}

/// Samples an index from a probability distribution
pub fn sample_index(probabilities: &[f64], rng: &mut StdRng) -> Option<usize> {
    if probabilities.is_empty() {
        return None;
    }

    let mut r: f64 = rng.gen();
    for (i, p) in probabilities.iter().enumerate() {
        r -= p;
        if r <= 0.0 {
            return Some(i);
        }
    }

    // Rounding left a sliver of mass; fall back to the last entry
    Some(probabilities.len() - 1)
}
