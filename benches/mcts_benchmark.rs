#[macro_use]
extern crate criterion;

use criterion::{black_box, BenchmarkId, Criterion};
use std::time::Duration;
use uct_mcts::{
    config::TieBreak, policy::selection::UCB1TunedPolicy, Action, GameState, MCTSConfig, MCTS,
};

// Two players take turns adding 1..=max_step to a running total;
// whoever reaches the target first wins
#[derive(Clone, Debug)]
struct Race {
    total: u32,
    target: u32,
    max_step: u32,
    to_move: usize,
}

impl Race {
    fn new(target: u32, max_step: u32) -> Self {
        Race {
            total: 0,
            target,
            max_step,
            to_move: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Step(u32);

impl Action for Step {
    fn id(&self) -> usize {
        self.0 as usize
    }
}

impl GameState for Race {
    type Action = Step;
    type Player = usize;
    type Reward = f64;

    fn get_legal_actions(&self) -> Vec<Self::Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        (1..=self.max_step).map(Step).collect()
    }

    fn apply_action(&self, action: &Self::Action) -> Self {
        Race {
            total: self.total + action.0,
            to_move: 1 - self.to_move,
            ..self.clone()
        }
    }

    fn is_terminal(&self) -> bool {
        self.total >= self.target
    }

    fn get_result(&self, for_player: &usize) -> f64 {
        // The player who just moved reached the target
        match (self.is_terminal(), *for_player != self.to_move) {
            (true, true) => 1.0,
            (true, false) => 0.0,
            (false, _) => 0.5,
        }
    }

    fn get_current_player(&self) -> usize {
        self.to_move
    }
}

fn base_config(iterations: usize) -> MCTSConfig {
    MCTSConfig::default()
        .with_max_iterations(iterations)
        .with_seed(1)
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    let state = Race::new(30, 4);

    for tie_break in [TieBreak::First, TieBreak::Random] {
        let config = base_config(2000).with_tie_break(tie_break);
        group.bench_with_input(
            BenchmarkId::new("ucb1", format!("{:?}", tie_break)),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut mcts = MCTS::new(state.clone(), config.clone()).unwrap();
                    black_box(mcts.search())
                })
            },
        );
    }

    group.bench_function("ucb1_tuned", |b| {
        b.iter(|| {
            let mut mcts = MCTS::new(state.clone(), base_config(2000))
                .unwrap()
                .with_selection_policy(UCB1TunedPolicy::default());
            black_box(mcts.search())
        })
    });

    group.finish();
}

fn bench_rollout_cap(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout_cap");
    // Long games make rollouts dominate the iteration cost
    let state = Race::new(200, 3);

    for cap in [None, Some(16), Some(4)] {
        let mut config = base_config(1000);
        config.max_rollout_steps = cap;
        let label = cap.map_or_else(|| "none".to_string(), |steps| steps.to_string());

        group.bench_with_input(BenchmarkId::new("max_steps", label), &config, |b, config| {
            b.iter(|| {
                let mut mcts = MCTS::new(state.clone(), config.clone()).unwrap();
                black_box(mcts.search())
            })
        });
    }

    group.finish();
}

fn bench_parallel_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_parallel");
    group.measurement_time(Duration::from_secs(10));
    let state = Race::new(60, 5);

    // Same total budget spread over more workers
    for workers in [1usize, 2, 4] {
        let config = base_config(8000).with_workers(workers);
        group.bench_with_input(BenchmarkId::new("workers", workers), &config, |b, config| {
            b.iter(|| {
                let mut mcts = MCTS::new(state.clone(), config.clone()).unwrap();
                black_box(mcts.search())
            })
        });
    }

    group.finish();
}

/// Plays a self-play game, optionally keeping the chosen subtree between moves
fn self_play(reuse: bool, moves: usize) {
    let mut state = Race::new(40, 4);
    let mut mcts = match MCTS::new(state.clone(), base_config(500)) {
        Ok(mcts) => mcts,
        Err(_) => return,
    };

    for _ in 0..moves {
        let decision = match mcts.search() {
            Ok(decision) => decision,
            Err(_) => break,
        };
        state = state.apply_action(&decision.action);
        let outcome = if reuse {
            mcts.advance_root(&decision.action, state.clone()).map(|_| ())
        } else {
            mcts.reset_root(state.clone())
        };
        if outcome.is_err() {
            break;
        }
    }
    black_box(mcts.tree().len());
}

fn bench_tree_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_reuse");

    group.bench_function("reset_root", |b| b.iter(|| self_play(false, 6)));
    group.bench_function("advance_root", |b| b.iter(|| self_play(true, 6)));

    group.finish();
}

criterion_group!(
    benches,
    bench_selection,
    bench_rollout_cap,
    bench_parallel_search,
    bench_tree_reuse
);
criterion_main!(benches);
