//! Tic-Tac-Toe example for the MCTS algorithm
//!
//! This example plays Tic-Tac-Toe against a human. One search handle is
//! kept for the whole game: after every move its root advances to the
//! played child, so statistics from earlier searches carry over.
//!
//! Run with `RUST_LOG=debug` to see search progress.

use std::fmt;
use std::io::{self, Write};

use uct_mcts::{config::TieBreak, Action, GameState, MCTSConfig, MCTS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    println!("MCTS Tic-Tac-Toe Example");
    println!("========================");
    println!();

    // Set up a new game
    let mut game = TicTacToe::new();

    // Create MCTS configuration
    let config = MCTSConfig::default()
        .with_exploration_constant(1.414)
        .with_max_iterations(10_000)
        .with_tie_break(TieBreak::Random)
        .with_workers(2);

    let mut mcts = MCTS::new(game.clone(), config)?;

    // Main game loop
    while !game.is_terminal() {
        // Display the board
        println!("{}", game);

        let action = if game.current_player == Player::X {
            // Human player (X)
            println!("Your move (enter row column, e.g. '1 2'): ");
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                println!("No more input, leaving the game.");
                return Ok(());
            }

            let coords: Vec<usize> = input
                .split_whitespace()
                .filter_map(|s| s.parse::<usize>().ok())
                .collect();

            if coords.len() != 2 || coords[0] > 2 || coords[1] > 2 {
                println!("Invalid move! Enter row and column (0-2).");
                continue;
            }

            let action = Move {
                index: coords[0] * 3 + coords[1],
            };

            if !game.is_legal_move(&action) {
                println!("Illegal move! Try again.");
                continue;
            }
            action
        } else {
            // AI player (O)
            println!("AI is thinking...");

            let decision = mcts.search()?;
            println!(
                "AI chooses: {} (row {}, col {}), {} visits, average reward {:.3}",
                decision.action.index,
                decision.action.index / 3,
                decision.action.index % 3,
                decision.visits,
                decision.average_reward
            );

            // Show stats
            println!("{}", mcts.get_statistics().summary());
            decision.action
        };

        game = game.apply_action(&action);
        if mcts.advance_root(&action, game.clone())? {
            println!(
                "Reusing {} nodes from the previous search",
                mcts.tree().len()
            );
        }
    }

    // Display final state
    println!("{}", game);

    // Report the result
    match game.get_winner() {
        Some(winner) => println!("Player {:?} wins!", winner),
        None => println!("The game is a draw!"),
    }
    Ok(())
}

/// Players in Tic-Tac-Toe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Player {
    X,
    O,
}

impl uct_mcts::Player for Player {}

/// Tic-Tac-Toe move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Move {
    /// Board position index (0-8)
    index: usize,
}

impl Action for Move {
    fn id(&self) -> usize {
        self.index
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Tic-Tac-Toe game state
#[derive(Clone)]
struct TicTacToe {
    /// Board representation (None = empty, Some(Player) = occupied)
    board: [Option<Player>; 9],

    /// Current player's turn
    current_player: Player,

    /// Number of moves played so far
    moves_played: usize,
}

impl TicTacToe {
    /// Creates a new empty Tic-Tac-Toe board
    fn new() -> Self {
        TicTacToe {
            board: [None; 9],
            current_player: Player::X,
            moves_played: 0,
        }
    }

    /// Checks if a move is legal
    fn is_legal_move(&self, action: &Move) -> bool {
        action.index < 9 && self.board[action.index].is_none()
    }

    /// Returns the winner of the game, if any
    fn get_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            match (self.board[a], self.board[b], self.board[c]) {
                (Some(p), Some(q), Some(r)) if p == q && q == r => Some(p),
                _ => None,
            }
        })
    }
}

impl GameState for TicTacToe {
    type Action = Move;
    type Player = Player;
    type Reward = f64;

    fn get_legal_actions(&self) -> Vec<Self::Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..9)
            .filter(|&i| self.board[i].is_none())
            .map(|index| Move { index })
            .collect()
    }

    fn apply_action(&self, action: &Self::Action) -> Self {
        let mut new_state = self.clone();

        // Make the move
        new_state.board[action.index] = Some(self.current_player);
        new_state.moves_played = self.moves_played + 1;

        // Switch player
        new_state.current_player = match self.current_player {
            Player::X => Player::O,
            Player::O => Player::X,
        };

        new_state
    }

    fn is_terminal(&self) -> bool {
        self.get_winner().is_some() || self.moves_played == 9
    }

    fn get_result(&self, for_player: &Self::Player) -> f64 {
        match self.get_winner() {
            Some(winner) if winner == *for_player => 1.0, // Win
            Some(_) => 0.0,                               // Loss
            None => 0.5,                                  // Draw
        }
    }

    fn get_current_player(&self) -> Self::Player {
        self.current_player
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2")?;
        for row in 0..3 {
            write!(f, "{} ", row)?;
            for col in 0..3 {
                let symbol = match self.board[row * 3 + col] {
                    Some(Player::X) => "X",
                    Some(Player::O) => "O",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nPlayer {:?}'s turn", self.current_player)?;
        Ok(())
    }
}
