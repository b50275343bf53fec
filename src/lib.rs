//! A game tree search engine for playing the board game 'Connect 4'
//!
//! The AI chooses its move with one of three interchangeable searches
//! (exhaustive minimax, alpha-beta pruned minimax and expectiminimax with
//! drifting moves) over an immutable board, scoring cut-off positions with a
//! window-counting heuristic. Every search records the tree it explored so a
//! front end can draw or dump it.
//!
//! Play continues until the board is full; the winner is whoever has
//! completed more 4-in-a-row lines at that point.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{board::Board, search::{run_search, Algorithm}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::from_moves("44")?;
//! let outcome = run_search(&board, 2, Algorithm::AlphaBeta);
//!
//! assert!(outcome.chosen_move.is_some());
//! assert_eq!(outcome.expanded_count, outcome.root.size() - 1);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod heuristic;

pub mod tree;

pub mod search;


pub use board::{Board, Cell, Player, AI, HUMAN};
pub use search::{run_search, run_search_parallel, Algorithm, SearchOutcome, SearchStats};
pub use tree::{Mover, SearchNode};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// the window table and heuristic assume a standard board with room for a line of 4
const_assert!(WIDTH >= 4 && HEIGHT >= 4);
const_assert_eq!(board::NUM_WINDOWS, 69);
