//! Static evaluation of positions cut off by the search depth

use crate::board::{Board, Cell, Player, WINDOWS};
use crate::HEIGHT;

/// Bonus for each of the player's pieces in the centre column
pub const CENTER_BONUS: i64 = 3;

const CENTER_COLUMN: usize = crate::WIDTH / 2;

/// Scores a single 4-cell window from the point of view of `player`
///
/// Opponent threats are weighted slightly differently from the player's own
/// so that a completed opponent line outweighs a completed own line.
pub fn score_window(window: [Cell; 4], player: Player) -> i64 {
    let own = Cell::from(player);
    let opponent = Cell::from(player.opponent());

    let own_count = window.iter().filter(|&&cell| cell == own).count();
    let opponent_count = window.iter().filter(|&&cell| cell == opponent).count();
    let empty_count = window.iter().filter(|cell| cell.is_empty()).count();

    match (own_count, opponent_count, empty_count) {
        (4, _, _) => 1000,
        (3, _, 1) => 100,
        (2, _, 2) => 10,
        (_, 4, _) => -1100,
        (_, 3, 1) => -90,
        (_, 2, 2) => -10,
        _ => 0,
    }
}

/// Heuristic value of `board` for `player`
///
/// Only meaningful as a leaf estimate for a board that is not full; terminal
/// positions are scored by line counts on a scale this never reaches.
pub fn score_position(board: &Board, player: Player) -> i64 {
    let own = Cell::from(player);
    let center = (0..HEIGHT)
        .filter(|&row| board.cell(row, CENTER_COLUMN) == own)
        .count() as i64;

    let windows: i64 = WINDOWS
        .iter()
        .map(|window| score_window(board.window(window), player))
        .sum();

    center * CENTER_BONUS + windows
}
