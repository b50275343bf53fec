use anyhow::{anyhow, Result};

use std::fmt;

use crate::{HEIGHT, WIDTH};

/// The number of distinct 4-cell windows on the board
pub const NUM_WINDOWS: usize =
    HEIGHT * (WIDTH - 3) + WIDTH * (HEIGHT - 3) + 2 * (WIDTH - 3) * (HEIGHT - 3);

/// Every horizontal, vertical and diagonal 4-cell window, as cell indices
pub const WINDOWS: [[usize; 4]; NUM_WINDOWS] = windows();

const fn index(row: usize, column: usize) -> usize {
    column + WIDTH * row
}

const fn windows() -> [[usize; 4]; NUM_WINDOWS] {
    let mut windows = [[0; 4]; NUM_WINDOWS];
    let mut n = 0;

    // horizontal
    let mut row = 0;
    while row < HEIGHT {
        let mut column = 0;
        while column + 3 < WIDTH {
            let mut i = 0;
            while i < 4 {
                windows[n][i] = index(row, column + i);
                i += 1;
            }
            n += 1;
            column += 1;
        }
        row += 1;
    }

    // vertical
    let mut column = 0;
    while column < WIDTH {
        let mut row = 0;
        while row + 3 < HEIGHT {
            let mut i = 0;
            while i < 4 {
                windows[n][i] = index(row + i, column);
                i += 1;
            }
            n += 1;
            row += 1;
        }
        column += 1;
    }

    // diagonal /
    let mut row = 0;
    while row + 3 < HEIGHT {
        let mut column = 0;
        while column + 3 < WIDTH {
            let mut i = 0;
            while i < 4 {
                windows[n][i] = index(row + i, column + i);
                i += 1;
            }
            n += 1;
            column += 1;
        }
        row += 1;
    }

    // diagonal \
    let mut row = 3;
    while row < HEIGHT {
        let mut column = 0;
        while column + 3 < WIDTH {
            let mut i = 0;
            while i < 4 {
                windows[n][i] = index(row - i, column + i);
                i += 1;
            }
            n += 1;
            column += 1;
        }
        row += 1;
    }

    windows
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

/// The human player, who moves first and minimises search values
pub const HUMAN: Player = Player::One;

/// The AI player, who maximises search values
pub const AI: Player = Player::Two;

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

/// An immutable Connect 4 position
///
/// Cells are stored left-to-right, bottom-to-top, so row 0 is the bottom row.
/// Playing a move never modifies a board in place: [`Board::apply_move`]
/// returns a new value, which lets sibling branches of a search share their
/// parent position freely.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
        }
    }

    /// Builds a board from a history of 1-indexed columns, alternating
    /// players and starting with [`Player::One`]
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut player = Player::One;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    let column = column - 1;
                    let row = board
                        .drop_row(column)
                        .ok_or_else(|| anyhow!("Invalid move, column {} full", column + 1))?;
                    board = board.apply_move(row, column, player);
                    player = player.opponent();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// Builds a board from `HEIGHT` rows of `WIDTH` characters, top row first
    ///
    /// `1`/`X` is a [`Player::One`] piece, `2`/`O` a [`Player::Two`] piece and
    /// `0`/`.` an empty cell. Floating pieces are rejected.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        if rows.len() != HEIGHT {
            return Err(anyhow!("expected {} rows, got {}", HEIGHT, rows.len()));
        }
        let mut board = Self::new();

        for (i, line) in rows.iter().enumerate() {
            let row = HEIGHT - 1 - i;
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != WIDTH {
                return Err(anyhow!(
                    "row '{}' has {} cells, expected {}",
                    line,
                    chars.len(),
                    WIDTH
                ));
            }
            for (column, c) in chars.into_iter().enumerate() {
                board.cells[index(row, column)] = match c {
                    '1' | 'X' | 'x' => Cell::PlayerOne,
                    '2' | 'O' | 'o' => Cell::PlayerTwo,
                    '0' | '.' => Cell::Empty,
                    _ => return Err(anyhow!("could not parse '{}' as a cell", c)),
                };
            }
        }

        // pieces must rest on the bottom or on another piece
        for column in 0..WIDTH {
            for row in 1..HEIGHT {
                if !board.cell(row, column).is_empty() && board.cell(row - 1, column).is_empty()
                {
                    return Err(anyhow!(
                        "floating piece at row {}, column {}",
                        row,
                        column + 1
                    ));
                }
            }
        }
        Ok(board)
    }

    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[index(row, column)]
    }

    /// Whether a piece can be dropped into `column`
    pub fn is_legal(&self, column: usize) -> bool {
        column < WIDTH && self.cell(HEIGHT - 1, column).is_empty()
    }

    /// All playable columns in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.is_legal(column)).collect()
    }

    /// The row a piece dropped into `column` would land on, or `None` if the column is full
    pub fn drop_row(&self, column: usize) -> Option<usize> {
        (0..HEIGHT).find(|&row| self.cell(row, column).is_empty())
    }

    /// Returns a copy of this board with `player`'s piece at (`row`, `column`)
    ///
    /// The caller must pass the row given by [`Board::drop_row`].
    pub fn apply_move(&self, row: usize, column: usize, player: Player) -> Self {
        debug_assert!(
            self.cell(row, column).is_empty(),
            "move applied to occupied cell ({}, {})",
            row,
            column
        );
        let mut next = *self;
        next.cells[index(row, column)] = player.into();
        next
    }

    /// Drops `player`'s piece into `column`, or returns `None` if the column can't be played
    pub fn play(&self, column: usize, player: Player) -> Option<Self> {
        if !self.is_legal(column) {
            return None;
        }
        self.drop_row(column)
            .map(|row| self.apply_move(row, column, player))
    }

    /// Counts every 4-cell window entirely filled by `player`
    ///
    /// Overlapping lines are counted separately, so five in a row is 2.
    pub fn count_lines(&self, player: Player) -> usize {
        let cell = Cell::from(player);
        WINDOWS
            .iter()
            .filter(|window| window.iter().all(|&i| self.cells[i] == cell))
            .count()
    }

    pub fn is_full(&self) -> bool {
        (0..WIDTH).all(|column| !self.is_legal(column))
    }

    pub fn num_pieces(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// The four cells of a window, in window order
    pub fn window(&self, window: &[usize; 4]) -> [Cell; 4] {
        [
            self.cells[window[0]],
            self.cells[window[1]],
            self.cells[window[2]],
            self.cells[window[3]],
        ]
    }

    /// The left-right mirror image of this board
    pub fn mirror(&self) -> Self {
        let mut mirrored = Self::new();
        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                mirrored.cells[index(row, WIDTH - 1 - column)] = self.cell(row, column);
            }
        }
        mirrored
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                let c = match self.cell(row, column) {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}", self)
    }
}
