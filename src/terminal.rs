use anyhow::{anyhow, Result};
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_search::{Board, Cell, Player, AI, HEIGHT, HUMAN, WIDTH};

/// Plays a human move given as a 1-indexed column, rejecting bad input
pub fn play_checked(board: &Board, column_one_indexed: usize, player: Player) -> Result<Board> {
    if column_one_indexed < 1 || column_one_indexed > WIDTH {
        return Err(anyhow!(
            "Invalid move, column {} out of range. Columns must be between 1 and {}",
            column_one_indexed,
            WIDTH
        ));
    }
    let column = column_one_indexed - 1;
    if !board.is_legal(column) {
        return Err(anyhow!("Invalid move, column {} full", column_one_indexed));
    }
    board
        .drop_row(column)
        .map(|row| board.apply_move(row, column, player))
        .ok_or_else(|| anyhow!("Invalid move, column {} full", column_one_indexed))
}

pub fn display(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;
    for _ in 0..HEIGHT {
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    let (origin_x, origin_y) = crossterm::cursor::position()?;

    for row in 0..HEIGHT {
        for column in 0..WIDTH {
            let (pos_x, pos_y) = (origin_x + column as u16, origin_y - row as u16);

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match board.cell(row, column) {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
    }
    stdout
        .queue(MoveTo(origin_x + WIDTH as u16, origin_y))?
        .queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}

/// Prints the running count of completed lines for each side
pub fn display_tally(board: &Board) {
    println!(
        "You: {}     AI: {}",
        board.count_lines(HUMAN),
        board.count_lines(AI)
    );
}
