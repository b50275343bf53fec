use anyhow::{anyhow, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use std::cmp::Ordering;
use std::io::{stdin, stdout, Write};
use std::time::Instant;

use connect4_search::*;

mod terminal;
use terminal::*;

/// Play Connect 4 against a game tree search.
///
/// The game only ends when the board is full; whoever has completed more
/// lines of 4 at that point wins.
#[derive(Parser)]
#[command(name = "connect4_cli", about = "Play Connect 4 against a game tree search")]
struct Cli {
    /// Search algorithm used by the AI (asked interactively if omitted)
    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Number of plies the AI looks ahead (asked interactively if omitted)
    #[arg(long)]
    depth: Option<usize>,

    /// Search the AI's candidate moves on separate threads
    #[arg(long)]
    parallel: bool,

    /// Print the recorded search tree after every AI move
    #[arg(long)]
    show_tree: bool,
}

fn read_line() -> Result<String> {
    stdout().flush()?;
    let mut buffer = String::new();
    stdin().read_line(&mut buffer)?;
    Ok(buffer)
}

fn choose_algorithm() -> Result<Algorithm> {
    loop {
        println!("Choose algorithm:");
        for (i, algorithm) in Algorithm::ALL.iter().enumerate() {
            println!("  {}) {}", i + 1, algorithm);
        }
        print!("> ");
        let buffer = read_line()?;
        match buffer.trim().parse::<usize>() {
            Ok(choice @ 1..=3) => return Ok(Algorithm::ALL[choice - 1]),
            _ => println!("Unknown answer given"),
        }
    }
}

fn choose_depth() -> Result<usize> {
    loop {
        print!("Enter depth: ");
        let buffer = read_line()?;
        match buffer.trim().parse::<usize>() {
            Ok(depth) if depth > 0 => return Ok(depth),
            _ => println!("Depth must be a positive number"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("Welcome to Connect 4\n");

    let algorithm = match cli.algorithm {
        Some(algorithm) => algorithm,
        None => choose_algorithm()?,
    };
    let depth = match cli.depth {
        Some(0) => return Err(anyhow!("depth must be at least 1")),
        Some(depth) => depth,
        None => choose_depth()?,
    };
    info!("playing with {} at depth {}", algorithm, depth);

    let mut board = Board::new();
    let mut player = HUMAN;

    // game loop, the game only ends on a full board
    while !board.is_full() {
        display(&board)?;
        display_tally(&board);

        if player == AI {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
            spinner.set_message("AI is thinking...");
            spinner.enable_steady_tick(100);

            let start_time = Instant::now();
            let outcome = if cli.parallel {
                run_search_parallel(&board, depth, algorithm)
            } else {
                run_search(&board, depth, algorithm)
            };
            let elapsed = Instant::now() - start_time;
            spinner.finish_and_clear();

            println!("{} took {:.4} seconds", algorithm, elapsed.as_secs_f64());
            println!("Nodes expanded: {}", outcome.positions_considered());
            if cli.show_tree {
                print!("{}", outcome.root);
                println!("===========================");
            }

            let column = outcome
                .chosen_move
                .ok_or_else(|| anyhow!("search returned no move on a non-full board"))?;
            println!("AI plays: {}", column + 1);
            board = play_checked(&board, column + 1, AI)?;
        } else {
            print!("Move input > ");
            let input_str = read_line()?;

            let column = match input_str.trim().parse::<usize>() {
                Err(_) => {
                    println!("Invalid number: {}", input_str.trim());
                    continue;
                }
                Ok(column) => column,
            };

            board = match play_checked(&board, column, HUMAN) {
                Ok(next) => next,
                Err(err) => {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            };
        }
        player = player.opponent();
    }

    // end state
    display(&board)?;
    let human_lines = board.count_lines(HUMAN);
    let ai_lines = board.count_lines(AI);
    println!("You: {}     AI: {}", human_lines, ai_lines);
    match ai_lines.cmp(&human_lines) {
        Ordering::Greater => println!("AI wins!"),
        Ordering::Less => println!("You win!"),
        Ordering::Equal => println!("Draw!"),
    }
    Ok(())
}
