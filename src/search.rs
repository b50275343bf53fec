//! Game tree searches used to choose the AI's move
//!
//! # Value Convention
//! The AI ([`crate::AI`]) maximises and the human ([`crate::HUMAN`]) minimises.
//! A full board is the only terminal position: it is worth [`WIN_VALUE`] if the AI
//! has completed more lines than the human, [`LOSS_VALUE`] if the human has
//! completed more, and 0 otherwise. Positions cut off by depth are scored with
//! [`score_position`] for the AI, which never comes close to the terminal values.
//!
//! # Tie-breaking
//! Children are expanded in ascending column order and a later child only
//! replaces the running best if it is strictly better, so equal values always
//! resolve to the lowest column.

use log::{debug, trace};
use rayon::prelude::*;

use std::fmt;

use crate::board::{Board, Player, AI, HUMAN};
use crate::heuristic::score_position;
use crate::tree::{Mover, SearchNode};
use crate::WIDTH;

/// A backed-up search value
pub type Value = f64;

/// Value of a full board on which the AI has more lines than the human
pub const WIN_VALUE: Value = 1e11;

/// Value of a full board on which the human has more lines than the AI
pub const LOSS_VALUE: Value = -1e11;

/// Column offsets of the possible drifts of a move, with their probabilities
///
/// Drifts that leave the board or land on a full column are not played and
/// their probability is dropped rather than redistributed.
pub const CHANCE_OUTCOMES: [(isize, f64); 3] = [(0, 0.6), (-1, 0.2), (1, 0.2)];

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum Algorithm {
    /// Exhaustive minimax
    Minimax,
    /// Minimax with alpha-beta pruning
    AlphaBeta,
    /// Expectiminimax over drifting moves, with alpha-beta pruning at the decision layers
    Expectiminimax,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Minimax,
        Algorithm::AlphaBeta,
        Algorithm::Expectiminimax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Minimax => "Minimax",
            Algorithm::AlphaBeta => "Minimax with alpha-beta pruning",
            Algorithm::Expectiminimax => "Expectiminimax with alpha-beta pruning",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The side to move at a decision layer
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Side {
    Max,
    Min,
}

impl Side {
    pub fn player(self) -> Player {
        match self {
            Side::Max => AI,
            Side::Min => HUMAN,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }

    fn worst(self) -> Value {
        match self {
            Side::Max => f64::NEG_INFINITY,
            Side::Min => f64::INFINITY,
        }
    }

    fn improves(self, value: Value, best: Value) -> bool {
        match self {
            Side::Max => value > best,
            Side::Min => value < best,
        }
    }
}

impl From<Side> for Mover {
    fn from(side: Side) -> Self {
        match side {
            Side::Max => Mover::Maximizer,
            Side::Min => Mover::Minimizer,
        }
    }
}

/// Counters for a single search
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct SearchStats {
    /// The number of nodes created below the root
    pub expanded_count: usize,
}

impl SearchStats {
    fn record_expansion(&mut self) {
        self.expanded_count += 1;
    }
}

/// The result of a top-level search
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// The column the AI should play, `None` if the board was already full or the depth was 0
    pub chosen_move: Option<usize>,
    pub value: Value,
    pub root: SearchNode,
    pub expanded_count: usize,
}

impl SearchOutcome {
    /// The number of positions considered, including the root
    pub fn positions_considered(&self) -> usize {
        self.expanded_count + 1
    }
}

/// Scores a full board by comparing completed lines
pub fn terminal_value(board: &Board) -> Value {
    let ai_lines = board.count_lines(AI);
    let human_lines = board.count_lines(HUMAN);
    if ai_lines > human_lines {
        WIN_VALUE
    } else if human_lines > ai_lines {
        LOSS_VALUE
    } else {
        0.0
    }
}

// terminal rule first, then the depth cut-off
fn leaf_value(board: &Board, moves: &[usize], plies: usize) -> Option<Value> {
    if moves.is_empty() {
        Some(terminal_value(board))
    } else if plies == 0 {
        Some(score_position(board, AI) as Value)
    } else {
        None
    }
}

// every legal move paired with the board it produces
fn successors(board: &Board, moves: &[usize], player: Player) -> Vec<(usize, Board)> {
    moves
        .iter()
        .filter_map(|&column| board.play(column, player).map(|next| (column, next)))
        .collect()
}

/// Running best of a decision node's children
struct Best {
    side: Side,
    value: Value,
    column: Option<usize>,
    index: Option<usize>,
}

impl Best {
    fn new(side: Side, fallback: Option<usize>) -> Self {
        Self {
            side,
            value: side.worst(),
            column: fallback,
            index: None,
        }
    }

    fn fold(&mut self, value: Value, column: usize, index: usize) {
        if self.side.improves(value, self.value) {
            self.value = value;
            self.column = Some(column);
            self.index = Some(index);
        }
    }

    /// Narrows the window with the running best, returning whether the
    /// remaining siblings can be pruned
    fn tighten(&self, alpha: &mut Value, beta: &mut Value) -> bool {
        match self.side {
            Side::Max => {
                *alpha = alpha.max(self.value);
                self.value >= *beta
            }
            Side::Min => {
                *beta = beta.min(self.value);
                self.value <= *alpha
            }
        }
    }

    fn finish(self, node: &mut SearchNode) -> (Option<usize>, Value) {
        node.score = Some(self.value);
        if let Some(index) = self.index {
            node.mark_best(index);
        }
        (self.column, self.value)
    }
}

/// Exhaustive minimax, visiting every legal move down to `plies`
pub fn minimax(
    board: &Board,
    plies: usize,
    side: Side,
    node: &mut SearchNode,
    stats: &mut SearchStats,
) -> (Option<usize>, Value) {
    let moves = board.legal_moves();
    if let Some(value) = leaf_value(board, &moves, plies) {
        node.score = Some(value);
        return (None, value);
    }

    let mut best = Best::new(side, moves.first().copied());
    for (index, (column, next)) in successors(board, &moves, side.player())
        .into_iter()
        .enumerate()
    {
        let child = node.add_child(column, side.other().into(), None);
        stats.record_expansion();

        let (_, value) = minimax(&next, plies - 1, side.other(), child, stats);
        best.fold(value, column, index);
    }
    best.finish(node)
}

/// Minimax with alpha-beta pruning
///
/// Siblings after a cut-off are never expanded, so they are missing from the
/// recorded tree. The chosen move and value at the root always match
/// [`minimax`] when called with an infinite window.
pub fn alpha_beta(
    board: &Board,
    plies: usize,
    side: Side,
    mut alpha: Value,
    mut beta: Value,
    node: &mut SearchNode,
    stats: &mut SearchStats,
) -> (Option<usize>, Value) {
    let moves = board.legal_moves();
    if let Some(value) = leaf_value(board, &moves, plies) {
        node.score = Some(value);
        return (None, value);
    }

    let mut best = Best::new(side, moves.first().copied());
    for (index, (column, next)) in successors(board, &moves, side.player())
        .into_iter()
        .enumerate()
    {
        let child = node.add_child(column, side.other().into(), None);
        stats.record_expansion();

        let (_, value) = alpha_beta(&next, plies - 1, side.other(), alpha, beta, child, stats);
        best.fold(value, column, index);
        if best.tighten(&mut alpha, &mut beta) {
            break;
        }
    }
    best.finish(node)
}

/// Expectiminimax where every move may drift one column to either side
///
/// Each legal move becomes a chance node whose value is the
/// probability-weighted sum of its outcomes (see [`CHANCE_OUTCOMES`]). The
/// decision layers prune across their chance children like [`alpha_beta`];
/// chance nodes always evaluate every outcome.
pub fn expectiminimax(
    board: &Board,
    plies: usize,
    side: Side,
    mut alpha: Value,
    mut beta: Value,
    node: &mut SearchNode,
    stats: &mut SearchStats,
) -> (Option<usize>, Value) {
    let moves = board.legal_moves();
    if let Some(value) = leaf_value(board, &moves, plies) {
        node.score = Some(value);
        return (None, value);
    }

    let mut best = Best::new(side, moves.first().copied());
    for (index, &column) in moves.iter().enumerate() {
        let wrapper = node.add_child(column, Mover::Chance, None);
        stats.record_expansion();

        let value = chance(board, column, plies, side, alpha, beta, wrapper, stats);
        best.fold(value, column, index);
        if best.tighten(&mut alpha, &mut beta) {
            break;
        }
    }
    best.finish(node)
}

/// Resolves the drift of `side` playing `column`, returning the expected value
#[allow(clippy::too_many_arguments)]
fn chance(
    board: &Board,
    column: usize,
    plies: usize,
    side: Side,
    alpha: Value,
    beta: Value,
    wrapper: &mut SearchNode,
    stats: &mut SearchStats,
) -> Value {
    let mut expected = 0.0;
    for &(offset, probability) in CHANCE_OUTCOMES.iter() {
        let target = column as isize + offset;
        if target < 0 || target >= WIDTH as isize {
            continue;
        }
        let target = target as usize;
        let next = match board.play(target, side.player()) {
            Some(next) => next,
            None => continue,
        };

        let outcome = wrapper.add_child(target, side.other().into(), Some(probability));
        stats.record_expansion();

        let (_, value) = expectiminimax(&next, plies - 1, side.other(), alpha, beta, outcome, stats);
        expected += probability * value;
    }
    wrapper.score = Some(expected);
    expected
}

/// Searches `depth` plies ahead for the AI's best move on `board`
pub fn run_search(board: &Board, depth: usize, algorithm: Algorithm) -> SearchOutcome {
    let mut root = SearchNode::root(Mover::Maximizer);
    let mut stats = SearchStats::default();

    let (chosen_move, value) = match algorithm {
        Algorithm::Minimax => minimax(board, depth, Side::Max, &mut root, &mut stats),
        Algorithm::AlphaBeta => alpha_beta(
            board,
            depth,
            Side::Max,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &mut root,
            &mut stats,
        ),
        Algorithm::Expectiminimax => expectiminimax(
            board,
            depth,
            Side::Max,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &mut root,
            &mut stats,
        ),
    };

    debug!(
        "{} at depth {}: move {:?}, value {}, {} nodes expanded",
        algorithm, depth, chosen_move, value, stats.expanded_count
    );

    SearchOutcome {
        chosen_move,
        value,
        root,
        expanded_count: stats.expanded_count,
    }
}

/// Like [`run_search`], but searches each of the AI's moves on its own worker
///
/// Every root branch gets a fresh, infinite window, so the pruned variants do
/// not share bounds between siblings: their trees can be larger than the
/// sequential search's, and expectiminimax values can differ from it.
/// Minimax is unaffected and produces exactly the sequential result.
pub fn run_search_parallel(board: &Board, depth: usize, algorithm: Algorithm) -> SearchOutcome {
    let moves = board.legal_moves();
    if depth == 0 || moves.is_empty() {
        return run_search(board, depth, algorithm);
    }

    let branches: Vec<(usize, SearchNode, SearchStats, Value)> = moves
        .par_iter()
        .filter_map(|&column| {
            let mut stats = SearchStats::default();
            let (node, value) = root_branch(board, column, depth, algorithm, &mut stats)?;
            trace!(
                "root branch {}: value {}, {} nodes expanded",
                column + 1,
                value,
                stats.expanded_count
            );
            Some((column, node, stats, value))
        })
        .collect();

    let mut root = SearchNode::root(Mover::Maximizer);
    let mut stats = SearchStats::default();
    let mut best = Best::new(Side::Max, moves.first().copied());
    for (index, (column, node, branch_stats, value)) in branches.into_iter().enumerate() {
        root.children.push(node);
        stats.expanded_count += branch_stats.expanded_count;
        best.fold(value, column, index);
    }
    let (chosen_move, value) = best.finish(&mut root);

    debug!(
        "{} (parallel) at depth {}: move {:?}, value {}, {} nodes expanded",
        algorithm, depth, chosen_move, value, stats.expanded_count
    );

    SearchOutcome {
        chosen_move,
        value,
        root,
        expanded_count: stats.expanded_count,
    }
}

// searches the subtree below the AI playing `column` at the root
fn root_branch(
    board: &Board,
    column: usize,
    depth: usize,
    algorithm: Algorithm,
    stats: &mut SearchStats,
) -> Option<(SearchNode, Value)> {
    let mut node = SearchNode::root(Mover::Maximizer);
    let child = match algorithm {
        Algorithm::Expectiminimax => node.add_child(column, Mover::Chance, None),
        _ => node.add_child(column, Mover::Minimizer, None),
    };
    stats.record_expansion();

    let value = match algorithm {
        Algorithm::Minimax => {
            let next = board.play(column, AI)?;
            minimax(&next, depth - 1, Side::Min, child, stats).1
        }
        Algorithm::AlphaBeta => {
            let next = board.play(column, AI)?;
            alpha_beta(
                &next,
                depth - 1,
                Side::Min,
                f64::NEG_INFINITY,
                f64::INFINITY,
                child,
                stats,
            )
            .1
        }
        Algorithm::Expectiminimax => chance(
            board,
            column,
            depth,
            Side::Max,
            f64::NEG_INFINITY,
            f64::INFINITY,
            child,
            stats,
        ),
    };
    node.children.pop().map(|child| (child, value))
}
