//! Backtracking solver wrapping the deduction engine.
//!
//! Deduce first; when the ladder stalls, guess. The guess cell is chosen
//! by how much of the board a hypothesis there would touch, measured on
//! the strong-link components of the combined link graph. Optionally keeps
//! searching for a second solution to prove or refute uniqueness.

use std::collections::{BTreeMap, BTreeSet};

use crate::deduce::{full_color_map, DeduceOptions, Deducer, LinkGraph, Node};
use crate::Board;

/// Result of a solve: the reached state, an optional second solution, and
/// how many guesses the search spent.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Whether a solution was found.
    pub solved: bool,
    /// The solution when solved; otherwise the stalled final state.
    pub board: Board,
    /// A second, distinct solution, when multiple-checking found one.
    pub alternate: Option<Board>,
    /// Number of guesses taken across the whole search.
    pub guesses: usize,
}

/// Deduction plus scored guessing.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    deducer: Deducer,
    check_multiple: bool,
}

impl Solver {
    pub fn new() -> Self {
        Solver::default()
    }

    pub fn with_options(options: DeduceOptions) -> Self {
        Solver {
            deducer: Deducer::with_options(options),
            check_multiple: false,
        }
    }

    /// Also search for a second solution after the first.
    pub fn check_multiple(mut self, check: bool) -> Self {
        self.check_multiple = check;
        self
    }

    /// Solve a copy of the board.
    pub fn solve(&self, board: &Board) -> SolveOutcome {
        let (state, first, guesses) = self.solve_iterate(board.clone(), None, 0);
        match first {
            Some(first) => SolveOutcome {
                solved: true,
                alternate: if state.is_solved() { Some(state) } else { None },
                board: first,
                guesses,
            },
            None => SolveOutcome {
                solved: state.is_solved(),
                board: state,
                alternate: None,
                guesses,
            },
        }
    }

    /// Whether the board has exactly one solution.
    pub fn has_unique_solution(&self, board: &Board) -> bool {
        let outcome = self.clone().check_multiple(true).solve(board);
        outcome.solved && outcome.alternate.is_none()
    }

    /// Deduce; if stalled, guess the best-scored cell's candidates in
    /// ascending order. `first` carries an already-found solution while
    /// multiple-checking continues.
    fn solve_iterate(
        &self,
        mut board: Board,
        mut first: Option<Board>,
        mut guesses: usize,
    ) -> (Board, Option<Board>, usize) {
        let outcome = self.deducer.deduce(&mut board);
        if outcome.impossible || board.is_solved() {
            return (board, first, guesses);
        }
        let Some(cell) = pick_guess_cell(&board) else {
            return (board, first, guesses);
        };
        let digits: Vec<u8> = board.cand(cell).iter().collect();
        for (i, &digit) in digits.iter().enumerate() {
            if i < digits.len() - 1 {
                guesses += 1;
            }
            let mut guess = board.clone();
            guess.write_at(cell, digit);
            let (state, carried, spent) = self.solve_iterate(guess, first, guesses);
            first = carried;
            guesses = spent;
            if state.is_solved() {
                if first.is_some() || !self.check_multiple {
                    return (state, first, guesses);
                }
                first = Some(state);
            }
        }
        (board, first, guesses)
    }
}

/// The unfilled multi-candidate cell whose nodes touch the most of the
/// board, by mean node score. Colored nodes score their whole component
/// (size plus half its weak eliminations); uncolored nodes score their
/// weak links into other cells.
fn pick_guess_cell(board: &Board) -> Option<usize> {
    let graph = LinkGraph::combined(board);
    let components = full_color_map(graph.strong_map());

    let mut node_score: BTreeMap<Node, f64> = BTreeMap::new();
    for color_map in components.values() {
        let score = rate_component(color_map, &graph);
        for &node in color_map.keys() {
            node_score.insert(node, score);
        }
    }
    for node in graph.nodes() {
        node_score
            .entry(node)
            .or_insert_with(|| weak_links_elsewhere(&graph, node) as f64);
    }

    let mut best: Option<(f64, usize)> = None;
    for cell in 0..81 {
        let cands = board.cand(cell);
        if cands.count() <= 1 {
            continue;
        }
        let total: f64 = cands
            .iter()
            .map(|d| node_score.get(&(cell, d)).copied().unwrap_or(0.0))
            .sum();
        let score = total / f64::from(cands.count());
        if score > best.map_or(0.0, |(s, _)| s) {
            best = Some((score, cell));
        }
    }
    best.map(|(_, cell)| cell)
        .or_else(|| (0..81).find(|&c| board.cand(c).count() > 1))
}

/// Component worth: every colored node resolves, plus half of the weak
/// eliminations it would spray into other cells.
fn rate_component(color_map: &BTreeMap<Node, i32>, graph: &LinkGraph) -> f64 {
    let mut eliminated: BTreeSet<Node> = BTreeSet::new();
    for &node in color_map.keys() {
        for &n in graph.weak(node) {
            // In-cell hits would reward crowded cells, so skip them
            if n.0 != node.0 {
                eliminated.insert(n);
            }
        }
    }
    color_map.len() as f64 + eliminated.len() as f64 / 2.0
}

fn weak_links_elsewhere(graph: &LinkGraph, node: Node) -> usize {
    graph.weak(node).iter().filter(|&&(c, _)| c != node.0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    // Arto Inkala's board; far beyond the ladder, needs guessing
    const INKALA: &str =
        "800000000003600000070090200050007000000045700000100030001000068008500010090000400";

    #[test]
    fn solves_without_guessing_when_deduction_suffices() {
        let board = Board::from_string(EASY).unwrap();
        let outcome = Solver::new().solve(&board);
        assert!(outcome.solved);
        assert!(outcome.board.is_solved());
        assert_eq!(outcome.guesses, 0);
    }

    #[test]
    fn unique_solution_is_detected() {
        let board = Board::from_string(EASY).unwrap();
        assert!(Solver::new().has_unique_solution(&board));
    }

    #[test]
    fn empty_board_has_many_solutions() {
        let board = Board::empty();
        let outcome = Solver::new().check_multiple(true).solve(&board);
        assert!(outcome.solved);
        assert!(outcome.alternate.is_some());
        assert_ne!(outcome.board, outcome.alternate.unwrap());
    }

    #[test]
    fn cracks_a_hard_board_by_guessing() {
        let board = Board::from_string(INKALA).unwrap();
        let outcome = Solver::new().solve(&board);
        assert!(outcome.solved);
        assert!(outcome.board.is_solved());
        // The original givens survive into the solution
        for (i, c) in INKALA.chars().enumerate() {
            if c != '0' {
                assert_eq!(
                    outcome.board.to_string().as_bytes()[i],
                    c as u8,
                    "given at {i} changed"
                );
            }
        }
    }

    #[test]
    fn contradictory_boards_do_not_solve() {
        // Two 5s in the first row
        let s = format!("55{}", "0".repeat(79));
        let board = Board::from_string(&s).unwrap();
        let outcome = Solver::new().solve(&board);
        assert!(!outcome.solved);
    }
}
