//! The deduction engine: a fixed ladder of techniques over the candidate
//! state, applied to a fixed point.
//!
//! Tier 1 covers singles and locked candidates, tier 2 subsets and fish
//! (fish grades as 3), tier 3 the wings, tier 4 coloring and strong-weak
//! chains, tier 5 two-way forks and cluster bridges. Whenever a technique
//! concludes anything the batch is applied and the ladder restarts from
//! the top; the hardest tier that ever fired is the difficulty.

mod basic;
mod chains;
mod clusters;
mod coloring;
mod forks;
mod index;
mod links;
mod subsets;
mod trace;
mod types;
mod wings;

pub use trace::Step;
pub use types::{
    DeduceOptions, Deduction, Difficulty, Event, Node, DEFAULT_MAX_CHAIN_LENGTH,
    DEFAULT_MAX_DERIVATION_DEPTH,
};

pub(crate) use coloring::full_color_map;
pub(crate) use links::LinkGraph;

use crate::Board;
use index::UnitIndex;
use types::Conclusions;

/// Runs the technique ladder. Holds only the options; every call owns its
/// board and rebuilds all derived state per iteration.
#[derive(Debug, Clone, Default)]
pub struct Deducer {
    options: DeduceOptions,
}

impl Deducer {
    pub fn new() -> Self {
        Deducer::default()
    }

    pub fn with_options(options: DeduceOptions) -> Self {
        Deducer { options }
    }

    pub fn options(&self) -> &DeduceOptions {
        &self.options
    }

    /// Deduce in place until the board is solved, contradicted, or no
    /// technique within the difficulty cap fires.
    pub fn deduce(&self, board: &mut Board) -> Deduction {
        let o = &self.options;
        let explain = o.explain;
        let mut level = 0u8;
        let mut steps = Vec::new();

        loop {
            if let Some(cell) = board.impossible_cell() {
                return Deduction {
                    impossible: true,
                    impossible_cell: Some(cell),
                    level: 0,
                    steps,
                };
            }
            if board.is_solved() {
                break;
            }

            let index = UnitIndex::build(board);

            if o.max_difficulty_level >= 1 {
                if apply(board, basic::singles(board, &index, explain), &mut steps) {
                    level = level.max(1);
                    continue;
                }
                if apply(board, basic::locked_candidates(&index, explain), &mut steps) {
                    level = level.max(1);
                    continue;
                }
            }
            if o.max_difficulty_level >= 2 {
                if apply(board, subsets::full_subsets(board, &index, explain), &mut steps) {
                    level = level.max(2);
                    continue;
                }
                // The fish family lives behind the tier-2 gate but counts
                // as a harder find than the in-unit subsets.
                if apply(board, subsets::fish(&index, explain), &mut steps) {
                    level = level.max(3);
                    continue;
                }
            }
            if o.max_difficulty_level >= 3 {
                if apply(board, wings::xy_wings(board, &index, explain), &mut steps) {
                    level = level.max(3);
                    continue;
                }
                if apply(board, wings::xyz_wings(board, &index, explain), &mut steps) {
                    level = level.max(3);
                    continue;
                }
            }
            if o.max_difficulty_level >= 4 {
                if apply(board, coloring::coloring(board, explain), &mut steps) {
                    level = level.max(4);
                    continue;
                }
                let chains =
                    chains::strong_weak_chains(board, o.max_chain_length, explain);
                if apply(board, chains, &mut steps) {
                    level = level.max(4);
                    continue;
                }
            }
            if o.max_difficulty_level >= 5 {
                let forks =
                    forks::two_way_forks(board, &index, o.max_derivation_depth, explain);
                if apply(board, forks, &mut steps) {
                    level = level.max(5);
                    continue;
                }
                if apply(board, clusters::cluster_bridges(board, explain), &mut steps) {
                    level = level.max(5);
                    continue;
                }
            }
            break;
        }

        Deduction {
            impossible: false,
            impossible_cell: None,
            level,
            steps,
        }
    }

    /// Difficulty of a board: the level a full deduction of a clone
    /// reports. The board itself is untouched.
    pub fn evaluate(&self, board: &Board) -> u8 {
        let mut options = self.options.clone();
        options.explain = false;
        let mut clone = board.clone();
        Deducer::with_options(options).deduce(&mut clone).level
    }
}

/// Apply a technique's batch; true when it contained anything.
fn apply(board: &mut Board, conclusions: Conclusions, steps: &mut Vec<Step>) -> bool {
    if conclusions.is_empty() {
        return false;
    }
    for &(cell, digit) in &conclusions.fills {
        board.write_at(cell, digit);
    }
    for &(cell, digit) in &conclusions.erases {
        board.erase_at(cell, digit);
    }
    steps.extend(conclusions.steps);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    const EASY: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const EASY_SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
    const HIDDEN_SINGLES: &str =
        "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

    #[test]
    fn solves_the_classic_easy_board_at_level_one() {
        let mut board = Board::from_string(EASY).unwrap();
        let outcome = Deducer::new().deduce(&mut board);
        assert!(!outcome.impossible);
        assert!(board.is_solved());
        assert_eq!(board.to_string(), EASY_SOLUTION);
        assert_eq!(outcome.level, 1);
    }

    #[test]
    fn solves_a_hidden_singles_board_at_level_one() {
        let mut board = Board::from_string(HIDDEN_SINGLES).unwrap();
        let outcome = Deducer::new().deduce(&mut board);
        assert!(!outcome.impossible);
        assert!(board.is_solved());
        assert_eq!(outcome.level, 1);
    }

    #[test]
    fn evaluate_leaves_the_board_alone() {
        let board = Board::from_string(EASY).unwrap();
        let snapshot = board.clone();
        let level = Deducer::new().evaluate(&board);
        assert_eq!(level, 1);
        assert_eq!(board, snapshot);
        assert_eq!(Difficulty::from_level(level).label(), "easy");
    }

    #[test]
    fn deduction_is_a_fixed_point() {
        let mut board = Board::from_string(EASY).unwrap();
        let deducer = Deducer::new();
        deducer.deduce(&mut board);
        let snapshot = board.clone();
        let again = deducer.deduce(&mut board);
        assert_eq!(board, snapshot);
        assert!(!again.impossible);
        // Solved on entry reads as level 0
        assert_eq!(again.level, 0);
    }

    #[test]
    fn contradiction_reports_the_starved_cell() {
        // Row 0 holds 1..8 and column 8 a 9: (0,8) has no candidate left
        let mut s = String::from("123456780");
        s.push_str(&"0".repeat(17));
        s.push('9'); // (2,8)
        s.push_str(&"0".repeat(54));
        let mut board = Board::from_string(&s).unwrap();
        let outcome = Deducer::new().deduce(&mut board);
        assert!(outcome.impossible);
        assert_eq!(outcome.impossible_cell, Some(Position::new(0, 8)));
        assert_eq!(outcome.level, 0);
    }

    #[test]
    fn difficulty_cap_stalls_gracefully() {
        let mut board = Board::from_string(EASY).unwrap();
        let deducer = Deducer::with_options(DeduceOptions {
            max_difficulty_level: 1,
            ..DeduceOptions::default()
        });
        let outcome = deducer.deduce(&mut board);
        assert!(!outcome.impossible);
        // The classic board needs nothing past tier 1
        assert!(board.is_solved());
        assert_eq!(outcome.level, 1);
    }

    #[test]
    fn narrative_is_deterministic() {
        let deducer = Deducer::with_options(DeduceOptions {
            explain: true,
            ..DeduceOptions::default()
        });
        let mut first_board = Board::from_string(EASY).unwrap();
        let first = deducer.deduce(&mut first_board);
        let mut second_board = Board::from_string(EASY).unwrap();
        let second = deducer.deduce(&mut second_board);
        assert_eq!(first.narrative(), second.narrative());
        assert!(!first.narrative().is_empty());
    }

    #[test]
    fn candidates_only_shrink() {
        let board = Board::from_string(EASY).unwrap();
        let before: Vec<u32> = (0..81)
            .map(|i| board.candidates(Position::from_index(i)).count())
            .collect();
        let mut after_board = board.clone();
        Deducer::new().deduce(&mut after_board);
        for i in 0..81 {
            let after = after_board.candidates(Position::from_index(i)).count();
            assert!(after <= before[i]);
            assert!(after >= 1);
        }
    }
}
