//! Puzzle generation targeted at difficulty levels.
//!
//! Grow a puzzle by writing random candidates into an empty board, keeping
//! every intermediate state solvable, until deduction alone solves it at
//! one of the target levels. Then strip givens that the capped engine can
//! re-derive, as long as the puzzle stays uniquely solvable.

use std::collections::BTreeSet;

use crate::deduce::{DeduceOptions, Deducer};
use crate::{Board, Solver};

/// Difficulty-targeted generator with a seedable PRNG.
pub struct Generator {
    targets: BTreeSet<u8>,
    rng: Pcg,
    deducer: Deducer,
    solver: Solver,
}

impl Generator {
    /// Target the given difficulty levels; values outside 1..=5 are
    /// ignored. Seeded from the operating system.
    pub fn new<I: IntoIterator<Item = u8>>(targets: I) -> Self {
        Generator::with_rng(targets, Pcg::from_entropy())
    }

    /// Deterministic generator for reproducible puzzles.
    pub fn with_seed<I: IntoIterator<Item = u8>>(targets: I, seed: u64) -> Self {
        Generator::with_rng(targets, Pcg::with_seed(seed))
    }

    fn with_rng<I: IntoIterator<Item = u8>>(targets: I, rng: Pcg) -> Self {
        let mut targets: BTreeSet<u8> =
            targets.into_iter().filter(|l| (1..=5).contains(l)).collect();
        if targets.is_empty() {
            targets = (1..=5).collect();
        }
        Generator {
            targets,
            rng,
            deducer: Deducer::new(),
            solver: Solver::new().check_multiple(true),
        }
    }

    /// Generate a puzzle whose difficulty lands in the target set.
    /// Returns (puzzle, solution, level).
    pub fn generate(&mut self) -> (Board, Board, u8) {
        loop {
            if let Some((puzzle, solution, level)) = self.grow(Board::empty()) {
                let puzzle = self.strip_redundant_givens(puzzle, level);
                return (puzzle, solution, level);
            }
        }
    }

    /// One growth attempt: deduce, and if unsolved write a random
    /// candidate into a random cell and recurse while the board stays
    /// uniquely or multiply solvable.
    fn grow(&mut self, board: Board) -> Option<(Board, Board, u8)> {
        let mut deduced = board.clone();
        let outcome = self.deducer.deduce(&mut deduced);
        if outcome.impossible {
            return None;
        }
        if deduced.is_solved() {
            return self
                .targets
                .contains(&outcome.level)
                .then(|| (board, deduced, outcome.level));
        }
        let open: Vec<usize> = (0..81).filter(|&c| !deduced.filled_at(c)).collect();
        let cell = open[self.rng.below(open.len())];
        let mut digits: Vec<u8> = board.cand(cell).iter().collect();
        self.rng.shuffle(&mut digits);
        for digit in digits {
            let mut grown = board.clone();
            grown.write_at(cell, digit);
            let solve = self.solver.solve(&grown);
            if !solve.solved {
                continue;
            }
            if solve.alternate.is_some() {
                if let Some(result) = self.grow(grown) {
                    return Some(result);
                }
            } else {
                // Accept only boards that fall to deduction outright; a
                // stalled board reports the level it reached, not one it
                // earned
                let mut worked = grown.clone();
                let outcome = self.deducer.deduce(&mut worked);
                if worked.is_solved() && self.targets.contains(&outcome.level) {
                    return Some((grown, solve.board, outcome.level));
                }
            }
        }
        None
    }

    /// Drop givens one at a time, in random order, keeping each removal
    /// only while the level-capped engine still solves the whole puzzle
    /// (which also keeps the solution unique).
    fn strip_redundant_givens(&mut self, puzzle: Board, level: u8) -> Board {
        let capped = Deducer::with_options(DeduceOptions {
            max_difficulty_level: level,
            ..DeduceOptions::default()
        });
        let mut puzzle = puzzle;
        loop {
            let mut givens: Vec<usize> = (0..81).filter(|&c| puzzle.filled_at(c)).collect();
            self.rng.shuffle(&mut givens);
            let mut reduced = false;
            for cell in givens {
                let mut matrix = puzzle.to_matrix();
                matrix[cell / 9][cell % 9] = 0;
                let rows: Vec<Vec<u8>> = matrix.iter().map(|r| r.to_vec()).collect();
                let candidate =
                    Board::from_matrix(&rows).expect("a 9x9 matrix stays a 9x9 matrix");
                let mut worked = candidate.clone();
                capped.deduce(&mut worked);
                if !worked.is_solved() {
                    continue;
                }
                puzzle = candidate;
                reduced = true;
                break;
            }
            if !reduced {
                return puzzle;
            }
        }
    }
}

/// Small PCG-style generator, seeded from the OS so generation works the
/// same on native and wasm targets.
struct Pcg {
    state: u64,
}

impl Pcg {
    fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        if getrandom::getrandom(&mut bytes).is_err() {
            // Entropy source unavailable; fall back to a process counter
            use std::sync::atomic::{AtomicU64, Ordering};
            static COUNTER: AtomicU64 = AtomicU64::new(0x9E37_79B9);
            bytes = COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes();
        }
        Pcg::with_seed(u64::from_le_bytes(bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Pcg {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next_u32() as usize) % bound
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            items.swap(i, self.below(i + 1));
        }
    }
}
