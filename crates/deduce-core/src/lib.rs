//! Sudoku engine that solves and grades puzzles by layered logical
//! deduction instead of brute-force search.
//!
//! The heart of the crate is [`Deducer`]: a staged reasoner over a
//! candidate-set [`Board`] that applies a strictly ordered ladder of
//! techniques, from direct singles up to coloring, strong-weak chains,
//! two-way forks, and strong-link cluster contradictions. The hardest
//! technique tier that fired (1..=5) is the puzzle's difficulty; that
//! single number drives both grading and generation.
//!
//! Around the engine sit two clients of its contract: [`Solver`], which
//! backtracks with scored guesses once deduction stalls, and
//! [`Generator`], which grows puzzles targeted at a set of difficulty
//! levels and then strips unnecessary givens.

mod board;
pub mod deduce;
mod digit_set;
mod error;
mod generator;
mod position;
mod solver;
mod units;

pub use board::Board;
pub use deduce::{DeduceOptions, Deducer, Deduction, Difficulty, Step};
pub use digit_set::DigitSet;
pub use error::ParseError;
pub use generator::Generator;
pub use position::Position;
pub use solver::{SolveOutcome, Solver};
