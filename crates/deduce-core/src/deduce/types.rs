use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::Position;

use super::trace::Step;

/// Default search length for strong-weak chains.
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 5;
/// Default propagation depth for two-way forks.
pub const DEFAULT_MAX_DERIVATION_DEPTH: usize = 2;

/// A candidate digit at a cell: `(linear cell index, digit)`. Nodes are the
/// vertices of the strong/weak link graphs.
pub type Node = (usize, u8);

/// A reasoning assertion about a cell: `(cell, digit, positive)`. Positive
/// means the cell must be the digit; negative means it cannot be. The
/// impossible event, a cell left with no candidates, uses digit 0.
pub type Event = (usize, u8, bool);

/// Tuning knobs for a deduction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduceOptions {
    /// Maximum strong-weak chain length to search (the erase variant is
    /// allowed two more links).
    pub max_chain_length: usize,
    /// Maximum number of propagation rounds in a two-way fork.
    pub max_derivation_depth: usize,
    /// Hardest technique tier allowed to run, 1..=5.
    pub max_difficulty_level: u8,
    /// Collect structured step records for narration.
    pub explain: bool,
}

impl Default for DeduceOptions {
    fn default() -> Self {
        DeduceOptions {
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            max_derivation_depth: DEFAULT_MAX_DERIVATION_DEPTH,
            max_difficulty_level: 5,
            explain: false,
        }
    }
}

/// Result of a deduction run.
#[derive(Debug, Clone, Serialize)]
pub struct Deduction {
    /// A cell ran out of candidates; the board is contradictory.
    pub impossible: bool,
    /// The first such cell, when `impossible` is set.
    pub impossible_cell: Option<Position>,
    /// Hardest technique tier that fired, 1..=5; 0 when impossible or when
    /// the board was already solved on entry.
    pub level: u8,
    /// Applied steps in order, populated only when `explain` was set.
    pub steps: Vec<Step>,
}

impl Deduction {
    /// The steps rendered as English sentences.
    pub fn narrative(&self) -> Vec<String> {
        self.steps.iter().map(Step::to_string).collect()
    }
}

/// Difficulty labels for the 0..=5 level scale. Presentation only; the
/// level number is the engine's actual metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Unrated,
    Easy,
    Medium,
    Hard,
    VeryHard,
    Hardest,
}

impl Difficulty {
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => Difficulty::Easy,
            2 => Difficulty::Medium,
            3 => Difficulty::Hard,
            4 => Difficulty::VeryHard,
            5 => Difficulty::Hardest,
            _ => Difficulty::Unrated,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Difficulty::Unrated => 0,
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::VeryHard => 4,
            Difficulty::Hardest => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Unrated => "",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very hard",
            Difficulty::Hardest => "hardest",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a technique wants done to the board: a batch of fills and erases,
/// plus step records when explaining. The driver applies the whole batch
/// and restarts the ladder.
#[derive(Debug, Default)]
pub(crate) struct Conclusions {
    pub fills: BTreeSet<Node>,
    pub erases: BTreeSet<Node>,
    pub steps: Vec<Step>,
}

impl Conclusions {
    pub fn new() -> Self {
        Conclusions::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty() && self.erases.is_empty()
    }
}
