//! Boundary errors. Parsing is the only fallible surface; contradictions
//! during deduction are ordinary return values, not errors.

use derive_more::{Display, Error};

/// Malformed board input.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseError {
    /// A board string must have exactly 81 characters.
    #[display("board string must have 81 characters, got {len}")]
    StringLength { len: usize },
    /// A board matrix must have exactly 9 rows.
    #[display("board matrix must have 9 rows, got {rows}")]
    RowCount { rows: usize },
    /// Every board matrix row must have exactly 9 columns.
    #[display("row {row} of the board matrix must have 9 columns, got {cols}")]
    ColCount { row: usize, cols: usize },
}
