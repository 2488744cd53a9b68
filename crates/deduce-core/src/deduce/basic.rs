//! Tier 1: naked singles, hidden singles, and locked candidates.

use crate::units::{box_of, BOX_BASE, COL_BASE, ROW_BASE};
use crate::Board;

use super::index::UnitIndex;
use super::trace::Step;
use super::types::Conclusions;

/// Naked and hidden singles, collected into one fill batch: cells with a
/// single candidate left, then digits with a single possible cell per unit.
pub(crate) fn singles(board: &Board, index: &UnitIndex, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    for cell in 0..81 {
        if board.filled_at(cell) {
            continue;
        }
        if let Some(digit) = board.cand(cell).sole() {
            if out.fills.insert((cell, digit)) && explain {
                out.steps.push(Step::NakedSingle { cell, digit });
            }
        }
    }
    for unit in 0..27 {
        for digit in 1..=9 {
            let cells = index.cells_with(unit, digit);
            if let [cell] = cells[..] {
                if !board.filled_at(cell) && out.fills.insert((cell, digit)) && explain {
                    out.steps.push(Step::HiddenSingle { cell, digit, unit });
                }
            }
        }
    }
    out
}

/// Locked candidates. First pass: a digit confined to one line inside a box
/// claims that line, erasing it from the line's other cells. Second and
/// third passes: a digit confined to one box inside a row (then a column)
/// claims the box. Each pass returns its own results before the next runs.
pub(crate) fn locked_candidates(index: &UnitIndex, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    for bx in BOX_BASE..BOX_BASE + 9 {
        for digit in 1..=9 {
            let cells = index.cells_with(bx, digit);
            if cells.len() <= 1 {
                continue;
            }
            let line = if cells.iter().all(|&c| c / 9 == cells[0] / 9) {
                Some(ROW_BASE + cells[0] / 9)
            } else if cells.iter().all(|&c| c % 9 == cells[0] % 9) {
                Some(COL_BASE + cells[0] % 9)
            } else {
                None
            };
            if let Some(line) = line {
                let erased = erase_outside(index, line, digit, &cells, &mut out);
                if explain && !erased.is_empty() {
                    out.steps.push(Step::BoxLine {
                        bx,
                        digit,
                        line,
                        erased,
                    });
                }
            }
        }
    }
    if !out.erases.is_empty() {
        return out;
    }
    for lines in [ROW_BASE..COL_BASE, COL_BASE..BOX_BASE] {
        for line in lines {
            for digit in 1..=9 {
                let cells = index.cells_with(line, digit);
                if cells.len() <= 1 {
                    continue;
                }
                let bx = box_of(cells[0]);
                if cells.iter().all(|&c| box_of(c) == bx) {
                    let erased = erase_outside(index, BOX_BASE + bx, digit, &cells, &mut out);
                    if explain && !erased.is_empty() {
                        out.steps.push(Step::LineBox {
                            line,
                            digit,
                            bx: BOX_BASE + bx,
                            erased,
                        });
                    }
                }
            }
        }
        if !out.erases.is_empty() {
            return out;
        }
    }
    out
}

/// Erase `digit` from the carriers of `unit` outside `keep`; returns the
/// cells actually hit.
fn erase_outside(
    index: &UnitIndex,
    unit: usize,
    digit: u8,
    keep: &[usize],
    out: &mut Conclusions,
) -> Vec<usize> {
    let mut erased = Vec::new();
    for cell in index.cells_with(unit, digit) {
        if !keep.contains(&cell) {
            out.erases.insert((cell, digit));
            erased.push(cell);
        }
    }
    erased
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn conclude_singles(board: &Board) -> Conclusions {
        singles(board, &UnitIndex::build(board), true)
    }

    #[test]
    fn finds_naked_single() {
        let mut board = Board::empty();
        for d in 1..=8 {
            board.erase(Position::new(3, 7), d);
        }
        let out = conclude_singles(&board);
        assert!(out.fills.contains(&(3 * 9 + 7, 9)));
    }

    #[test]
    fn finds_hidden_single() {
        let mut board = Board::empty();
        // 6 survives only at (0, 3) within row 0
        for col in 0..9 {
            if col != 3 {
                board.erase(Position::new(0, col), 6);
            }
        }
        let out = conclude_singles(&board);
        assert_eq!(out.fills.iter().copied().collect::<Vec<_>>(), vec![(3, 6)]);
        assert!(out
            .steps
            .iter()
            .any(|s| matches!(s, Step::HiddenSingle { cell: 3, digit: 6, .. })));
    }

    #[test]
    fn box_claims_line() {
        let mut board = Board::empty();
        // In box 0, 7 only in row 0 (cells (0,0), (0,1), (0,2))
        for &(r, c) in &[(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)] {
            board.erase(Position::new(r, c), 7);
        }
        let out = locked_candidates(&UnitIndex::build(&board), true);
        let expected: Vec<_> = (3..9).map(|col| (col, 7)).collect();
        assert_eq!(out.erases.iter().copied().collect::<Vec<_>>(), expected);
        assert!(out.fills.is_empty());
    }

    #[test]
    fn line_claims_box() {
        let mut board = Board::empty();
        // In row 4, 2 only in box 4 (cells (4,3), (4,4), (4,5))
        for col in [0, 1, 2, 6, 7, 8] {
            board.erase(Position::new(4, col), 2);
        }
        let out = locked_candidates(&UnitIndex::build(&board), true);
        // Rest of box 4: rows 3 and 5, columns 3..6
        let expected: Vec<_> = [27 + 3, 27 + 4, 27 + 5, 45 + 3, 45 + 4, 45 + 5]
            .iter()
            .map(|&c| (c, 2))
            .collect();
        assert_eq!(out.erases.iter().copied().collect::<Vec<_>>(), expected);
    }
}
