//! Tier 2: full subsets within units, and fish patterns across lines.
//!
//! Both are the same search over a many-to-many map: find the smallest key
//! sets whose value union is exactly as large as the key set. For units the
//! keys are cells (naked) or digits (hidden); for fish the keys are base
//! lines and the values cover lines.

use crate::units::{BOX_BASE, COL_BASE, ROW_BASE};
use crate::Board;

use super::index::UnitIndex;
use super::trace::Step;
use super::types::Conclusions;

/// Smallest full subsets of a many-to-many map, as (keys, value union)
/// pairs. Keys with fewer than two values are ignored; subset sizes range
/// over 2..=min(n - 1, max_size) where n counts the surviving keys. All
/// subsets of the smallest size that admits one are returned.
fn minimal_full_subsets(entries: &[(usize, u16)], max_size: usize) -> Vec<(Vec<usize>, u16)> {
    let live: Vec<(usize, u16)> = entries
        .iter()
        .filter(|&&(_, v)| v.count_ones() > 1)
        .copied()
        .collect();
    let n = live.len();
    let cap = max_size.min(n.saturating_sub(1));
    for size in 2..=cap {
        let mut found = Vec::new();
        for combo in combinations(n, size) {
            let union = combo.iter().fold(0u16, |acc, &i| acc | live[i].1);
            if union.count_ones() as usize == size {
                found.push((combo.iter().map(|&i| live[i].0).collect(), union));
            }
        }
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// All size-`k` index combinations of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut combo: Vec<usize> = (0..k).collect();
    if k == 0 || k > n {
        return out;
    }
    loop {
        out.push(combo.clone());
        // Advance the rightmost index that still has room
        let mut i = k;
        while i > 0 {
            i -= 1;
            if combo[i] != i + n - k {
                combo[i] += 1;
                for j in i + 1..k {
                    combo[j] = combo[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                return out;
            }
        }
    }
}

/// Naked and hidden subsets over every unit, box units first. Six passes
/// (boxes/rows/columns, naked then hidden); the first pass that erases
/// anything wins the batch.
pub(crate) fn full_subsets(board: &Board, index: &UnitIndex, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    let unit_order = [BOX_BASE..BOX_BASE + 9, ROW_BASE..COL_BASE, COL_BASE..BOX_BASE];
    for units in unit_order.clone() {
        for unit in units {
            naked_subsets_in_unit(board, unit, explain, &mut out);
        }
        if !out.erases.is_empty() {
            return out;
        }
    }
    for units in unit_order {
        for unit in units {
            hidden_subsets_in_unit(board, index, unit, explain, &mut out);
        }
        if !out.erases.is_empty() {
            return out;
        }
    }
    out
}

fn naked_subsets_in_unit(board: &Board, unit: usize, explain: bool, out: &mut Conclusions) {
    let unit_cells = crate::units::unit_cells(unit);
    let entries: Vec<(usize, u16)> = unit_cells
        .iter()
        .map(|&c| (c, board.cand(c).bits()))
        .collect();
    for (cells, union) in minimal_full_subsets(&entries, 5) {
        let mut erased = Vec::new();
        for &cell in unit_cells.iter() {
            if cells.contains(&cell) {
                continue;
            }
            for digit in crate::DigitSet::from_bits(union)
                .intersection(board.cand(cell))
                .iter()
            {
                out.erases.insert((cell, digit));
                erased.push((cell, digit));
            }
        }
        if explain && !erased.is_empty() {
            out.steps.push(Step::NakedSubset {
                unit,
                cells,
                digits: crate::DigitSet::from_bits(union).iter().collect(),
                erased,
            });
        }
    }
}

fn hidden_subsets_in_unit(
    board: &Board,
    index: &UnitIndex,
    unit: usize,
    explain: bool,
    out: &mut Conclusions,
) {
    let entries: Vec<(usize, u16)> = (1..=9u8)
        .map(|d| (d as usize, index.slot_mask(unit, d)))
        .filter(|&(_, mask)| mask != 0)
        .collect();
    let max_size = entries.len().div_ceil(2);
    let unit_cells = crate::units::unit_cells(unit);
    for (digits, slot_union) in minimal_full_subsets(&entries, max_size) {
        let digit_set: crate::DigitSet = digits.iter().map(|&d| d as u8).collect();
        let mut erased = Vec::new();
        let mut cells = Vec::new();
        for slot in 0..9 {
            if slot_union & (1 << slot) == 0 {
                continue;
            }
            let cell = unit_cells[slot];
            cells.push(cell);
            for digit in board.cand(cell).difference(digit_set).iter() {
                out.erases.insert((cell, digit));
                erased.push((cell, digit));
            }
        }
        if explain && !erased.is_empty() {
            out.steps.push(Step::HiddenSubset {
                unit,
                digits: digit_set.iter().collect(),
                cells,
                erased,
            });
        }
    }
}

/// Fish of sizes 2..=5 per digit: base rows confining the digit to equally
/// many cover columns erase it from those columns' other rows, then the
/// same with rows and columns swapped. Row-based hits win the batch.
pub(crate) fn fish(index: &UnitIndex, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    for rows_as_base in [true, false] {
        for digit in 1..=9 {
            fish_for_digit(index, digit, rows_as_base, explain, &mut out);
        }
        if !out.erases.is_empty() {
            return out;
        }
    }
    out
}

fn fish_for_digit(
    index: &UnitIndex,
    digit: u8,
    rows_as_base: bool,
    explain: bool,
    out: &mut Conclusions,
) {
    let (base_offset, cover_offset) = if rows_as_base {
        (ROW_BASE, COL_BASE)
    } else {
        (COL_BASE, ROW_BASE)
    };
    // A base line's slot mask indexes the crossing lines directly: row
    // units are laid out by column and column units by row.
    let entries: Vec<(usize, u16)> = (0..9)
        .map(|line| (line, index.slot_mask(base_offset + line, digit)))
        .filter(|&(_, mask)| mask != 0)
        .collect();
    let max_size = entries.len().div_ceil(2);
    for (bases, cover_mask) in minimal_full_subsets(&entries, max_size) {
        let covers: Vec<usize> = (0..9).filter(|i| cover_mask & (1 << i) != 0).collect();
        let mut erased = Vec::new();
        for &cover in &covers {
            for cell in index.cells_with(cover_offset + cover, digit) {
                let base_line = if rows_as_base { cell / 9 } else { cell % 9 };
                if !bases.contains(&base_line) {
                    out.erases.insert((cell, digit));
                    erased.push(cell);
                }
            }
        }
        if explain && !erased.is_empty() {
            out.steps.push(Step::Fish {
                digit,
                rows_as_base,
                bases: bases.clone(),
                covers,
                erased,
            });
        }
    }
}
