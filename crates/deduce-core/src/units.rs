//! Grid topology: the 27 units (rows, columns, boxes) and cell incidence.
//!
//! Unit index convention: 0..9 = rows, 9..18 = columns, 18..27 = boxes.

pub(crate) const ROW_BASE: usize = 0;
pub(crate) const COL_BASE: usize = 9;
pub(crate) const BOX_BASE: usize = 18;

/// Box index of a cell: `3 * (row / 3) + col / 3`.
#[inline]
pub(crate) fn box_of(idx: usize) -> usize {
    let (row, col) = (idx / 9, idx % 9);
    3 * (row / 3) + col / 3
}

/// The 9 cell indices of a unit, in row-major order within the unit.
pub(crate) fn unit_cells(unit: usize) -> [usize; 9] {
    if unit < COL_BASE {
        let row = unit;
        std::array::from_fn(|col| row * 9 + col)
    } else if unit < BOX_BASE {
        let col = unit - COL_BASE;
        std::array::from_fn(|row| row * 9 + col)
    } else {
        let b = unit - BOX_BASE;
        let (top, left) = ((b / 3) * 3, (b % 3) * 3);
        std::array::from_fn(|i| (top + i / 3) * 9 + left + i % 3)
    }
}

/// The three units a cell belongs to: row, column, box.
#[inline]
pub(crate) fn cell_units(idx: usize) -> [usize; 3] {
    [
        ROW_BASE + idx / 9,
        COL_BASE + idx % 9,
        BOX_BASE + box_of(idx),
    ]
}

/// The 20 cells sharing a unit with `idx`, excluding `idx` itself.
pub(crate) fn peers(idx: usize) -> [usize; 20] {
    let (row, col) = (idx / 9, idx % 9);
    let (top, left) = ((row / 3) * 3, (col / 3) * 3);
    let mut out = [0usize; 20];
    let mut n = 0;
    for c in 0..9 {
        if c != col {
            out[n] = row * 9 + c;
            n += 1;
        }
    }
    for r in 0..9 {
        if r != row {
            out[n] = r * 9 + col;
            n += 1;
        }
    }
    for r in top..top + 3 {
        for c in left..left + 3 {
            if r != row && c != col {
                out[n] = r * 9 + c;
                n += 1;
            }
        }
    }
    debug_assert_eq!(n, 20);
    out
}

/// Whether two cells share a row, column, or box.
#[inline]
pub(crate) fn sees(a: usize, b: usize) -> bool {
    a / 9 == b / 9 || a % 9 == b % 9 || box_of(a) == box_of(b)
}

/// Chebyshev-biased cell distance, used as a tie-break when choosing chain
/// extensions and squeeze witnesses: `10 * max(|di|, |dj|) + min(|di|, |dj|)`.
#[inline]
pub(crate) fn cell_dist(a: usize, b: usize) -> u32 {
    let di = (a / 9).abs_diff(b / 9) as u32;
    let dj = (a % 9).abs_diff(b % 9) as u32;
    10 * di.max(dj) + di.min(dj)
}

/// Human name of a unit for narratives: "row 1", "column 4", "box 9".
pub(crate) fn unit_name(unit: usize) -> String {
    if unit < COL_BASE {
        format!("row {}", unit + 1)
    } else if unit < BOX_BASE {
        format!("column {}", unit - COL_BASE + 1)
    } else {
        format!("box {}", unit - BOX_BASE + 1)
    }
}
