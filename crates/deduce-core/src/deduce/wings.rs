//! Tier 3: XY-wings and XYZ-wings.

use crate::units::sees;
use crate::Board;

use super::index::UnitIndex;
use super::trace::Step;
use super::types::Conclusions;

/// XY-wings: a bivalue pivot {a,b} seeing two bivalue wings {a,c} and
/// {b,c} that do not see each other. One wing must hold c, so any cell
/// seeing both wings loses c. All matches are batched.
pub(crate) fn xy_wings(board: &Board, index: &UnitIndex, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    for &center in index.two_cand_cells() {
        let center_set = board.cand(center);
        let wings: Vec<usize> = index
            .two_cand_cells()
            .iter()
            .copied()
            .filter(|&w| sees(center, w) && center_set.union(board.cand(w)).count() == 3)
            .collect();
        for (a, &wing1) in wings.iter().enumerate() {
            let wing1_set = board.cand(wing1);
            for &wing2 in &wings[a + 1..] {
                let wing2_set = board.cand(wing2);
                if sees(wing1, wing2)
                    || wing1_set.union(wing2_set).count() != 3
                    || center_set.union(wing1_set).union(wing2_set).count() != 3
                {
                    continue;
                }
                let digit = wing1_set
                    .intersection(wing2_set)
                    .sole()
                    .expect("wings of a two-branch match share exactly one digit");
                let mut erased = Vec::new();
                for cell in 0..81 {
                    if sees(cell, wing1) && sees(cell, wing2) && board.cand(cell).contains(digit)
                    {
                        out.erases.insert((cell, digit));
                        erased.push(cell);
                    }
                }
                if explain && !erased.is_empty() {
                    out.steps.push(Step::XyWing {
                        center,
                        wing1,
                        wing2,
                        digit,
                        erased,
                    });
                }
            }
        }
    }
    out
}

/// XYZ-wings: a trivalue pivot {a,b,c} seeing two bivalue wings whose
/// candidates are subsets of the pivot's and that do not see each other.
/// One of the three cells holds the wings' shared digit, so cells seeing
/// all three lose it.
pub(crate) fn xyz_wings(board: &Board, index: &UnitIndex, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    for &center in index.three_cand_cells() {
        let center_set = board.cand(center);
        let wings: Vec<usize> = index
            .two_cand_cells()
            .iter()
            .copied()
            .filter(|&w| sees(center, w) && board.cand(w).is_subset(center_set))
            .collect();
        for (a, &wing1) in wings.iter().enumerate() {
            let wing1_set = board.cand(wing1);
            for &wing2 in &wings[a + 1..] {
                let wing2_set = board.cand(wing2);
                if sees(wing1, wing2) || wing1_set == wing2_set {
                    continue;
                }
                let digit = wing1_set
                    .intersection(wing2_set)
                    .sole()
                    .expect("distinct sub-pairs of a trivalue cell share exactly one digit");
                let mut erased = Vec::new();
                for cell in 0..81 {
                    if cell != center
                        && sees(cell, center)
                        && sees(cell, wing1)
                        && sees(cell, wing2)
                        && board.cand(cell).contains(digit)
                    {
                        out.erases.insert((cell, digit));
                        erased.push(cell);
                    }
                }
                if explain && !erased.is_empty() {
                    out.steps.push(Step::XyzWing {
                        center,
                        wing1,
                        wing2,
                        digit,
                        erased,
                    });
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn keep_only(board: &mut Board, pos: Position, digits: &[u8]) {
        for d in 1..=9 {
            if !digits.contains(&d) {
                board.erase(pos, d);
            }
        }
    }

    #[test]
    fn xy_wing_erases_shared_digit() {
        let mut board = Board::empty();
        keep_only(&mut board, Position::new(0, 0), &[1, 2]); // pivot
        keep_only(&mut board, Position::new(0, 4), &[1, 3]); // wing in the row
        keep_only(&mut board, Position::new(4, 0), &[2, 3]); // wing in the column
        let out = xy_wings(&board, &UnitIndex::build(&board), true);
        // Only (4,4) sees both wings and still holds 3
        assert_eq!(out.erases.iter().copied().collect::<Vec<_>>(), vec![(40, 3)]);
        assert!(matches!(
            out.steps[..],
            [Step::XyWing { center: 0, wing1: 4, wing2: 36, digit: 3, .. }]
        ));
    }

    #[test]
    fn xy_wing_needs_disjoint_wings() {
        let mut board = Board::empty();
        keep_only(&mut board, Position::new(0, 0), &[1, 2]);
        keep_only(&mut board, Position::new(0, 4), &[1, 3]);
        keep_only(&mut board, Position::new(0, 7), &[2, 3]); // same row: wings see each other
        let out = xy_wings(&board, &UnitIndex::build(&board), false);
        assert!(out.is_empty());
    }

    #[test]
    fn xyz_wing_erases_around_all_three() {
        let mut board = Board::empty();
        keep_only(&mut board, Position::new(0, 0), &[1, 2, 3]); // pivot
        keep_only(&mut board, Position::new(0, 4), &[1, 3]); // row wing
        keep_only(&mut board, Position::new(1, 1), &[2, 3]); // box wing
        let out = xyz_wings(&board, &UnitIndex::build(&board), true);
        // Cells seeing pivot, both wings, and not the pivot itself:
        // row 0 cells inside box 0, i.e. (0,1) and (0,2)
        assert_eq!(
            out.erases.iter().copied().collect::<Vec<_>>(),
            vec![(1, 3), (2, 3)]
        );
    }

    #[test]
    fn wings_leave_untouched_boards_alone() {
        let board = Board::empty();
        let index = UnitIndex::build(&board);
        assert!(xy_wings(&board, &index, false).is_empty());
        assert!(xyz_wings(&board, &index, false).is_empty());
    }
}
