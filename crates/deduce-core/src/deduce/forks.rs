//! Tier 5: two-way forks.
//!
//! Try both candidates of a bivalue cell, propagating each hypothesis with
//! singles-only logic for a bounded number of rounds. A branch that empties
//! some cell's candidates proves the other digit; otherwise the conclusions
//! common to both branches hold outright. Every derived event remembers the
//! events that forced it, so the narrative can replay both derivations.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::units::{cell_units, peers};
use crate::{Board, DigitSet};

use super::index::UnitIndex;
use super::trace::Step;
use super::types::{Conclusions, Event, Node};

/// Reason and depth bookkeeping for one branch of a fork.
struct Derivation {
    /// The event that emptied a cell, when the branch is contradictory.
    impossible: Option<Event>,
    /// Every derived event mapped to the events whose negation forced it.
    reasons: BTreeMap<Event, BTreeSet<Event>>,
    /// Derivation round of each event; the hypothesis sits at depth 0.
    depths: BTreeMap<Event, usize>,
}

/// Digit-to-cells occupancy per unit, for hidden-single propagation.
fn unit_occupancy(possibility: &BTreeMap<usize, DigitSet>) -> Vec<[BTreeSet<usize>; 27]> {
    let mut occupancy: Vec<[BTreeSet<usize>; 27]> =
        (0..9).map(|_| std::array::from_fn(|_| BTreeSet::new())).collect();
    for (&cell, &cands) in possibility {
        for digit in cands.iter() {
            for unit in cell_units(cell) {
                occupancy[(digit - 1) as usize][unit].insert(cell);
            }
        }
    }
    occupancy
}

/// Propagate a hypothesis over a snapshot of the multi-candidate cells,
/// using naked and hidden singles only, for at most `max_depth` rounds.
fn derive(
    original: &BTreeMap<usize, DigitSet>,
    start: Event,
    max_depth: usize,
) -> Derivation {
    let original_occupancy = unit_occupancy(original);
    let mut possibility = original.clone();
    let mut positives: BTreeSet<Event> = [start].into();
    let mut reasons: BTreeMap<Event, BTreeSet<Event>> = BTreeMap::new();
    let mut depths: BTreeMap<Event, usize> = [(start, 0)].into();

    for _ in 0..max_depth {
        // Negative consequences of the round's positive events
        for &positive in &positives {
            let (cell, digit, _) = positive;
            let Some(&cands) = possibility.get(&cell) else { continue };
            if !cands.contains(digit) {
                continue;
            }
            let mut negatives: BTreeSet<Event> = cands
                .iter()
                .filter(|&m| m != digit)
                .map(|m| (cell, m, false))
                .collect();
            possibility.remove(&cell);
            for &peer in peers(cell).iter() {
                if let Some(set) = possibility.get_mut(&peer) {
                    if set.contains(digit) {
                        set.remove(digit);
                        negatives.insert((peer, digit, false));
                    }
                }
            }
            for negative in negatives {
                if let std::collections::btree_map::Entry::Vacant(e) = reasons.entry(negative) {
                    e.insert([positive].into());
                    depths.insert(negative, depths[&positive] + 1);
                }
            }
        }

        // A cell out of candidates ends the branch
        if let Some((&cell, _)) = possibility.iter().find(|(_, s)| s.is_empty()) {
            let impossible = (cell, 0, true);
            let source: BTreeSet<Event> =
                original[&cell].iter().map(|m| (cell, m, false)).collect();
            let depth = source.iter().map(|e| depths[e]).max().unwrap_or(0) + 1;
            reasons.insert(impossible, source);
            depths.insert(impossible, depth);
            return Derivation {
                impossible: Some(impossible),
                reasons,
                depths,
            };
        }

        // New positive events: naked singles, then hidden singles with the
        // smaller reason set winning
        let occupancy = unit_occupancy(&possibility);
        let mut fresh: BTreeMap<Event, BTreeSet<Event>> = BTreeMap::new();
        for (&cell, &cands) in &possibility {
            if let Some(digit) = cands.sole() {
                let event = (cell, digit, true);
                if !reasons.contains_key(&event) {
                    let source: BTreeSet<Event> = original[&cell]
                        .difference(cands)
                        .iter()
                        .map(|m| (cell, m, false))
                        .collect();
                    fresh.insert(event, source);
                }
            }
        }
        for digit in 1..=9u8 {
            for unit in 0..27 {
                let cells = &occupancy[(digit - 1) as usize][unit];
                if cells.len() != 1 {
                    continue;
                }
                let cell = *cells.iter().next().expect("len checked above");
                let event = (cell, digit, true);
                if reasons.contains_key(&event) {
                    continue;
                }
                let source: BTreeSet<Event> = original_occupancy[(digit - 1) as usize][unit]
                    .difference(cells)
                    .map(|&c| (c, digit, false))
                    .collect();
                // A smaller reason set makes for a tighter explanation
                let keep = fresh
                    .get(&event)
                    .is_some_and(|known| known.len() <= source.len());
                if !keep {
                    fresh.insert(event, source);
                }
            }
        }
        if fresh.is_empty() {
            break;
        }
        positives = fresh.keys().copied().collect();
        for (event, source) in fresh {
            let depth = source.iter().map(|e| depths[e]).max().unwrap_or(0) + 1;
            depths.insert(event, depth);
            reasons.insert(event, source);
        }
    }

    Derivation {
        impossible: None,
        reasons,
        depths,
    }
}

/// Replay an event's ancestry, grouped by derivation depth from the
/// hypothesis (depth 0) up to the event itself.
fn derivation_chain(
    event: Event,
    reasons: &BTreeMap<Event, BTreeSet<Event>>,
    depths: &BTreeMap<Event, usize>,
) -> Vec<Vec<Event>> {
    let mut by_depth: BTreeMap<usize, BTreeSet<Event>> = BTreeMap::new();
    let mut frontier: BTreeSet<Event> = [event].into();
    let mut seen: BTreeSet<Event> = BTreeSet::new();
    while !frontier.is_empty() {
        seen.extend(frontier.iter().copied());
        let mut next = BTreeSet::new();
        for e in frontier {
            by_depth.entry(depths[&e]).or_default().insert(e);
            if let Some(source) = reasons.get(&e) {
                for &s in source {
                    if !seen.contains(&s) {
                        next.insert(s);
                    }
                }
            }
        }
        frontier = next;
    }
    (0..=depths[&event])
        .map(|d| by_depth.remove(&d).unwrap_or_default().into_iter().collect())
        .collect()
}

enum ForkResult {
    Nothing,
    /// One branch died; fill the other digit.
    Contradiction {
        fill: Node,
        tried: u8,
        chain: Vec<Vec<Event>>,
    },
    /// Both branches agree on these events (positives only, if any).
    Agreement(Vec<(Event, Vec<Vec<Event>>, Vec<Vec<Event>>)>),
}

fn fork(board: &Board, cell: usize, max_depth: usize) -> ForkResult {
    if max_depth == 0 {
        return ForkResult::Nothing;
    }
    let snapshot: BTreeMap<usize, DigitSet> = (0..81)
        .filter(|&c| board.cand(c).count() > 1)
        .map(|c| (c, board.cand(c)))
        .collect();
    let digits: Vec<u8> = board.cand(cell).iter().collect();
    let (g1, g2) = (digits[0], digits[1]);

    let first = derive(&snapshot, (cell, g1, true), max_depth);
    if let Some(imp) = first.impossible {
        return ForkResult::Contradiction {
            fill: (cell, g2),
            tried: g1,
            chain: derivation_chain(imp, &first.reasons, &first.depths),
        };
    }
    let second = derive(&snapshot, (cell, g2, true), max_depth);
    if let Some(imp) = second.impossible {
        return ForkResult::Contradiction {
            fill: (cell, g1),
            tried: g2,
            chain: derivation_chain(imp, &second.reasons, &second.depths),
        };
    }

    let common: Vec<Event> = first
        .reasons
        .keys()
        .filter(|e| second.reasons.contains_key(*e))
        .copied()
        .collect();
    let has_positive = common.iter().any(|&(_, _, positive)| positive);
    let agreed = common
        .into_iter()
        .filter(|&(_, _, positive)| positive || !has_positive)
        .map(|event| {
            (
                event,
                derivation_chain(event, &first.reasons, &first.depths),
                derivation_chain(event, &second.reasons, &second.depths),
            )
        })
        .collect::<Vec<_>>();
    if agreed.is_empty() {
        ForkResult::Nothing
    } else {
        ForkResult::Agreement(agreed)
    }
}

/// The fork technique: bivalue cells in row-major order; the first cell
/// with any conclusion supplies the whole batch.
pub(crate) fn two_way_forks(
    board: &Board,
    index: &UnitIndex,
    max_depth: usize,
    explain: bool,
) -> Conclusions {
    let mut out = Conclusions::new();
    for &cell in index.two_cand_cells() {
        match fork(board, cell, max_depth) {
            ForkResult::Nothing => {}
            ForkResult::Contradiction { fill, tried, chain } => {
                out.fills.insert(fill);
                if explain {
                    out.steps.push(Step::ForkContradiction {
                        cell,
                        tried,
                        digit: fill.1,
                        chain,
                    });
                }
                return out;
            }
            ForkResult::Agreement(conclusions) => {
                for (event, first, second) in conclusions {
                    let (c, digit, positive) = event;
                    if positive {
                        out.fills.insert((c, digit));
                    } else {
                        out.erases.insert((c, digit));
                    }
                    if explain {
                        out.steps.push(Step::ForkAgreement {
                            cell,
                            conclusion: event,
                            first,
                            second,
                        });
                    }
                }
                return out;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn keep_only(board: &mut Board, row: usize, col: usize, digits: &[u8]) {
        for d in 1..=9 {
            if !digits.contains(&d) {
                board.erase(Position::new(row, col), d);
            }
        }
    }

    #[test]
    fn contradiction_branch_fills_the_other_digit() {
        // Assume (0,0) = 1: both (0,1) and (0,2) collapse to 3, then one
        // of them strips the other bare. So (0,0) must be 2.
        let mut board = Board::empty();
        keep_only(&mut board, 0, 0, &[1, 2]);
        keep_only(&mut board, 0, 1, &[1, 3]);
        keep_only(&mut board, 0, 2, &[1, 3]);
        let out = two_way_forks(&board, &UnitIndex::build(&board), 2, true);
        assert_eq!(out.fills.iter().copied().collect::<Vec<_>>(), vec![(0, 2)]);
        assert!(out.erases.is_empty());
        match &out.steps[..] {
            [Step::ForkContradiction { cell: 0, tried: 1, digit: 2, chain }] => {
                assert_eq!(chain[0], vec![(0, 1, true)]);
                assert!(chain.last().unwrap().iter().any(|&(_, d, _)| d == 0));
            }
            other => panic!("expected a contradiction step, got {other:?}"),
        }
    }

    #[test]
    fn depth_zero_is_inert() {
        let mut board = Board::empty();
        keep_only(&mut board, 0, 0, &[1, 2]);
        keep_only(&mut board, 0, 1, &[1, 3]);
        keep_only(&mut board, 0, 2, &[1, 3]);
        let out = two_way_forks(&board, &UnitIndex::build(&board), 0, false);
        assert!(out.is_empty());
    }

    #[test]
    fn lone_bivalue_cell_yields_no_agreement() {
        // The two branches negate disjoint digits, so nothing is common
        let mut board = Board::empty();
        keep_only(&mut board, 0, 0, &[1, 2]);
        let out = two_way_forks(&board, &UnitIndex::build(&board), 2, false);
        assert!(out.is_empty());
    }

    #[test]
    fn derivation_chain_groups_by_depth() {
        let mut reasons: BTreeMap<Event, BTreeSet<Event>> = BTreeMap::new();
        let mut depths: BTreeMap<Event, usize> = BTreeMap::new();
        let start = (0, 1, true);
        let mid = (1, 1, false);
        let end = (1, 5, true);
        depths.insert(start, 0);
        reasons.insert(mid, [start].into());
        depths.insert(mid, 1);
        reasons.insert(end, [mid].into());
        depths.insert(end, 2);
        let chain = derivation_chain(end, &reasons, &depths);
        assert_eq!(chain, vec![vec![start], vec![mid], vec![end]]);
    }
}
