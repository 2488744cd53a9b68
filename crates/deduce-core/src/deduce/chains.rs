//! Tier 4: strong-weak alternating chains.
//!
//! A strong-weak chain is an odd-length path whose 1st, 3rd, 5th... links
//! are strong while the rest may be either kind. Closed into a loop with
//! the strong links first, the start node must be true. Found open, any
//! node linked to both ends must be false. The open form is searched as a
//! loop too, with the link roles swapped and two extra links of slack: the
//! first node then closes the loop and is itself among the erased.

use std::collections::{BTreeMap, BTreeSet};

use crate::units::cell_dist;
use crate::Board;

use super::links::LinkGraph;
use super::trace::Step;
use super::types::{Conclusions, Node};

pub(crate) struct ChainHit {
    /// Chain nodes; for the loop form the start node repeats at the end.
    pub nodes: Vec<Node>,
    /// Per-link strength flags, aligned with consecutive node pairs.
    pub strong: Vec<bool>,
    /// Nodes to erase; empty means the start node is to be filled.
    pub erases: BTreeSet<Node>,
}

/// Search one graph for a chain conclusion.
pub(crate) fn search(graph: &LinkGraph, max_chain_length: usize) -> Option<ChainHit> {
    // Loop with odd-position links strong: the start holds.
    for start in graph.nodes() {
        if let Some((route, strong)) = odd_loop(graph, vec![start], vec![], true, max_chain_length)
        {
            let mut nodes = route.clone();
            nodes.push(route[0]);
            let mut strong = strong;
            strong.push(true);
            return Some(ChainHit {
                nodes,
                strong,
                erases: BTreeSet::new(),
            });
        }
    }
    // Loop with even-position links strong: dropping the first node leaves
    // an open chain whose two ends attack everything they share, the
    // dropped node included.
    for start in graph.nodes() {
        if let Some((route, strong)) =
            odd_loop(graph, vec![start], vec![], false, max_chain_length + 2)
        {
            let head = route[1];
            let tail = *route.last().expect("loop routes are never empty");
            let erases: BTreeSet<Node> = graph
                .affected(head)
                .intersection(&graph.affected(tail))
                .copied()
                .collect();
            return Some(ChainHit {
                nodes: route[1..].to_vec(),
                strong: strong[1..].to_vec(),
                erases,
            });
        }
    }
    None
}

/// Depth-first search for an odd loop, extending the route one link at a
/// time with the required strong/weak parity. Next nodes are tried in
/// ascending (cell distance from the tail, node) order.
fn odd_loop(
    graph: &LinkGraph,
    route: Vec<Node>,
    strong_flags: Vec<bool>,
    next_must_be_strong: bool,
    max_length: usize,
) -> Option<(Vec<Node>, Vec<bool>)> {
    if route.len() > max_length {
        return None;
    }
    let start = route[0];
    let last = *route.last().expect("routes start non-empty");
    let mut next_steps: BTreeMap<Node, bool> =
        graph.strong(last).iter().map(|&n| (n, true)).collect();
    if !next_must_be_strong {
        for &n in graph.weak(last) {
            next_steps.insert(n, false);
        }
    }
    if next_steps.contains_key(&start) && route.len() % 2 == 1 {
        return Some((route, strong_flags));
    }
    let mut order: Vec<Node> = next_steps.keys().copied().collect();
    order.sort_by_key(|&n| (cell_dist(n.0, last.0), n));
    for next in order {
        if route.contains(&next) {
            continue;
        }
        let mut longer = route.clone();
        longer.push(next);
        let mut flags = strong_flags.clone();
        flags.push(next_steps[&next]);
        if let Some(hit) = odd_loop(graph, longer, flags, !next_must_be_strong, max_length) {
            return Some(hit);
        }
    }
    None
}

/// The chain technique: per-digit graphs accumulate one batch; the
/// combined graph runs only when no single-digit chain fired.
pub(crate) fn strong_weak_chains(
    board: &Board,
    max_chain_length: usize,
    explain: bool,
) -> Conclusions {
    let mut out = Conclusions::new();
    for digit in 1..=9 {
        let graph = LinkGraph::for_digit(board, digit);
        record_hit(search(&graph, max_chain_length), Some(digit), explain, &mut out);
    }
    if !out.is_empty() {
        return out;
    }
    let graph = LinkGraph::combined(board);
    record_hit(search(&graph, max_chain_length), None, explain, &mut out);
    out
}

fn record_hit(hit: Option<ChainHit>, digit: Option<u8>, explain: bool, out: &mut Conclusions) {
    let Some(hit) = hit else { return };
    if hit.erases.is_empty() {
        out.fills.insert(hit.nodes[0]);
        if explain {
            out.steps.push(Step::ChainLoop {
                digit,
                nodes: hit.nodes,
                strong: hit.strong,
            });
        }
    } else {
        out.erases.extend(hit.erases.iter().copied());
        if explain {
            out.steps.push(Step::ChainEnds {
                digit,
                nodes: hit.nodes,
                strong: hit.strong,
                erased: hit.erases.into_iter().collect(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_triangle_fills_its_start() {
        // a == b == c == a: an odd loop of three strong links
        let (a, b, c) = ((0, 7), (4, 7), (40, 7));
        let graph = LinkGraph::from_edges(&[(a, b), (b, c), (c, a)], &[]);
        let hit = search(&graph, 5).expect("triangle should close");
        assert!(hit.erases.is_empty());
        assert_eq!(hit.nodes.first(), Some(&a));
        assert_eq!(hit.nodes.last(), Some(&a));
        assert_eq!(hit.strong, vec![true, true, true]);
    }

    #[test]
    fn open_chain_pins_common_neighbors() {
        // n0 == n1 -- n2 == n3 with x weakly linked to n0 and n3. No loop
        // with leading strong links exists; the erase variant starts at x,
        // walks the chain, and closes back to x.
        let (n0, n1, n2, n3, x) = ((0, 7), (4, 7), (22, 7), (26, 7), (8, 7));
        let graph =
            LinkGraph::from_edges(&[(n0, n1), (n2, n3)], &[(n1, n2), (x, n0), (x, n3)]);
        let hit = search(&graph, 5).expect("open chain should conclude");
        assert_eq!(hit.erases.iter().copied().collect::<Vec<_>>(), vec![x]);
        // The erase search walks the loop out of x and reaches the chain
        // through its nearer end, so the route reads tail-first.
        assert_eq!(hit.nodes, vec![n3, n2, n1, n0]);
        assert_eq!(hit.strong, vec![true, false, true]);
    }

    #[test]
    fn chain_length_is_bounded() {
        // The same shape needs 5 route nodes (x + 4); cap the loop search
        // below that and nothing may be found.
        let (n0, n1, n2, n3, x) = ((0, 7), (4, 7), (22, 7), (26, 7), (8, 7));
        let graph =
            LinkGraph::from_edges(&[(n0, n1), (n2, n3)], &[(n1, n2), (x, n0), (x, n3)]);
        assert!(search(&graph, 2).is_none());
    }

    #[test]
    fn even_cycles_do_not_fire() {
        // a == b -- c == d -- a: even length, no odd loop either way
        let (a, b, c, d) = ((0, 7), (4, 7), (40, 7), (36, 7));
        let graph = LinkGraph::from_edges(&[(a, b), (c, d)], &[(b, c), (d, a)]);
        assert!(search(&graph, 6).is_none());
    }
}
