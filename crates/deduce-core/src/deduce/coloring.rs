//! Tier 4: two-coloring of strong-link components.
//!
//! Each connected component of the strong-link graph splits into two
//! colors, exactly one of which is true. Two same-colored nodes that see
//! each other refute their color, so both go. A node outside the component
//! attacked by both colors goes either way.

use std::collections::{BTreeMap, BTreeSet};

use crate::units::cell_dist;
use crate::Board;

use super::links::LinkGraph;
use super::trace::Step;
use super::types::{Conclusions, Node};

/// Per-component coloring: component id -> node -> +id or -id. Components
/// are numbered from 1 in sorted first-node order; colors alternate by
/// breadth-first layer.
pub(crate) fn full_color_map(
    strong: &BTreeMap<Node, BTreeSet<Node>>,
) -> BTreeMap<i32, BTreeMap<Node, i32>> {
    let mut components = BTreeMap::new();
    let mut colored: BTreeSet<Node> = BTreeSet::new();
    let mut component = 1;
    for (&seed, links) in strong {
        if colored.contains(&seed) || links.is_empty() {
            continue;
        }
        let mut color_map = BTreeMap::new();
        let mut layer: BTreeSet<Node> = [seed].into();
        let mut color = component;
        while !layer.is_empty() {
            for &n in &layer {
                color_map.insert(n, color);
                colored.insert(n);
            }
            let mut next = BTreeSet::new();
            for &n in &layer {
                for &m in &strong[&n] {
                    if !colored.contains(&m) {
                        next.insert(m);
                    }
                }
            }
            layer = next;
            color = -color;
        }
        components.insert(component, color_map);
        component += 1;
    }
    components
}

/// Pairs of same-colored nodes that are linked to each other, ordered
/// (smaller, larger). Both ends of each pair are to be erased.
fn same_color_pairs(color_map: &BTreeMap<Node, i32>, graph: &LinkGraph) -> Vec<(Node, Node)> {
    let nodes: Vec<Node> = color_map.keys().copied().collect();
    let mut pairs = Vec::new();
    for (i, &n1) in nodes.iter().enumerate() {
        let affected = graph.affected(n1);
        for &n2 in &nodes[i + 1..] {
            if affected.contains(&n2) && color_map[&n2] == color_map[&n1] {
                pairs.push((n1, n2));
            }
        }
    }
    pairs
}

/// Uncolored nodes linked to both colors of the component, each with its
/// closest positive and negative witness.
fn squeezed_nodes(color_map: &BTreeMap<Node, i32>, graph: &LinkGraph) -> Vec<(Node, Node, Node)> {
    let mut result = Vec::new();
    for node in graph.nodes() {
        if color_map.contains_key(&node) {
            continue;
        }
        let affected = graph.affected(node);
        let mut witness: [Option<Node>; 2] = [None, None];
        for (&n, &color) in color_map {
            if !affected.contains(&n) {
                continue;
            }
            let side = usize::from(color > 0);
            let closer = match witness[side] {
                None => true,
                Some(prev) => cell_dist(node.0, n.0) < cell_dist(node.0, prev.0),
            };
            if closer {
                witness[side] = Some(n);
            }
        }
        if let [Some(neg), Some(pos)] = witness {
            result.push((node, pos, neg));
        }
    }
    result
}

/// The coloring technique: per-digit graphs first (all nine digits
/// accumulate into one batch), the combined graph only when none fired.
pub(crate) fn coloring(board: &Board, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    for digit in 1..=9 {
        let graph = LinkGraph::for_digit(board, digit);
        color_one_graph(&graph, Some(digit), explain, &mut out);
    }
    if !out.erases.is_empty() {
        return out;
    }
    let graph = LinkGraph::combined(board);
    color_one_graph(&graph, None, explain, &mut out);
    out
}

fn color_one_graph(graph: &LinkGraph, digit: Option<u8>, explain: bool, out: &mut Conclusions) {
    let components = full_color_map(graph.strong_map());
    let mut erased_here: BTreeSet<Node> = BTreeSet::new();
    for color_map in components.values() {
        for (n1, n2) in same_color_pairs(color_map, graph) {
            if erased_here.contains(&n1) && erased_here.contains(&n2) {
                continue;
            }
            erased_here.insert(n1);
            erased_here.insert(n2);
            out.erases.insert(n1);
            out.erases.insert(n2);
            if explain {
                out.steps.push(Step::ColorPair {
                    digit,
                    first: n1,
                    second: n2,
                });
            }
        }
        for (node, pos, neg) in squeezed_nodes(color_map, graph) {
            if erased_here.contains(&node) {
                continue;
            }
            erased_here.insert(node);
            out.erases.insert(node);
            if explain {
                out.steps.push(Step::ColorSqueeze {
                    digit,
                    node,
                    positive: pos,
                    negative: neg,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn strong_chain(nodes: &[Node]) -> BTreeMap<Node, BTreeSet<Node>> {
        let mut map: BTreeMap<Node, BTreeSet<Node>> = BTreeMap::new();
        for n in nodes {
            map.entry(*n).or_default();
        }
        for pair in nodes.windows(2) {
            map.get_mut(&pair[0]).unwrap().insert(pair[1]);
            map.get_mut(&pair[1]).unwrap().insert(pair[0]);
        }
        map
    }

    #[test]
    fn colors_alternate_along_a_chain() {
        let nodes = [(0, 5), (4, 5), (40, 5)];
        let components = full_color_map(&strong_chain(&nodes));
        assert_eq!(components.len(), 1);
        let map = &components[&1];
        assert_eq!(map[&(0, 5)], 1);
        assert_eq!(map[&(4, 5)], -1);
        assert_eq!(map[&(40, 5)], 1);
    }

    #[test]
    fn isolated_nodes_stay_uncolored() {
        let mut map = strong_chain(&[(0, 5), (4, 5)]);
        map.entry((80, 5)).or_default();
        let components = full_color_map(&map);
        assert_eq!(components.len(), 1);
        assert!(!components[&1].contains_key(&(80, 5)));
    }

    #[test]
    fn pair_rule_erases_same_color_ends() {
        // a == b == c colors +, -, +; a and c attack each other weakly
        let (a, b, c) = ((0, 5), (4, 5), (8, 5));
        let graph = LinkGraph::from_edges(&[(a, b), (b, c)], &[(a, c)]);
        let mut out = Conclusions::new();
        color_one_graph(&graph, Some(5), true, &mut out);
        assert_eq!(out.erases.iter().copied().collect::<Vec<_>>(), vec![a, c]);
        assert!(matches!(out.steps[..], [Step::ColorPair { .. }]));
    }

    #[test]
    fn squeeze_erases_node_between_colors() {
        // a == b with x weakly attacked by both
        let (a, b, x) = ((0, 5), (4, 5), (40, 5));
        let graph = LinkGraph::from_edges(&[(a, b)], &[(x, a), (x, b)]);
        let mut out = Conclusions::new();
        color_one_graph(&graph, Some(5), true, &mut out);
        assert_eq!(out.erases.iter().copied().collect::<Vec<_>>(), vec![x]);
        match out.steps[..] {
            [Step::ColorSqueeze { node, positive, negative, .. }] => {
                assert_eq!(node, x);
                assert_eq!(positive, a);
                assert_eq!(negative, b);
            }
            _ => panic!("expected a squeeze step"),
        }
    }

    #[test]
    fn squeeze_fires_on_a_sculpted_board() {
        // Digit 5 strong chain (0,0) == (1,1) == (1,8) == (8,8) built from
        // a box pair, a row pair, and a column pair. Colors: +, -, +, -.
        // The cell (8,0) keeps 5 and is weakly linked to (0,0) [+] through
        // column 0 and to (8,8) [-] through row 8.
        let mut board = Board::empty();
        for &(r, c) in &[(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            board.erase(Position::new(r, c), 5); // box 0 pair (0,0)/(1,1)
        }
        for c in [0, 2, 3, 4, 5, 6, 7] {
            board.erase(Position::new(1, c), 5); // row 1 pair (1,1)/(1,8)
        }
        for r in [0, 2, 3, 4, 5, 6, 7] {
            board.erase(Position::new(r, 8), 5); // column 8 pair (1,8)/(8,8)
        }
        let out = coloring(&board, true);
        let erases: Vec<Node> = out.erases.iter().copied().collect();
        assert_eq!(erases, vec![(72, 5)]);
        match &out.steps[..] {
            [Step::ColorSqueeze { digit, node, positive, negative }] => {
                assert_eq!(*digit, Some(5));
                assert_eq!(*node, (72, 5));
                assert_eq!(*positive, (0, 5));
                assert_eq!(*negative, (80, 5));
            }
            other => panic!("expected one squeeze step, got {other:?}"),
        }
    }
}
