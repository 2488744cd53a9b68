//! Strong and weak link graphs over candidate nodes.
//!
//! A node is a (cell, digit) pair where the digit is a candidate of an
//! unfilled cell with at least two candidates. Within a unit, the two sole
//! carriers of a digit are strongly linked (exactly one of them is true);
//! three or more carriers are pairwise weakly linked (at most one is true).
//! The combined graph adds the in-cell links: a bivalue cell's two nodes
//! are strong, a wider cell's nodes pairwise weak.

use std::collections::{BTreeMap, BTreeSet};

use crate::units::unit_cells;
use crate::Board;

use super::types::Node;

/// Symmetric strong/weak adjacency, keyed by every node of the graph so
/// that iteration follows the sorted (cell, digit) order.
pub(crate) struct LinkGraph {
    strong: BTreeMap<Node, BTreeSet<Node>>,
    weak: BTreeMap<Node, BTreeSet<Node>>,
}

impl LinkGraph {
    /// Single-digit graph: unit links only.
    pub fn for_digit(board: &Board, digit: u8) -> Self {
        let nodes: BTreeSet<Node> = (0..81)
            .filter(|&c| board.cand(c).count() > 1 && board.cand(c).contains(digit))
            .map(|c| (c, digit))
            .collect();
        let mut graph = LinkGraph::with_nodes(&nodes);
        for unit in 0..27 {
            let unit_nodes: Vec<Node> = unit_cells(unit)
                .iter()
                .filter_map(|&c| nodes.get(&(c, digit)).copied())
                .collect();
            graph.link_group(&unit_nodes);
        }
        graph
    }

    /// All-digits graph: the nine single-digit graphs plus in-cell links.
    pub fn combined(board: &Board) -> Self {
        let mut graph = LinkGraph {
            strong: BTreeMap::new(),
            weak: BTreeMap::new(),
        };
        for digit in 1..=9 {
            let per = LinkGraph::for_digit(board, digit);
            graph.strong.extend(per.strong);
            graph.weak.extend(per.weak);
        }
        for cell in 0..81 {
            let cands = board.cand(cell);
            if cands.count() > 1 {
                let cell_nodes: Vec<Node> = cands.iter().map(|d| (cell, d)).collect();
                graph.link_group(&cell_nodes);
            }
        }
        graph
    }

    fn with_nodes(nodes: &BTreeSet<Node>) -> Self {
        let strong = nodes.iter().map(|&n| (n, BTreeSet::new())).collect();
        let weak = nodes.iter().map(|&n| (n, BTreeSet::new())).collect();
        LinkGraph { strong, weak }
    }

    /// Link a group of mutually exclusive nodes: a pair becomes a strong
    /// link, a larger group pairwise weak links.
    fn link_group(&mut self, group: &[Node]) {
        if group.len() < 2 {
            return;
        }
        for &node in group {
            let others = group.iter().copied().filter(|&n| n != node);
            if group.len() == 2 {
                self.strong.entry(node).or_default().extend(others);
            } else {
                self.weak.entry(node).or_default().extend(others);
            }
        }
    }

    /// All nodes, in sorted (cell, digit) order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.strong.keys().copied()
    }

    pub fn strong(&self, node: Node) -> &BTreeSet<Node> {
        &self.strong[&node]
    }

    pub fn weak(&self, node: Node) -> &BTreeSet<Node> {
        &self.weak[&node]
    }

    pub fn strong_map(&self) -> &BTreeMap<Node, BTreeSet<Node>> {
        &self.strong
    }

    /// Everything a node intersects: its strong and weak neighbors.
    pub fn affected(&self, node: Node) -> BTreeSet<Node> {
        self.strong(node).union(self.weak(node)).copied().collect()
    }

    /// Test-only: build a graph from explicit symmetric edge lists.
    #[cfg(test)]
    pub fn from_edges(strong_edges: &[(Node, Node)], weak_edges: &[(Node, Node)]) -> Self {
        let nodes: BTreeSet<Node> = strong_edges
            .iter()
            .chain(weak_edges)
            .flat_map(|&(a, b)| [a, b])
            .collect();
        let mut graph = LinkGraph::with_nodes(&nodes);
        for &(a, b) in strong_edges {
            graph.strong.get_mut(&a).unwrap().insert(b);
            graph.strong.get_mut(&b).unwrap().insert(a);
        }
        for &(a, b) in weak_edges {
            graph.weak.get_mut(&a).unwrap().insert(b);
            graph.weak.get_mut(&b).unwrap().insert(a);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    /// Erase `digit` from every cell of the row except the given columns.
    fn confine_in_row(board: &mut Board, row: usize, digit: u8, keep: &[usize]) {
        for col in 0..9 {
            if !keep.contains(&col) {
                board.erase(Position::new(row, col), digit);
            }
        }
    }

    #[test]
    fn conjugate_pair_is_strong() {
        let mut board = Board::empty();
        confine_in_row(&mut board, 0, 7, &[2, 5]);
        let graph = LinkGraph::for_digit(&board, 7);
        assert!(graph.strong((2, 7)).contains(&(5, 7)));
        assert!(graph.strong((5, 7)).contains(&(2, 7)));
        // Columns still carry 7 in many cells, so those links are weak
        assert!(graph.weak((2, 7)).iter().any(|&(c, _)| c % 9 == 2));
    }

    #[test]
    fn wide_groups_are_weak() {
        let mut board = Board::empty();
        confine_in_row(&mut board, 0, 7, &[0, 4, 8]);
        let graph = LinkGraph::for_digit(&board, 7);
        assert!(graph.strong((0, 7)).is_empty() || !graph.strong((0, 7)).contains(&(4, 7)));
        assert!(graph.weak((0, 7)).contains(&(4, 7)));
        assert!(graph.weak((0, 7)).contains(&(8, 7)));
    }

    #[test]
    fn combined_adds_bivalue_cell_links() {
        let mut board = Board::empty();
        for d in 3..=9 {
            board.erase(Position::new(4, 4), d);
        }
        let graph = LinkGraph::combined(&board);
        assert!(graph.strong((40, 1)).contains(&(40, 2)));
        assert!(graph.strong((40, 2)).contains(&(40, 1)));
    }

    #[test]
    fn filled_cells_have_no_nodes() {
        let mut board = Board::empty();
        board.write(Position::new(0, 0), 3);
        let graph = LinkGraph::combined(&board);
        assert!(graph.nodes().all(|(c, _)| c != 0));
    }
}
