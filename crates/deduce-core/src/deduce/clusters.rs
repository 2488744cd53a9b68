//! Tier 5: strong-link cluster bridges.
//!
//! Every strong-link component splits into two clusters, its color sides.
//! A weak link out of a cluster forces the opposite side of the target's
//! component: if cluster A holds, a node weak-linked from A is false, so
//! the other side of that node's component holds. Following such bridges
//! from a start cluster, reaching both sides of any one component proves
//! the start cluster false, which fills every node of its opposite side.

use std::collections::{BTreeMap, BTreeSet};

use crate::Board;

use super::coloring::full_color_map;
use super::links::LinkGraph;
use super::trace::Step;
use super::types::{Conclusions, Node};

/// A cluster: one color side of a strong-link component.
type Cluster = (i32, bool);

pub(crate) struct ClusterHit {
    pub fills: BTreeSet<Node>,
    pub start: Cluster,
    /// Component whose two sides were both reached.
    pub component: i32,
    /// Bridge lists along the two BFS routes.
    pub route_a: Vec<(Node, Node)>,
    pub route_b: Vec<(Node, Node)>,
}

pub(crate) fn search(graph: &LinkGraph) -> Option<ClusterHit> {
    let components = full_color_map(graph.strong_map());

    let mut node_cluster: BTreeMap<Node, Cluster> = BTreeMap::new();
    let mut cluster_nodes: BTreeMap<Cluster, BTreeSet<Node>> = BTreeMap::new();
    for (&component, color_map) in &components {
        cluster_nodes.insert((component, true), BTreeSet::new());
        cluster_nodes.insert((component, false), BTreeSet::new());
        for (&node, &color) in color_map {
            let cluster = (component, color > 0);
            node_cluster.insert(node, cluster);
            cluster_nodes
                .get_mut(&cluster)
                .expect("both sides were just created")
                .insert(node);
        }
    }

    // First weak link between a cluster and each implied cluster wins
    let mut bridges: BTreeMap<Cluster, BTreeMap<Cluster, (Node, Node)>> = BTreeMap::new();
    for color_map in components.values() {
        for &node in color_map.keys() {
            let from = node_cluster[&node];
            for &linked in graph.weak(node) {
                if let Some(&(component, positive)) = node_cluster.get(&linked) {
                    let implied = (component, !positive);
                    bridges
                        .entry(from)
                        .or_default()
                        .entry(implied)
                        .or_insert((node, linked));
                }
            }
        }
    }

    for (&start, _) in &cluster_nodes {
        // Layered BFS over clusters through the bridge edges
        let mut seen: BTreeSet<Cluster> = BTreeSet::new();
        let mut prev: BTreeMap<Cluster, Cluster> = BTreeMap::new();
        let mut frontier: BTreeSet<Cluster> = [start].into();
        while !frontier.is_empty() {
            seen.extend(frontier.iter().copied());
            let mut next = BTreeSet::new();
            for &cluster in &frontier {
                if let Some(out_edges) = bridges.get(&cluster) {
                    for &target in out_edges.keys() {
                        if !seen.contains(&target) {
                            next.insert(target);
                            prev.entry(target).or_insert(cluster);
                        }
                    }
                }
            }
            frontier = next;
        }
        for &(component, positive) in &seen {
            if !seen.contains(&(component, !positive)) {
                continue;
            }
            // Both sides of `component` follow from `start`: contradiction
            let fills = cluster_nodes[&(start.0, !start.1)].clone();
            let walk_back = |mut cluster: Cluster| {
                let mut route = Vec::new();
                while let Some(&from) = prev.get(&cluster) {
                    route.push(bridges[&from][&cluster]);
                    cluster = from;
                }
                route.reverse();
                route
            };
            return Some(ClusterHit {
                fills,
                start,
                component,
                route_a: walk_back((component, positive)),
                route_b: walk_back((component, !positive)),
            });
        }
    }
    None
}

/// The cluster technique runs on the combined graph only.
pub(crate) fn cluster_bridges(board: &Board, explain: bool) -> Conclusions {
    let mut out = Conclusions::new();
    let graph = LinkGraph::combined(board);
    if let Some(hit) = search(&graph) {
        out.fills.extend(hit.fills.iter().copied());
        if explain {
            out.steps.push(Step::ClusterContradiction {
                start: hit.start,
                component: hit.component,
                route_a: hit.route_a,
                route_b: hit.route_b,
                fills: hit.fills.into_iter().collect(),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridged_components_force_a_fill() {
        // Components A = {a1 == a2} and B = {b1 == b2}. Weak links from a1
        // to both b1 and b2 imply both sides of B whenever a1's cluster
        // holds, so a1's cluster is false and a2's side is filled.
        let (a1, a2, b1, b2) = ((0, 5), (4, 5), (40, 5), (44, 5));
        let graph = LinkGraph::from_edges(&[(a1, a2), (b1, b2)], &[(a1, b1), (a1, b2)]);
        let hit = search(&graph).expect("bridges should contradict");
        assert_eq!(hit.start, (1, true));
        assert_eq!(hit.fills.iter().copied().collect::<Vec<_>>(), vec![a2]);
        // The smallest doubly-reached component is the start's own: its
        // false side comes back through B. One route walks two bridges,
        // the other is the start itself.
        assert_eq!(hit.component, 1);
        assert_eq!(hit.route_a, vec![(a1, b1), (b2, a1)]);
        assert!(hit.route_b.is_empty());
    }

    #[test]
    fn single_component_has_no_bridges() {
        let (a1, a2) = ((0, 5), (4, 5));
        let graph = LinkGraph::from_edges(&[(a1, a2)], &[]);
        assert!(search(&graph).is_none());
    }

    #[test]
    fn opposite_colors_reached_is_consistent() {
        // A weak link a1 -- b1 only implies B's opposite side; no
        // contradiction from any start.
        let (a1, a2, b1, b2) = ((0, 5), (4, 5), (40, 5), (44, 5));
        let graph = LinkGraph::from_edges(&[(a1, a2), (b1, b2)], &[(a1, b1)]);
        assert!(search(&graph).is_none());
    }
}
