//! Structured step records emitted by the engine when `explain` is set.
//!
//! Each record carries the technique's witnesses and conclusions; the
//! English sentence is a pure function of the record (`Display`), so
//! surfaces can render, serialize, or discard steps as they like.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::unit_name;
use crate::Position;

use super::types::{Event, Node};

/// One applied deduction step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Step {
    /// A cell's last remaining candidate was filled in.
    NakedSingle { cell: usize, digit: u8 },
    /// A digit with a single possible cell in a unit was filled there.
    HiddenSingle { cell: usize, digit: u8, unit: usize },
    /// Within a box, a digit's candidates all sit on one line; the digit
    /// was erased from the rest of that line.
    BoxLine {
        bx: usize,
        digit: u8,
        line: usize,
        erased: Vec<usize>,
    },
    /// Within a line, a digit's candidates all sit in one box; the digit
    /// was erased from the rest of that box.
    LineBox {
        line: usize,
        digit: u8,
        bx: usize,
        erased: Vec<usize>,
    },
    /// A set of cells whose candidates are confined to equally many digits;
    /// those digits were erased from the unit's other cells.
    NakedSubset {
        unit: usize,
        cells: Vec<usize>,
        digits: Vec<u8>,
        erased: Vec<Node>,
    },
    /// A set of digits confined to equally many cells; all other candidates
    /// were erased from those cells.
    HiddenSubset {
        unit: usize,
        digits: Vec<u8>,
        cells: Vec<usize>,
        erased: Vec<Node>,
    },
    /// A digit confined, across the base lines, to equally many cover
    /// lines; erased from the covers outside the bases.
    Fish {
        digit: u8,
        rows_as_base: bool,
        bases: Vec<usize>,
        covers: Vec<usize>,
        erased: Vec<usize>,
    },
    /// Two bivalue wings around a bivalue pivot; one wing holds the shared
    /// digit, so cells seeing both wings lose it.
    XyWing {
        center: usize,
        wing1: usize,
        wing2: usize,
        digit: u8,
        erased: Vec<usize>,
    },
    /// Two bivalue wings inside a trivalue pivot; one of the three cells
    /// holds the shared digit.
    XyzWing {
        center: usize,
        wing1: usize,
        wing2: usize,
        digit: u8,
        erased: Vec<usize>,
    },
    /// Two same-colored nodes of a strong-link component attack each other;
    /// both were erased.
    ColorPair {
        digit: Option<u8>,
        first: Node,
        second: Node,
    },
    /// An uncolored node attacked by both colors of one component.
    ColorSqueeze {
        digit: Option<u8>,
        node: Node,
        positive: Node,
        negative: Node,
    },
    /// A strong-weak chain that closes into an odd loop; its start node
    /// must be true.
    ChainLoop {
        digit: Option<u8>,
        nodes: Vec<Node>,
        strong: Vec<bool>,
    },
    /// A strong-weak chain whose two ends pin every node linked to both.
    ChainEnds {
        digit: Option<u8>,
        nodes: Vec<Node>,
        strong: Vec<bool>,
        erased: Vec<Node>,
    },
    /// One branch of a bivalue cell ran into a contradiction, so the other
    /// digit was filled. The chain groups derived events by depth.
    ForkContradiction {
        cell: usize,
        tried: u8,
        digit: u8,
        chain: Vec<Vec<Event>>,
    },
    /// Both branches of a bivalue cell derived the same conclusion.
    ForkAgreement {
        cell: usize,
        conclusion: Event,
        first: Vec<Vec<Event>>,
        second: Vec<Vec<Event>>,
    },
    /// Following weak-link bridges from one cluster reached both halves of
    /// another component, so the start cluster is false and its opposite
    /// cluster was filled.
    ClusterContradiction {
        start: (i32, bool),
        component: i32,
        route_a: Vec<(Node, Node)>,
        route_b: Vec<(Node, Node)>,
        fills: Vec<Node>,
    },
}

fn cell_str(idx: usize) -> String {
    Position::from_index(idx).to_string()
}

fn cells_str(cells: &[usize]) -> String {
    cells.iter().map(|&c| cell_str(c)).collect()
}

fn node_str(node: Node) -> String {
    format!("{} = {}", cell_str(node.0), node.1)
}

fn nodes_str(nodes: &[Node]) -> String {
    let parts: Vec<String> = nodes.iter().map(|&n| node_str(n)).collect();
    parts.join(", ")
}

fn digits_str(digits: &[u8]) -> String {
    digits.iter().map(|d| d.to_string()).collect()
}

fn lines_str(lines: &[usize]) -> String {
    let parts: Vec<String> = lines.iter().map(|&l| (l % 9 + 1).to_string()).collect();
    parts.join(", ")
}

fn event_str(event: Event) -> String {
    let (cell, digit, positive) = event;
    if digit == 0 {
        return format!("cell {} has no candidate left, a contradiction", cell_str(cell));
    }
    let verb = if positive { "must be" } else { "cannot be" };
    format!("cell {} {} {}", cell_str(cell), verb, digit)
}

fn event_chain_str(chain: &[Vec<Event>]) -> String {
    // The depth-0 group is the assumption itself; narrate what follows.
    let groups: Vec<String> = chain
        .iter()
        .skip(1)
        .map(|events| {
            let parts: Vec<String> = events.iter().map(|&e| event_str(e)).collect();
            parts.join(", ")
        })
        .collect();
    groups.join("; hence ")
}

fn chain_str(nodes: &[Node], strong: &[bool], digit: Option<u8>) -> String {
    let mut s = match digit {
        Some(_) => cell_str(nodes[0].0),
        None => node_str(nodes[0]),
    };
    for (node, &is_strong) in nodes[1..].iter().zip(strong) {
        s.push_str(if is_strong { " == " } else { " -- " });
        s.push_str(&match digit {
            Some(_) => cell_str(node.0),
            None => node_str(*node),
        });
    }
    s
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::NakedSingle { cell, digit } => write!(
                f,
                "Fill {} in {}: the only candidate left in the cell.",
                digit,
                cell_str(*cell)
            ),
            Step::HiddenSingle { cell, digit, unit } => write!(
                f,
                "Fill {} in {}: the only possible place for {} in {}.",
                digit,
                cell_str(*cell),
                digit,
                unit_name(*unit)
            ),
            Step::BoxLine {
                bx,
                digit,
                line,
                erased,
            } => write!(
                f,
                "In {}, {} can only appear in {}; erased {} from the rest of the line at {}.",
                unit_name(*bx),
                digit,
                unit_name(*line),
                digit,
                cells_str(erased)
            ),
            Step::LineBox {
                line,
                digit,
                bx,
                erased,
            } => write!(
                f,
                "In {}, {} can only appear in {}; erased {} from the rest of the box at {}.",
                unit_name(*line),
                digit,
                unit_name(*bx),
                digit,
                cells_str(erased)
            ),
            Step::NakedSubset {
                unit,
                cells,
                digits,
                erased,
            } => write!(
                f,
                "In {}, the digits {} fill up the cells {}; erased them elsewhere at {}.",
                unit_name(*unit),
                digits_str(digits),
                cells_str(cells),
                nodes_str(erased)
            ),
            Step::HiddenSubset {
                unit,
                digits,
                cells,
                erased,
            } => write!(
                f,
                "In {}, the digits {} fit only in the cells {}; erased every other candidate there.",
                unit_name(*unit),
                digits_str(digits),
                cells_str(cells)
            )
            .and_then(|()| {
                if erased.is_empty() {
                    Ok(())
                } else {
                    write!(f, " ({})", nodes_str(erased))
                }
            }),
            Step::Fish {
                digit,
                rows_as_base,
                bases,
                covers,
                erased,
            } => {
                let (base_kind, cover_kind) = if *rows_as_base {
                    ("rows", "columns")
                } else {
                    ("columns", "rows")
                };
                write!(
                    f,
                    "Across {} {}, {} is confined to {} {}; erased {} from those {} elsewhere at {}.",
                    base_kind,
                    lines_str(bases),
                    digit,
                    cover_kind,
                    lines_str(covers),
                    digit,
                    cover_kind,
                    cells_str(erased)
                )
            }
            Step::XyWing {
                center,
                wing1,
                wing2,
                digit,
                erased,
            } => write!(
                f,
                "The cells {}, {} and {} form a two-branch match: one of {} and {} must be {}; \
                 erased {} from their shared sight at {}.",
                cell_str(*wing1),
                cell_str(*center),
                cell_str(*wing2),
                cell_str(*wing1),
                cell_str(*wing2),
                digit,
                digit,
                cells_str(erased)
            ),
            Step::XyzWing {
                center,
                wing1,
                wing2,
                digit,
                erased,
            } => write!(
                f,
                "The cells {}, {} and {} form a three-branch match: one of them must be {}; \
                 erased {} from the cells seeing all three at {}.",
                cell_str(*wing1),
                cell_str(*center),
                cell_str(*wing2),
                digit,
                digit,
                cells_str(erased)
            ),
            Step::ColorPair {
                digit,
                first,
                second,
            } => match digit {
                Some(d) => write!(
                    f,
                    "Coloring the strong links of {}: {} and {} share a color yet see each other; \
                     erased {} from both.",
                    d,
                    cell_str(first.0),
                    cell_str(second.0),
                    d
                ),
                None => write!(
                    f,
                    "Coloring strong links: {} and {} share a color yet see each other; erased both.",
                    node_str(*first),
                    node_str(*second)
                ),
            },
            Step::ColorSqueeze {
                digit,
                node,
                positive,
                negative,
            } => match digit {
                Some(d) => write!(
                    f,
                    "Coloring the strong links of {}: {} sits in the sight of both colors \
                     ({} and {}); erased {}.",
                    d,
                    cell_str(node.0),
                    cell_str(positive.0),
                    cell_str(negative.0),
                    d
                ),
                None => write!(
                    f,
                    "Coloring strong links: {} sits in the sight of both colors ({} and {}); erased it.",
                    node_str(*node),
                    node_str(*positive),
                    node_str(*negative)
                ),
            },
            Step::ChainLoop {
                digit,
                nodes,
                strong,
            } => {
                let head = match digit {
                    Some(d) => write!(f, "The strong-weak chain on {} ", d),
                    None => write!(f, "The strong-weak chain "),
                };
                head.and_then(|()| {
                    write!(
                        f,
                        "{} closes into a loop, so its start {} must hold.",
                        chain_str(nodes, strong, *digit),
                        node_str(nodes[0])
                    )
                })
            }
            Step::ChainEnds {
                digit,
                nodes,
                strong,
                erased,
            } => {
                let head = match digit {
                    Some(d) => write!(f, "The strong-weak chain on {} ", d),
                    None => write!(f, "The strong-weak chain "),
                };
                head.and_then(|()| {
                    write!(
                        f,
                        "{} pins everything linked to both of its ends; erased {}.",
                        chain_str(nodes, strong, *digit),
                        nodes_str(erased)
                    )
                })
            }
            Step::ForkContradiction {
                cell,
                tried,
                digit,
                chain,
            } => write!(
                f,
                "Cell {} must be {}: were it {}, then {}.",
                cell_str(*cell),
                digit,
                tried,
                event_chain_str(chain)
            ),
            Step::ForkAgreement {
                cell,
                conclusion,
                first,
                second,
            } => write!(
                f,
                "{} either way for {}: in one case {}; in the other {}.",
                event_str(*conclusion),
                cell_str(*cell),
                event_chain_str(first),
                event_chain_str(second)
            ),
            Step::ClusterContradiction {
                start,
                component,
                route_a,
                route_b,
                fills,
            } => {
                let side = if start.1 { "positive" } else { "negative" };
                write!(
                    f,
                    "If the {} cluster of component {} held, the bridges ",
                    side, start.0
                )?;
                let route = |r: &[(Node, Node)]| {
                    let parts: Vec<String> = r
                        .iter()
                        .map(|&(a, b)| format!("{} -- {}", node_str(a), node_str(b)))
                        .collect();
                    parts.join(", ")
                };
                write!(f, "[{}] and [{}] ", route(route_a), route(route_b))?;
                write!(
                    f,
                    "would make both halves of component {} hold at once; filled its opposite \
                     cluster {}.",
                    component,
                    nodes_str(fills)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_singles() {
        let s = Step::NakedSingle { cell: 0, digit: 5 };
        assert_eq!(s.to_string(), "Fill 5 in (1, 1): the only candidate left in the cell.");
        let s = Step::HiddenSingle {
            cell: 80,
            digit: 9,
            unit: 17,
        };
        assert_eq!(
            s.to_string(),
            "Fill 9 in (9, 9): the only possible place for 9 in column 9."
        );
    }

    #[test]
    fn renders_chain() {
        let s = Step::ChainLoop {
            digit: Some(7),
            nodes: vec![(0, 7), (4, 7), (40, 7), (0, 7)],
            strong: vec![true, false, true],
        };
        let text = s.to_string();
        assert!(text.contains("(1, 1) == (1, 5) -- (5, 5) == (1, 1)"), "{text}");
        assert!(text.ends_with("its start (1, 1) = 7 must hold."), "{text}");
    }

    #[test]
    fn serializes_to_json() {
        let s = Step::NakedSingle { cell: 3, digit: 2 };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("NakedSingle"));
    }
}
