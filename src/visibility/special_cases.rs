//! Campaign-specific overrides.
//!
//! Some relationships in the Gloomhaven dataset only hold under conditions
//! the general rules cannot express, e.g. scenario 35 blocks 27 only while
//! 21 is unfinished. Each entry is a guard over named scenario statuses plus
//! the edges it forces visible. Entries are literal campaign data; they are
//! evaluated in table order after the general rules and never read each
//! other's results.

use std::collections::BTreeMap;

use super::{ColorClass, StatusSnapshot};
use crate::graph::ScenarioGraph;
use crate::types::{EdgeType, NodeId};

/// Predicate over scenario statuses.
#[derive(Debug, Clone, Copy)]
pub enum Guard {
    /// Scenario is complete.
    Complete(&'static str),
    /// Scenario is not complete (or absent from the dataset).
    NotComplete(&'static str),
    /// Every guard holds.
    All(&'static [Guard]),
    /// At least one guard holds.
    Any(&'static [Guard]),
}

impl Guard {
    /// Evaluate against a status snapshot.
    pub fn holds(&self, snapshot: &StatusSnapshot<'_>) -> bool {
        match self {
            Self::Complete(id) => snapshot.is_complete(id),
            Self::NotComplete(id) => !snapshot.is_complete(id),
            Self::All(guards) => guards.iter().all(|g| g.holds(snapshot)),
            Self::Any(guards) => guards.iter().any(|g| g.holds(snapshot)),
        }
    }
}

/// Edge forced visible by a special case.
///
/// Fires only while the target is open (incomplete or attempted).
#[derive(Debug, Clone, Copy)]
pub struct EdgeOverride {
    /// Source scenario.
    pub source: &'static str,
    /// Edge type to match.
    pub edge_type: EdgeType,
    /// Target scenario.
    pub target: &'static str,
    /// Color forced on the target.
    pub color: ColorClass,
}

impl EdgeOverride {
    const fn blocks(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            edge_type: EdgeType::Blocks,
            target,
            color: ColorClass::BlockedRed,
        }
    }

    const fn required_by(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            edge_type: EdgeType::RequiredBy,
            target,
            color: ColorClass::BlockedGrey,
        }
    }
}

/// One guarded override entry.
#[derive(Debug, Clone, Copy)]
pub struct SpecialCase {
    /// Short label for logs.
    pub name: &'static str,
    /// Condition for the entry to apply.
    pub guard: Guard,
    /// Edges forced visible when the guard holds.
    pub overrides: &'static [EdgeOverride],
}

/// Gloomhaven special cases.
pub const GLOOMHAVEN_SPECIAL_CASES: &[SpecialCase] = &[
    SpecialCase {
        name: "35 blocks 27 and 31 while 21 unfinished",
        guard: Guard::All(&[Guard::NotComplete("21"), Guard::Complete("35")]),
        overrides: &[EdgeOverride::blocks("35", "27"), EdgeOverride::blocks("35", "31")],
    },
    SpecialCase {
        name: "34 blocks 33 unless 24 done without 42",
        guard: Guard::All(&[
            Guard::Any(&[Guard::NotComplete("24"), Guard::Complete("42")]),
            Guard::Complete("34"),
        ]),
        overrides: &[EdgeOverride::blocks("34", "33")],
    },
    SpecialCase {
        name: "42 blocks 33 while 25 unfinished",
        guard: Guard::All(&[Guard::NotComplete("25"), Guard::Complete("42")]),
        overrides: &[EdgeOverride::blocks("42", "33")],
    },
    SpecialCase {
        name: "31 requires 21 once 35 is done",
        guard: Guard::All(&[Guard::Complete("35"), Guard::NotComplete("21")]),
        overrides: &[EdgeOverride::required_by("21", "31")],
    },
    SpecialCase {
        name: "26 requires 23 or 43",
        guard: Guard::All(&[Guard::NotComplete("23"), Guard::NotComplete("43")]),
        overrides: &[
            EdgeOverride::required_by("23", "26"),
            EdgeOverride::required_by("43", "26"),
        ],
    },
];

/// Apply a special-case table on top of the general rules.
pub(super) fn apply(
    table: &[SpecialCase],
    graph: &ScenarioGraph,
    snapshot: &StatusSnapshot<'_>,
    edge_visible: &mut [bool],
    colors: &mut BTreeMap<NodeId, ColorClass>,
) {
    for case in table {
        if !case.guard.holds(snapshot) {
            continue;
        }
        for rule in case.overrides {
            if !snapshot.status(rule.target).map_or(false, |s| s.is_open()) {
                continue;
            }
            for (id, edge) in graph.outgoing(rule.source, Some(rule.edge_type)) {
                if edge.target.as_str() != rule.target {
                    continue;
                }
                edge_visible[id.0] = true;
                colors.insert(edge.target.clone(), rule.color);
                tracing::trace!(
                    case = case.name,
                    edge = %edge,
                    color = %rule.color,
                    "Special case applied"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, NodeStatus, ScenarioNode};

    fn graph(statuses: &[(&str, NodeStatus)], edges: &[(&str, &str, EdgeType)]) -> ScenarioGraph {
        ScenarioGraph::new(
            statuses.iter().map(|(id, s)| ScenarioNode::new(*id, *id, *s)).collect(),
            edges.iter().map(|(s, t, ty)| Edge::new(*s, *t, *ty)).collect(),
        )
        .unwrap()
    }

    fn run(g: &ScenarioGraph) -> (Vec<bool>, BTreeMap<NodeId, ColorClass>) {
        let snapshot = StatusSnapshot::capture(g);
        let mut visible = vec![false; g.num_edges()];
        let mut colors = BTreeMap::new();
        apply(GLOOMHAVEN_SPECIAL_CASES, g, &snapshot, &mut visible, &mut colors);
        (visible, colors)
    }

    #[test]
    fn test_guard_evaluation() {
        let g = graph(
            &[("24", NodeStatus::Complete), ("42", NodeStatus::Incomplete)],
            &[],
        );
        let snapshot = StatusSnapshot::capture(&g);
        let either = Guard::Any(&[Guard::NotComplete("24"), Guard::Complete("42")]);
        assert!(!either.holds(&snapshot));
        assert!(Guard::NotComplete("99").holds(&snapshot));
        assert!(!Guard::Complete("99").holds(&snapshot));
        assert!(Guard::All(&[]).holds(&snapshot));
    }

    #[test]
    fn test_35_blocks_27_while_21_unfinished() {
        let g = graph(
            &[
                ("21", NodeStatus::Incomplete),
                ("35", NodeStatus::Complete),
                ("27", NodeStatus::Attempted),
                ("31", NodeStatus::Complete),
            ],
            &[("35", "27", EdgeType::Blocks), ("35", "31", EdgeType::Blocks)],
        );
        let (visible, colors) = run(&g);
        assert_eq!(visible, vec![true, false]);
        assert_eq!(colors.get("27"), Some(&ColorClass::BlockedRed));
        assert_eq!(colors.get("31"), None);
    }

    #[test]
    fn test_21_complete_disables_first_entry() {
        let g = graph(
            &[
                ("21", NodeStatus::Complete),
                ("35", NodeStatus::Complete),
                ("27", NodeStatus::Attempted),
            ],
            &[("35", "27", EdgeType::Blocks)],
        );
        let (visible, colors) = run(&g);
        assert_eq!(visible, vec![false]);
        assert!(colors.is_empty());
    }

    #[test]
    fn test_34_blocks_33_guard() {
        let edges = [("34", "33", EdgeType::Blocks)];

        // 24 unfinished: applies.
        let g = graph(
            &[("24", NodeStatus::Incomplete), ("34", NodeStatus::Complete), ("33", NodeStatus::Incomplete)],
            &edges,
        );
        assert_eq!(run(&g).0, vec![true]);

        // 24 done, 42 not: suppressed.
        let g = graph(
            &[
                ("24", NodeStatus::Complete),
                ("42", NodeStatus::Attempted),
                ("34", NodeStatus::Complete),
                ("33", NodeStatus::Incomplete),
            ],
            &edges,
        );
        assert_eq!(run(&g).0, vec![false]);

        // 24 and 42 done: applies again.
        let g = graph(
            &[
                ("24", NodeStatus::Complete),
                ("42", NodeStatus::Complete),
                ("34", NodeStatus::Complete),
                ("33", NodeStatus::Attempted),
            ],
            &edges,
        );
        assert_eq!(run(&g).0, vec![true]);
    }

    #[test]
    fn test_requirement_overrides_color_grey() {
        let g = graph(
            &[
                ("21", NodeStatus::Attempted),
                ("35", NodeStatus::Complete),
                ("31", NodeStatus::Incomplete),
                ("23", NodeStatus::Incomplete),
                ("43", NodeStatus::Hidden),
                ("26", NodeStatus::Attempted),
            ],
            &[
                ("21", "31", EdgeType::RequiredBy),
                ("23", "26", EdgeType::RequiredBy),
                ("43", "26", EdgeType::RequiredBy),
            ],
        );
        let (visible, colors) = run(&g);
        assert_eq!(visible, vec![true, true, true]);
        assert_eq!(colors.get("31"), Some(&ColorClass::BlockedGrey));
        assert_eq!(colors.get("26"), Some(&ColorClass::BlockedGrey));
    }

    #[test]
    fn test_target_must_be_open() {
        let g = graph(
            &[
                ("23", NodeStatus::Incomplete),
                ("43", NodeStatus::Incomplete),
                ("26", NodeStatus::Hidden),
            ],
            &[("23", "26", EdgeType::RequiredBy)],
        );
        let (visible, colors) = run(&g);
        assert_eq!(visible, vec![false]);
        assert!(colors.is_empty());
    }

    #[test]
    fn test_missing_edge_is_noop() {
        let g = graph(
            &[("25", NodeStatus::Incomplete), ("42", NodeStatus::Complete), ("33", NodeStatus::Incomplete)],
            &[],
        );
        let (visible, colors) = run(&g);
        assert!(visible.is_empty());
        assert!(colors.is_empty());
    }
}
