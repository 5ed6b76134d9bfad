//! Derived visibility engine.
//!
//! Recomputes, from node statuses alone, which scenarios and edges are shown
//! and how each scenario is colored.
//!
//! ## Pipeline
//!
//! ```text
//! ScenarioGraph → StatusSnapshot → general edge rules → color rules
//!                                        ↓                   ↓
//!                                  special cases (force visible + recolor)
//!                                        ↓
//!                                  selection highlight → RenderAttributes
//! ```
//!
//! Every stage reads the snapshot captured at the start, never an earlier
//! stage's output, so rendering is deterministic and idempotent. The graph is
//! only borrowed immutably.

pub mod color;
pub mod rules;
pub mod special_cases;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::canonical::canonical_hash_hex;
use crate::graph::ScenarioGraph;
use crate::types::{EdgeId, NodeId, NodeStatus};

pub use color::ColorClass;
pub use special_cases::{EdgeOverride, Guard, SpecialCase, GLOOMHAVEN_SPECIAL_CASES};

pub(crate) fn is_listed(list: &[&str], id: &str) -> bool {
    list.iter().any(|entry| *entry == id)
}

/// Immutable view of every node's status and side flag.
#[derive(Debug, Clone)]
pub struct StatusSnapshot<'a> {
    nodes: HashMap<&'a str, (NodeStatus, bool)>,
}

impl<'a> StatusSnapshot<'a> {
    /// Capture the current statuses of a graph.
    pub fn capture(graph: &'a ScenarioGraph) -> Self {
        Self {
            nodes: graph
                .nodes()
                .iter()
                .map(|n| (n.id.as_str(), (n.status, n.side)))
                .collect(),
        }
    }

    /// Status of a node, `None` if absent.
    pub fn status(&self, id: &str) -> Option<NodeStatus> {
        self.nodes.get(id).map(|(status, _)| *status)
    }

    /// Whether a node is complete. Absent nodes are not.
    pub fn is_complete(&self, id: &str) -> bool {
        self.status(id) == Some(NodeStatus::Complete)
    }

    /// Whether the hidden-node rule shows a node.
    pub fn is_visible(&self, id: &str) -> bool {
        self.nodes
            .get(id)
            .map_or(false, |(status, side)| *status != NodeStatus::Hidden || *side)
    }
}

/// Campaign data the engine is parameterized by.
#[derive(Debug, Clone, Copy)]
pub struct CampaignRules {
    /// Targets whose `requiredby` edges are left to special cases.
    pub requiredby_exceptions: &'static [&'static str],
    /// Targets whose `blocks` edges are left to special cases.
    pub blocks_exceptions: &'static [&'static str],
    /// Overrides evaluated after the general rules.
    pub special_cases: &'static [SpecialCase],
}

impl CampaignRules {
    /// Rules for the Gloomhaven campaign dataset.
    pub const fn gloomhaven() -> Self {
        Self {
            requiredby_exceptions: &["31", "26"],
            blocks_exceptions: &["27", "31", "33"],
            special_cases: GLOOMHAVEN_SPECIAL_CASES,
        }
    }

    /// General rules only, no campaign quirks.
    pub const fn general_only() -> Self {
        Self {
            requiredby_exceptions: &[],
            blocks_exceptions: &[],
            special_cases: &[],
        }
    }
}

impl Default for CampaignRules {
    fn default() -> Self {
        Self::gloomhaven()
    }
}

/// Derived attributes of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeAttributes {
    /// Whether the node is shown (and selectable).
    pub visible: bool,
    /// Color class.
    pub color: ColorClass,
}

/// Derived attributes of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeAttributes {
    /// Whether the edge is shown.
    pub visible: bool,
}

/// Full render output for a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderAttributes {
    /// Attributes by node id.
    pub nodes: BTreeMap<NodeId, NodeAttributes>,
    /// Attributes by edge id.
    pub edges: BTreeMap<EdgeId, EdgeAttributes>,
}

impl RenderAttributes {
    /// Attributes of a node.
    pub fn node(&self, id: &str) -> Option<&NodeAttributes> {
        self.nodes.get(id)
    }

    /// Attributes of an edge.
    pub fn edge(&self, id: EdgeId) -> Option<&EdgeAttributes> {
        self.edges.get(&id)
    }

    /// Whether a node is visible. Unknown nodes are not.
    pub fn is_node_visible(&self, id: &str) -> bool {
        self.node(id).map_or(false, |a| a.visible)
    }

    /// Whether an edge is visible. Unknown edges are not.
    pub fn is_edge_visible(&self, id: EdgeId) -> bool {
        self.edge(id).map_or(false, |a| a.visible)
    }

    /// Color of a node.
    pub fn color(&self, id: &str) -> Option<ColorClass> {
        self.node(id).map(|a| a.color)
    }

    /// Ids of visible edges, ascending.
    pub fn visible_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().filter(|(_, a)| a.visible).map(|(id, _)| *id)
    }

    /// Stable fingerprint of the whole render.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Computes render attributes from node statuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityEngine {
    rules: CampaignRules,
}

impl VisibilityEngine {
    /// Engine with the Gloomhaven campaign rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom campaign rules.
    pub fn with_rules(rules: CampaignRules) -> Self {
        Self { rules }
    }

    /// Campaign rules in use.
    pub fn rules(&self) -> &CampaignRules {
        &self.rules
    }

    /// Derive visibility and colors for every node and edge.
    ///
    /// `selected` ids absent from the graph are ignored.
    pub fn render(&self, graph: &ScenarioGraph, selected: &BTreeSet<NodeId>) -> RenderAttributes {
        let snapshot = StatusSnapshot::capture(graph);

        let mut edge_visible = rules::edge_visibility(graph, &snapshot, &self.rules);

        let mut colors: BTreeMap<NodeId, ColorClass> = graph
            .nodes()
            .iter()
            .map(|n| (n.id.clone(), color::status_color(n.status)))
            .collect();
        color::apply_blocked_colors(graph, &snapshot, &edge_visible, &self.rules, &mut colors);

        special_cases::apply(
            self.rules.special_cases,
            graph,
            &snapshot,
            &mut edge_visible,
            &mut colors,
        );

        for id in selected {
            if let Some(color) = colors.get_mut(id) {
                *color = ColorClass::Highlight;
            }
        }

        let nodes: BTreeMap<NodeId, NodeAttributes> = colors
            .into_iter()
            .map(|(id, color)| {
                let visible = snapshot.is_visible(id.as_str());
                (id, NodeAttributes { visible, color })
            })
            .collect();
        let edges: BTreeMap<EdgeId, EdgeAttributes> = edge_visible
            .into_iter()
            .enumerate()
            .map(|(i, visible)| (EdgeId(i), EdgeAttributes { visible }))
            .collect();

        tracing::debug!(
            nodes = nodes.len(),
            visible_nodes = nodes.values().filter(|a| a.visible).count(),
            edges = edges.len(),
            visible_edges = edges.values().filter(|a| a.visible).count(),
            "Render attributes derived"
        );

        RenderAttributes { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, EdgeType, ScenarioNode};

    fn build_graph() -> ScenarioGraph {
        ScenarioGraph::new(
            vec![
                ScenarioNode::new("1", "Black Barrow", NodeStatus::Complete),
                ScenarioNode::new("2", "Barrow Lair", NodeStatus::Attempted),
                ScenarioNode::new("3", "Inox Encampment", NodeStatus::Incomplete),
                ScenarioNode::new("4", "Crypt of the Damned", NodeStatus::Hidden),
                ScenarioNode::new("52", "Noxious Cellar", NodeStatus::Hidden).with_side(true),
            ],
            vec![
                Edge::new("1", "2", EdgeType::Unlocks),
                Edge::new("2", "3", EdgeType::RequiredBy),
                Edge::new("1", "3", EdgeType::Blocks),
                Edge::new("1", "4", EdgeType::Unlocks),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_node_visibility() {
        let attrs = VisibilityEngine::new().render(&build_graph(), &BTreeSet::new());
        assert!(attrs.is_node_visible("1"));
        assert!(attrs.is_node_visible("3"));
        assert!(!attrs.is_node_visible("4"));
        assert!(attrs.is_node_visible("52"));
        assert!(!attrs.is_node_visible("missing"));
    }

    #[test]
    fn test_red_overrides_grey() {
        let attrs = VisibilityEngine::new().render(&build_graph(), &BTreeSet::new());
        // 3 is required by unfinished 2 and blocked by finished 1.
        assert!(attrs.is_edge_visible(EdgeId(1)));
        assert!(attrs.is_edge_visible(EdgeId(2)));
        assert_eq!(attrs.color("3"), Some(ColorClass::BlockedRed));
        assert_eq!(attrs.color("1"), Some(ColorClass::Done));
        assert_eq!(attrs.color("2"), Some(ColorClass::Outline));
    }

    #[test]
    fn test_grey_without_block() {
        let mut graph = build_graph();
        graph.set_status("1", NodeStatus::Incomplete).unwrap();
        let attrs = VisibilityEngine::new().render(&graph, &BTreeSet::new());
        assert!(!attrs.is_edge_visible(EdgeId(2)));
        assert_eq!(attrs.color("3"), Some(ColorClass::BlockedGrey));
    }

    #[test]
    fn test_selection_has_highest_precedence() {
        let selected: BTreeSet<NodeId> = [NodeId::from("3"), NodeId::from("nope")].into_iter().collect();
        let attrs = VisibilityEngine::new().render(&build_graph(), &selected);
        assert_eq!(attrs.color("3"), Some(ColorClass::Highlight));
        assert_eq!(attrs.nodes.len(), 5);
    }

    #[test]
    fn test_render_is_idempotent() {
        let graph = build_graph();
        let engine = VisibilityEngine::new();
        let first = engine.render(&graph, &BTreeSet::new());
        let second = engine.render(&graph, &BTreeSet::new());
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_every_edge_has_attributes() {
        let graph = build_graph();
        let attrs = VisibilityEngine::new().render(&graph, &BTreeSet::new());
        assert_eq!(attrs.edges.len(), graph.num_edges());
        let visible: Vec<_> = attrs.visible_edges().collect();
        assert_eq!(visible, vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
    }

    #[test]
    fn test_general_only_rules() {
        let engine = VisibilityEngine::with_rules(CampaignRules::general_only());
        assert!(engine.rules().special_cases.is_empty());
        assert_eq!(CampaignRules::default().blocks_exceptions, &["27", "31", "33"]);
    }
}
