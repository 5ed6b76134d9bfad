//! General edge visibility rules.
//!
//! Rules run in a fixed order over an output vector indexed by edge id.
//! Each rule reads only the status snapshot, never the output of an earlier
//! rule, so the order matters only for which write wins.

use super::{is_listed, CampaignRules, StatusSnapshot};
use crate::graph::{EdgeIter, ScenarioGraph};
use crate::types::{Edge, EdgeType, NodeStatus};

fn set_all(visible: &mut [bool], edges: EdgeIter<'_>, value: bool) {
    set_where(visible, edges, value, |_| true);
}

fn set_where(visible: &mut [bool], edges: EdgeIter<'_>, value: bool, keep: impl Fn(&Edge) -> bool) {
    for (id, edge) in edges {
        if keep(edge) {
            visible[id.0] = value;
        }
    }
}

/// Edge visibility from the general rules, indexed by edge id.
pub(super) fn edge_visibility(
    graph: &ScenarioGraph,
    snapshot: &StatusSnapshot<'_>,
    rules: &CampaignRules,
) -> Vec<bool> {
    // Hidden unless a rule shows it.
    let mut visible = vec![false; graph.num_edges()];
    let not_excepted = |exceptions: &'static [&'static str]| {
        move |edge: &Edge| !is_listed(exceptions, edge.target.as_str())
    };

    for node in graph.nodes() {
        let id = node.id.as_str();
        if matches!(
            snapshot.status(id),
            Some(NodeStatus::Incomplete | NodeStatus::Attempted | NodeStatus::Hidden)
        ) {
            set_all(&mut visible, graph.outgoing(id, None), false);
        }
    }

    for node in graph.nodes() {
        let id = node.id.as_str();
        if snapshot.is_complete(id) {
            set_all(&mut visible, graph.outgoing(id, Some(EdgeType::Unlocks)), true);
        }
    }

    for node in graph.nodes() {
        let id = node.id.as_str();
        if snapshot.is_visible(id) {
            set_where(
                &mut visible,
                graph.outgoing(id, Some(EdgeType::RequiredBy)),
                true,
                not_excepted(rules.requiredby_exceptions),
            );
        }
    }

    // Requirement met, marker is moot.
    for node in graph.nodes() {
        let id = node.id.as_str();
        if snapshot.is_complete(id) {
            set_all(&mut visible, graph.outgoing(id, Some(EdgeType::RequiredBy)), false);
        }
    }

    for node in graph.nodes() {
        let id = node.id.as_str();
        if snapshot.is_complete(id) {
            set_where(
                &mut visible,
                graph.outgoing(id, Some(EdgeType::Blocks)),
                true,
                not_excepted(rules.blocks_exceptions),
            );
        }
    }

    // A finished scenario cannot be blocked.
    for node in graph.nodes() {
        let id = node.id.as_str();
        if snapshot.is_complete(id) {
            set_all(&mut visible, graph.incoming(id, Some(EdgeType::Blocks)), false);
        }
    }

    // No edges into nothing.
    for node in graph.nodes() {
        let id = node.id.as_str();
        if snapshot.status(id) == Some(NodeStatus::Hidden) {
            set_all(&mut visible, graph.incoming(id, None), false);
        }
    }

    visible
}
