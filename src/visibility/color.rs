//! Node color classes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{is_listed, CampaignRules, StatusSnapshot};
use crate::graph::ScenarioGraph;
use crate::types::{EdgeType, NodeId, NodeStatus};

/// Color class assigned to a node. The renderer maps classes to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorClass {
    /// Unfilled, default.
    Neutral,
    /// Finished scenario.
    Done,
    /// Outline-only variant of neutral, for attempted scenarios.
    Outline,
    /// Still waiting on an unfinished requirement.
    BlockedGrey,
    /// Closed off by a finished scenario.
    BlockedRed,
    /// Currently selected.
    Highlight,
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Neutral => "neutral",
            Self::Done => "done",
            Self::Outline => "outline",
            Self::BlockedGrey => "blocked-grey",
            Self::BlockedRed => "blocked-red",
            Self::Highlight => "highlight",
        };
        f.write_str(name)
    }
}

/// Color from a node's own status. Side scenarios follow the same mapping.
pub fn status_color(status: NodeStatus) -> ColorClass {
    match status {
        NodeStatus::Complete => ColorClass::Done,
        NodeStatus::Attempted => ColorClass::Outline,
        NodeStatus::Hidden | NodeStatus::Incomplete | NodeStatus::Locked => ColorClass::Neutral,
    }
}

/// Recolor targets of visible requirement and block edges.
///
/// Grey runs first so red wins when a node is both.
pub(super) fn apply_blocked_colors(
    graph: &ScenarioGraph,
    snapshot: &StatusSnapshot<'_>,
    edge_visible: &[bool],
    rules: &CampaignRules,
    colors: &mut BTreeMap<NodeId, ColorClass>,
) {
    let passes = [
        (EdgeType::RequiredBy, false, rules.requiredby_exceptions, ColorClass::BlockedGrey),
        (EdgeType::Blocks, true, rules.blocks_exceptions, ColorClass::BlockedRed),
    ];

    for (edge_type, source_complete, exceptions, color) in passes {
        for (i, edge) in graph.edges().iter().enumerate() {
            if edge.edge_type != edge_type || !edge_visible[i] {
                continue;
            }
            if snapshot.is_complete(edge.source.as_str()) != source_complete
                || snapshot.is_complete(edge.target.as_str())
                || is_listed(exceptions, edge.target.as_str())
            {
                continue;
            }
            colors.insert(edge.target.clone(), color);
        }
    }
}
