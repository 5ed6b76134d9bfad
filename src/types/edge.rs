//! Edge types for the scenario tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use super::node::NodeId;

/// Relationship encoded by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Source must be complete before the target can be played.
    RequiredBy,
    /// Completing the source blocks the target.
    Blocks,
    /// Source links narratively to the target.
    LinksTo,
    /// Completing the source unlocks the target.
    Unlocks,
}

impl EdgeType {
    /// Parse edge type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "requiredby" => Some(Self::RequiredBy),
            "blocks" => Some(Self::Blocks),
            "linksto" => Some(Self::LinksTo),
            "unlocks" => Some(Self::Unlocks),
            _ => None,
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredBy => write!(f, "requiredby"),
            Self::Blocks => write!(f, "blocks"),
            Self::LinksTo => write!(f, "linksto"),
            Self::Unlocks => write!(f, "unlocks"),
        }
    }
}

/// Position of an edge in the dataset's edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Directed edge between two scenarios.
///
/// Implements `Ord` for deterministic ordering: (source, target, edge_type).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source scenario.
    pub source: NodeId,
    /// Target scenario.
    pub target: NodeId,
    /// Relationship type.
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.edge_type, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_wire_names() {
        for (name, ty) in [
            ("requiredby", EdgeType::RequiredBy),
            ("blocks", EdgeType::Blocks),
            ("linksto", EdgeType::LinksTo),
            ("unlocks", EdgeType::Unlocks),
        ] {
            assert_eq!(EdgeType::from_str(name), Some(ty));
            assert_eq!(ty.to_string(), name);
            assert_eq!(serde_json::to_string(&ty).unwrap(), format!("\"{}\"", name));
        }
        assert_eq!(EdgeType::from_str("required_by"), None);
    }

    #[test]
    fn test_edge_ordering() {
        let e1 = Edge::new("1", "2", EdgeType::Unlocks);
        let e2 = Edge::new("1", "3", EdgeType::Unlocks);
        let e3 = Edge::new("2", "3", EdgeType::Unlocks);

        // Same source, different target
        assert!(e1 < e2);
        // Different source
        assert!(e1 < e3);
        assert!(e2 < e3);
    }

    #[test]
    fn test_edge_serde_shape() {
        let edge: Edge =
            serde_json::from_str(r#"{"source":"35","target":"27","type":"blocks"}"#).unwrap();
        assert_eq!(edge, Edge::new("35", "27", EdgeType::Blocks));
        assert_eq!(edge.to_string(), "35 -blocks-> 27");
    }
}
