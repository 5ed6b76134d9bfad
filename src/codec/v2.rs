//! Current (V2) progress format.

use serde::{Deserialize, Serialize};

use super::{CodecError, NodeDelta};
use crate::canonical::canonical_hash_hex;
use crate::graph::ScenarioGraph;
use crate::types::{NodeId, NodeStatus};
use crate::FORMAT_VERSION;

/// Per-node record. Only fields that differ from the baseline are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id.
    pub id: NodeId,
    /// Status, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    /// Notes, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Horizontal coordinate, written together with `y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical coordinate, written together with `x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl NodeRecord {
    fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none() && self.x.is_none() && self.y.is_none()
    }
}

/// Persisted progress document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDocument {
    /// Changed nodes, in graph order.
    pub nodes: Vec<NodeRecord>,
    /// Format marker, always `"2"` when written.
    pub version: String,
}

impl ProgressDocument {
    /// Document with no changes.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            version: FORMAT_VERSION.to_string(),
        }
    }

    /// Diff a live graph against its baseline.
    ///
    /// Live nodes missing from the baseline cannot be expressed as a delta
    /// and are skipped.
    pub fn diff(graph: &ScenarioGraph, baseline: &ScenarioGraph) -> Self {
        let mut nodes = Vec::new();
        for node in graph.nodes() {
            let Ok(default) = baseline.node(node.id.as_str()) else {
                tracing::warn!(node_id = %node.id, "Scenario missing from baseline, not persisted");
                continue;
            };

            let mut record = NodeRecord {
                id: node.id.clone(),
                status: None,
                notes: None,
                x: None,
                y: None,
            };
            if node.status != default.status {
                record.status = Some(node.status);
            }
            if node.notes != default.notes {
                record.notes = Some(node.notes.clone());
            }
            if node.position != default.position {
                record.x = Some(node.position.x);
                record.y = Some(node.position.y);
            }
            if !record.is_empty() {
                nodes.push(record);
            }
        }

        Self {
            nodes,
            version: FORMAT_VERSION.to_string(),
        }
    }

    /// Whether the document records no changes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize to the stored string form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored V2 document.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let document: Self = serde_json::from_str(json)?;
        if document.version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(document.version));
        }
        Ok(document)
    }

    /// Stable fingerprint of the document contents.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Convert records into deltas.
    pub fn into_deltas(self) -> Vec<NodeDelta> {
        self.nodes
            .into_iter()
            .map(|r| NodeDelta {
                id: r.id,
                status: r.status,
                notes: r.notes,
                x: r.x,
                y: r.y,
            })
            .collect()
    }
}

impl Default for ProgressDocument {
    fn default() -> Self {
        Self::empty()
    }
}
