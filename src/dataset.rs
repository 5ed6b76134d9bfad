//! Baseline dataset wire format.
//!
//! The baseline ships as a renderer-style element list: every node is a
//! `{ "data": {...}, "position": {...} }` record and every edge a
//! `{ "data": { "source", "target", "type" } }` record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{GraphError, ScenarioGraph};
use crate::types::{Edge, NodeId, NodeStatus, Position, ScenarioNode, Treasure};

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Dataset is not valid JSON or has the wrong shape.
    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Dataset violates graph integrity.
    #[error("Invalid dataset graph: {0}")]
    Graph(#[from] GraphError),
}

/// Full dataset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    /// Node records.
    pub nodes: Vec<NodeRecord>,
    /// Edge records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeRecord>,
}

/// Node record: data plus renderer position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node attributes.
    pub data: NodeData,
    /// Renderer coordinates.
    #[serde(default)]
    pub position: Position,
}

/// Node attributes as stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Unique identifier.
    pub id: NodeId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Default status.
    pub status: NodeStatus,
    /// Side quest flag.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub side: bool,
    /// Default notes.
    #[serde(default)]
    pub notes: String,
    /// Scenario book pages.
    #[serde(default)]
    pub pages: Vec<u32>,
    /// Page shown by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_page: Option<u32>,
    /// Explicit image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Treasures by treasure id.
    #[serde(default)]
    pub treasure: BTreeMap<String, Treasure>,
}

/// Edge record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Edge endpoints and type.
    pub data: Edge,
}

impl ScenarioData {
    /// Parse a dataset document.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a dataset document.
    pub fn to_json(&self) -> Result<String, DatasetError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Build a graph, checking integrity.
    pub fn into_graph(self) -> Result<ScenarioGraph, DatasetError> {
        let nodes = self.nodes.into_iter().map(NodeRecord::into_node).collect();
        let edges = self.edges.into_iter().map(|e| e.data).collect();
        Ok(ScenarioGraph::new(nodes, edges)?)
    }

    /// Dataset view of a graph, including its current progress.
    pub fn from_graph(graph: &ScenarioGraph) -> Self {
        Self {
            nodes: graph.nodes().iter().map(NodeRecord::from_node).collect(),
            edges: graph
                .edges()
                .iter()
                .cloned()
                .map(|data| EdgeRecord { data })
                .collect(),
        }
    }
}

impl NodeRecord {
    fn into_node(self) -> ScenarioNode {
        let NodeData {
            id,
            name,
            status,
            side,
            notes,
            pages,
            active_page,
            image_url,
            treasure,
        } = self.data;
        ScenarioNode {
            id,
            name,
            status,
            side,
            notes,
            pages,
            active_page,
            image_url,
            treasure,
            position: self.position,
        }
    }

    fn from_node(node: &ScenarioNode) -> Self {
        Self {
            data: NodeData {
                id: node.id.clone(),
                name: node.name.clone(),
                status: node.status,
                side: node.side,
                notes: node.notes.clone(),
                pages: node.pages.clone(),
                active_page: node.active_page,
                image_url: node.image_url.clone(),
                treasure: node.treasure.clone(),
            },
            position: node.position,
        }
    }
}

/// Parse a baseline dataset straight into a graph.
pub fn load_baseline(json: &str) -> Result<ScenarioGraph, DatasetError> {
    let graph = ScenarioData::from_json(json)?.into_graph()?;
    tracing::debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "Baseline dataset loaded"
    );
    Ok(graph)
}
