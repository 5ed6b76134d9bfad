//! Versioned progress codec.
//!
//! Progress is persisted as a sparse delta against the baseline dataset:
//! only status, notes and position changes are written, and loading overlays
//! those deltas onto a fresh clone of the baseline.
//!
//! ## Formats
//!
//! | Marker | Format | Direction |
//! |--------|--------|-----------|
//! | absent | V1 (legacy, renderer-shaped records) | decode only |
//! | `"2"`  | V2 (flat records) | encode + decode |
//!
//! Any other marker is rejected; there is no fallback guessing.
//!
//! ## All-or-nothing
//!
//! A document is fully parsed and validated into [`NodeDelta`]s before the
//! first overlay write, so a malformed document never yields a partially
//! restored graph.

pub mod v1;
pub mod v2;

use std::collections::BTreeMap;
use serde_json::Value;

use crate::graph::{GraphError, ScenarioGraph};
use crate::types::{NodeId, NodeStatus, Position};

pub use v1::{LegacyDocument, LegacyNode};
pub use v2::{NodeRecord, ProgressDocument};

/// Error type for progress decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// Document is not valid JSON or does not match its format.
    #[error("Malformed progress document: {0}")]
    Decode(String),
    /// Document carries a version marker this codec does not know.
    #[error("Unsupported progress document version: {0}")]
    UnsupportedVersion(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Persisted format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// Legacy format, no version key.
    V1,
    /// Current format, `"version": "2"`.
    V2,
}

impl FormatVersion {
    /// Detect the format of a parsed document from its version marker.
    pub fn detect(document: &Value) -> Result<Self, CodecError> {
        let object = document
            .as_object()
            .ok_or_else(|| CodecError::Decode("document is not a JSON object".to_string()))?;
        match object.get("version") {
            None => Ok(Self::V1),
            Some(Value::String(v)) if v == crate::FORMAT_VERSION => Ok(Self::V2),
            Some(Value::String(v)) => Err(CodecError::UnsupportedVersion(v.clone())),
            Some(other) => Err(CodecError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Validated per-node change, independent of the wire format.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeDelta {
    /// Node the change applies to.
    pub id: NodeId,
    /// New status.
    pub status: Option<NodeStatus>,
    /// New notes.
    pub notes: Option<String>,
    /// New horizontal coordinate.
    pub x: Option<f64>,
    /// New vertical coordinate.
    pub y: Option<f64>,
}

/// Encode the differences between `graph` and `baseline`.
///
/// Always produces the current format.
pub fn encode(graph: &ScenarioGraph, baseline: &ScenarioGraph) -> ProgressDocument {
    ProgressDocument::diff(graph, baseline)
}

/// Decode a persisted document string and overlay it onto `baseline`.
pub fn decode(input: &str, baseline: &ScenarioGraph) -> Result<ScenarioGraph, CodecError> {
    let document: Value = serde_json::from_str(input)?;
    decode_value(document, baseline)
}

/// Decode an already-parsed document and overlay it onto `baseline`.
pub fn decode_value(document: Value, baseline: &ScenarioGraph) -> Result<ScenarioGraph, CodecError> {
    let version = FormatVersion::detect(&document)?;
    let deltas = match version {
        FormatVersion::V1 => serde_json::from_value::<LegacyDocument>(document)?.into_deltas()?,
        FormatVersion::V2 => serde_json::from_value::<ProgressDocument>(document)?.into_deltas(),
    };
    let records = deltas.len();

    let graph = overlay(baseline, deltas);
    tracing::debug!(format = ?version, records, "Progress document decoded");
    Ok(graph)
}

/// Apply deltas onto a fresh clone of the baseline.
///
/// Later deltas for the same id replace earlier ones wholesale. Deltas for
/// ids absent from the baseline are ignored.
pub fn overlay(baseline: &ScenarioGraph, deltas: Vec<NodeDelta>) -> ScenarioGraph {
    let by_id: BTreeMap<NodeId, NodeDelta> =
        deltas.into_iter().map(|d| (d.id.clone(), d)).collect();

    let mut graph = baseline.clone();
    for (id, delta) in by_id {
        let Ok(node) = baseline.node(id.as_str()) else {
            tracing::debug!(node_id = %id, "Ignoring progress record for unknown scenario");
            continue;
        };
        let mut position = node.position;
        if let Some(x) = delta.x {
            position.x = x;
        }
        if let Some(y) = delta.y {
            position.y = y;
        }

        if let Err(e) = apply_delta(&mut graph, delta, position) {
            tracing::warn!(node_id = %id, error = %e, "Failed to apply progress record");
        }
    }
    graph
}

fn apply_delta(graph: &mut ScenarioGraph, delta: NodeDelta, position: Position) -> Result<(), GraphError> {
    let id = delta.id.as_str();
    if let Some(status) = delta.status {
        graph.set_status(id, status)?;
    }
    if let Some(notes) = delta.notes {
        graph.set_notes(id, notes)?;
    }
    graph.set_position(id, position)
}
