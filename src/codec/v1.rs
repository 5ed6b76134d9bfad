//! Legacy (V1) progress format. Decode only.
//!
//! V1 saves mirror the renderer element shape:
//!
//! ```json
//! { "nodes": [ { "data": { "id": "62", "status": "hidden", "notes": "", "locked": "true" },
//!                "position": { "x": "120", "y": "340" } } ] }
//! ```
//!
//! Coordinates are numeric strings parsed with leading-integer semantics.
//! Scenarios past the base campaign (id > 51) that were saved as hidden, or
//! that carry the `locked` marker, load as `locked`.

use serde::Deserialize;

use super::{CodecError, NodeDelta};
use crate::types::node::parse_leading_integer;
use crate::types::{NodeId, NodeStatus};

/// Highest scenario id that is never force-locked by the legacy rule.
pub const LEGACY_LOCK_THRESHOLD: i64 = 51;

/// Legacy progress document.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDocument {
    /// Per-node records.
    pub nodes: Vec<LegacyNode>,
}

/// Legacy per-node record.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyNode {
    /// Node attributes.
    pub data: LegacyNodeData,
    /// Coordinates as strings.
    #[serde(default)]
    pub position: LegacyPosition,
}

/// Legacy node attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyNodeData {
    /// Node id.
    pub id: NodeId,
    /// Saved status.
    #[serde(default)]
    pub status: Option<NodeStatus>,
    /// Saved notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Lock marker, `"true"` when set.
    #[serde(default)]
    pub locked: Option<LockedMarker>,
}

/// Lock marker as written by old saves.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LockedMarker {
    /// `"true"` / `"false"`.
    Text(String),
    /// Boolean flag.
    Flag(bool),
    /// Any other value. Never locks.
    Other(serde_json::Value),
}

impl LockedMarker {
    fn is_set(&self) -> bool {
        match self {
            Self::Text(s) => s == "true",
            Self::Flag(b) => *b,
            Self::Other(_) => false,
        }
    }
}

/// Legacy coordinates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyPosition {
    /// Horizontal coordinate.
    #[serde(default)]
    pub x: Option<LegacyCoordinate>,
    /// Vertical coordinate.
    #[serde(default)]
    pub y: Option<LegacyCoordinate>,
}

/// A legacy coordinate: normally a numeric string, occasionally a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyCoordinate {
    /// Numeric string such as `"120"`.
    Text(String),
    /// Plain JSON number.
    Number(f64),
}

impl LegacyCoordinate {
    /// Integer value of the coordinate.
    fn to_integer(&self, id: &NodeId, axis: &str) -> Result<f64, CodecError> {
        match self {
            Self::Text(s) => parse_leading_integer(s).map(|v| v as f64).ok_or_else(|| {
                CodecError::Decode(format!("scenario {}: invalid {} coordinate {:?}", id, axis, s))
            }),
            Self::Number(n) if n.is_finite() => Ok(n.trunc()),
            Self::Number(n) => Err(CodecError::Decode(format!(
                "scenario {}: invalid {} coordinate {}",
                id, axis, n
            ))),
        }
    }
}

impl LegacyNode {
    /// Validate the record into a delta, applying the legacy lock rule.
    pub fn into_delta(self) -> Result<NodeDelta, CodecError> {
        let LegacyNodeData { id, status, notes, locked } = self.data;

        let x = self.position.x.map(|c| c.to_integer(&id, "x")).transpose()?;
        // Old saves were written by a loader that read y from the x field; y
        // here is read from its own field.
        let y = self.position.y.map(|c| c.to_integer(&id, "y")).transpose()?;

        let locked = locked.map_or(false, |m| m.is_set());
        let status = status.map(|s| legacy_status(&id, s, locked));

        Ok(NodeDelta { id, status, notes, x, y })
    }
}

impl LegacyDocument {
    /// Validate every record. Fails on the first invalid one.
    pub fn into_deltas(self) -> Result<Vec<NodeDelta>, CodecError> {
        self.nodes.into_iter().map(LegacyNode::into_delta).collect()
    }
}

/// Status after the legacy lock rule.
fn legacy_status(id: &NodeId, saved: NodeStatus, locked: bool) -> NodeStatus {
    let past_threshold = id
        .leading_integer()
        .map_or(false, |n| n > LEGACY_LOCK_THRESHOLD);
    if past_threshold && (saved == NodeStatus::Hidden || locked) {
        NodeStatus::Locked
    } else {
        saved
    }
}
