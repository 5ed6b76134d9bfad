//! Node types for the scenario tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a scenario node.
///
/// Campaign-assigned and numeric-looking ("21", "62"), but treated as an
/// opaque string everywhere except the legacy lock rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading integer of the identifier, if any.
    ///
    /// Leading whitespace and a sign are accepted; parsing stops at the
    /// first non-digit (`"62b"` → 62, `"b62"` → None).
    pub fn leading_integer(&self) -> Option<i64> {
        parse_leading_integer(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Parse the leading integer of a string, ignoring anything after it.
pub(crate) fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Completion status of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Not yet unlocked.
    Hidden,
    /// Unlocked, not played.
    Incomplete,
    /// Played at least once without success.
    Attempted,
    /// Finished.
    Complete,
    /// Permanently closed off by campaign events.
    Locked,
}

impl NodeStatus {
    /// All statuses, in declaration order.
    pub const ALL: [NodeStatus; 5] = [
        Self::Hidden,
        Self::Incomplete,
        Self::Attempted,
        Self::Complete,
        Self::Locked,
    ];

    /// Parse status from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hidden" => Some(Self::Hidden),
            "incomplete" => Some(Self::Incomplete),
            "attempted" => Some(Self::Attempted),
            "complete" => Some(Self::Complete),
            "locked" => Some(Self::Locked),
            _ => None,
        }
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Incomplete => "incomplete",
            Self::Attempted => "attempted",
            Self::Complete => "complete",
            Self::Locked => "locked",
        }
    }

    /// Whether the scenario is available but not finished.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Incomplete | Self::Attempted)
    }
}

impl Default for NodeStatus {
    fn default() -> Self {
        Self::Hidden
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renderer coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Treasure found in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasure {
    /// `"true"` or `"false"`, kept as a string to match the dataset.
    pub looted: String,
    /// What the treasure contains.
    pub description: String,
}

impl Treasure {
    /// Whether the treasure was looted.
    pub fn is_looted(&self) -> bool {
        self.looted == "true"
    }
}

/// A scenario in the campaign tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioNode {
    /// Unique identifier.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Completion status.
    pub status: NodeStatus,
    /// Side quests are visible regardless of status.
    pub side: bool,
    /// Free-text player notes.
    pub notes: String,
    /// Scenario book pages.
    pub pages: Vec<u32>,
    /// Page currently shown.
    pub active_page: Option<u32>,
    /// Explicit image reference.
    pub image_url: Option<String>,
    /// Treasures by treasure id.
    pub treasure: BTreeMap<String, Treasure>,
    /// Renderer coordinates.
    pub position: Position,
}

impl ScenarioNode {
    /// Create a node with empty notes, pages and treasure.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, status: NodeStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            side: false,
            notes: String::new(),
            pages: Vec::new(),
            active_page: None,
            image_url: None,
            treasure: BTreeMap::new(),
            position: Position::default(),
        }
    }

    /// Mark as a side quest.
    pub fn with_side(mut self, side: bool) -> Self {
        self.side = side;
        self
    }

    /// Set the position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Whether the general hidden-node rule shows this node.
    pub fn is_visible(&self) -> bool {
        self.status != NodeStatus::Hidden || self.side
    }

    /// Image path of a scenario book page.
    pub fn page_image_url(page: u32) -> String {
        format!("assets/scenarios/{}.jpg", page)
    }

    /// Image for the active page, falling back to the explicit image reference.
    pub fn active_image_url(&self) -> Option<String> {
        match self.active_page {
            Some(page) => Some(Self::page_image_url(page)),
            None => self.image_url.clone(),
        }
    }
}
