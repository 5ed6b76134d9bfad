//! Progress session.
//!
//! Owns one live graph derived from a shared baseline and keeps it in sync
//! with a [`ProgressStore`]:
//!
//! ```text
//! store.get(STORAGE_KEY) → decode (fallback: baseline) → live graph
//!                                                          ↓
//!            ProgressEvent → mutate → encode → store.set → render
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::codec;
use crate::graph::{GraphError, ScenarioGraph};
use crate::store::ProgressStore;
use crate::types::{NodeId, NodeStatus, Position};
use crate::visibility::{RenderAttributes, VisibilityEngine};
use crate::STORAGE_KEY;

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Graph lookup failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Storage backend failed.
    #[error("Store error: {0}")]
    Store(String),
    /// Progress document could not be serialized.
    #[error("Failed to encode progress: {0}")]
    Encode(#[from] serde_json::Error),
    /// Node exists but is not currently shown.
    #[error("Scenario {0} is not visible and cannot be selected")]
    NotSelectable(NodeId),
}

impl SessionError {
    /// Create from a store error.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::Store(e.to_string())
    }
}

/// A user edit to campaign progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ProgressEvent {
    /// Change a scenario's status.
    SetStatus {
        /// Scenario to change.
        id: NodeId,
        /// New status.
        status: NodeStatus,
    },
    /// Move a scenario on the canvas.
    SetPosition {
        /// Scenario to move.
        id: NodeId,
        /// New position.
        position: Position,
    },
    /// Replace a scenario's notes.
    SetNotes {
        /// Scenario to annotate.
        id: NodeId,
        /// New notes.
        notes: String,
    },
}

impl ProgressEvent {
    /// Scenario the event targets.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::SetStatus { id, .. } | Self::SetPosition { id, .. } | Self::SetNotes { id, .. } => id,
        }
    }
}

/// Live campaign progress bound to a store.
pub struct Session<S: ProgressStore> {
    baseline: Arc<ScenarioGraph>,
    live: ScenarioGraph,
    engine: VisibilityEngine,
    selected: BTreeSet<NodeId>,
    store: S,
    last_saved: Option<String>,
}

impl<S: ProgressStore> Session<S> {
    /// Restore progress from `store` on top of `baseline`.
    ///
    /// A stored document that fails to decode is logged and ignored; the
    /// session then starts from the baseline. Store failures propagate.
    pub fn open(baseline: Arc<ScenarioGraph>, store: S) -> Result<Self, SessionError> {
        let stored = store.get(STORAGE_KEY).map_err(SessionError::from_store)?;

        let live = match stored {
            Some(blob) => match codec::decode(&blob, &baseline) {
                Ok(graph) => {
                    tracing::info!(key = STORAGE_KEY, bytes = blob.len(), "Progress restored");
                    graph
                }
                Err(e) => {
                    tracing::warn!(
                        key = STORAGE_KEY,
                        error = %e,
                        "Stored progress unreadable, starting from baseline"
                    );
                    (*baseline).clone()
                }
            },
            None => (*baseline).clone(),
        };

        Ok(Self {
            baseline,
            live,
            engine: VisibilityEngine::default(),
            selected: BTreeSet::new(),
            store,
            last_saved: None,
        })
    }

    /// Use a different visibility engine.
    pub fn with_engine(mut self, engine: VisibilityEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Live graph.
    pub fn graph(&self) -> &ScenarioGraph {
        &self.live
    }

    /// Baseline graph.
    pub fn baseline(&self) -> &ScenarioGraph {
        &self.baseline
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Currently selected scenarios.
    pub fn selection(&self) -> &BTreeSet<NodeId> {
        &self.selected
    }

    /// Derive render attributes for the live graph.
    pub fn render(&self) -> RenderAttributes {
        self.engine.render(&self.live, &self.selected)
    }

    /// Apply an edit, persist, and re-render.
    pub fn apply(&mut self, event: ProgressEvent) -> Result<RenderAttributes, SessionError> {
        match &event {
            ProgressEvent::SetStatus { id, status } => {
                let previous = self.live.set_status(id.as_str(), *status)?;
                tracing::info!(id = %id, from = %previous, to = %status, "Status changed");
            }
            ProgressEvent::SetPosition { id, position } => {
                self.live.set_position(id.as_str(), *position)?;
            }
            ProgressEvent::SetNotes { id, notes } => {
                self.live.set_notes(id.as_str(), notes.clone())?;
            }
        }

        // A status change can hide a selected scenario.
        let live = &self.live;
        self.selected
            .retain(|id| live.node(id.as_str()).map_or(false, |n| n.is_visible()));

        self.save()?;
        Ok(self.render())
    }

    /// Select a visible scenario.
    pub fn select(&mut self, id: &str) -> Result<RenderAttributes, SessionError> {
        let node = self.live.node(id)?;
        if !node.is_visible() {
            return Err(SessionError::NotSelectable(node.id.clone()));
        }
        self.selected.insert(node.id.clone());
        Ok(self.render())
    }

    /// Drop every selection.
    pub fn clear_selection(&mut self) -> RenderAttributes {
        self.selected.clear();
        self.render()
    }

    /// Persist the live graph.
    ///
    /// Returns `false` when the encoded document matches the last one
    /// written by this session and the write was skipped.
    pub fn save(&mut self) -> Result<bool, SessionError> {
        let document = codec::encode(&self.live, &self.baseline);
        let fingerprint = document.fingerprint();
        if self.last_saved.as_deref() == Some(fingerprint.as_str()) {
            tracing::debug!(fingerprint = %fingerprint, "Progress unchanged, skipping write");
            return Ok(false);
        }

        let json = document.to_json()?;
        self.store
            .set(STORAGE_KEY, &json)
            .map_err(SessionError::from_store)?;
        tracing::debug!(
            records = document.nodes.len(),
            fingerprint = %fingerprint,
            "Progress saved"
        );
        self.last_saved = Some(fingerprint);
        Ok(true)
    }

    /// Discard all progress and persist an empty document.
    pub fn reset(&mut self) -> Result<RenderAttributes, SessionError> {
        self.live = (*self.baseline).clone();
        self.selected.clear();
        self.save()?;
        tracing::info!("Progress reset to baseline");
        Ok(self.render())
    }

    /// Current progress as a V2 JSON document.
    pub fn export(&self) -> Result<String, SessionError> {
        Ok(codec::encode(&self.live, &self.baseline).to_json()?)
    }
}
