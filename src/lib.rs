//! # scenario-tree
//!
//! Campaign scenario tree with derived visibility and delta persistence.
//!
//! The kernel answers two questions:
//!
//! > Given every scenario's status, which scenarios and relationships are
//! > **shown**, and how is each scenario **colored**?
//!
//! > Which changes against the baseline dataset must be **persisted** to
//! > restore this campaign later?
//!
//! ## Architecture
//!
//! ```text
//! Baseline JSON → ScenarioGraph ──clone──→ live graph ← ProgressEvent
//!                      ↑                       ↓
//!             decode (V1 | V2)          VisibilityEngine → RenderAttributes
//!                      ↑                       ↓
//!               ProgressStore  ←──────── encode (V2 delta)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same statuses + same selection → identical render attributes
//! - Encoding an unchanged graph yields an empty delta
//! - Decoding an encoded graph over the same baseline restores status,
//!   notes and position exactly

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod graph;
pub mod dataset;
pub mod codec;
pub mod visibility;
pub mod store;
pub mod session;
pub mod canonical;

// Re-exports
pub use types::{Edge, EdgeId, EdgeType, NodeId, NodeStatus, Position, ScenarioNode, Treasure};
pub use graph::{Direction, GraphError, ScenarioGraph};
pub use dataset::{load_baseline, DatasetError, ScenarioData};
pub use codec::{decode, encode, CodecError, FormatVersion, ProgressDocument};
pub use visibility::{
    CampaignRules, ColorClass, EdgeAttributes, NodeAttributes, RenderAttributes, VisibilityEngine,
};
pub use store::{FileProgressStore, FileStoreError, InMemoryProgressStore, ProgressStore};
pub use session::{ProgressEvent, Session, SessionError};

/// Version marker written into every persisted progress document.
pub const FORMAT_VERSION: &str = "2";

/// Storage key the progress document lives under.
pub const STORAGE_KEY: &str = "gloomhavenScenarioTree";
