//! Core types for the scenario tree.

pub mod node;
pub mod edge;

pub use node::{NodeId, NodeStatus, Position, ScenarioNode, Treasure};
pub use edge::{Edge, EdgeId, EdgeType};
