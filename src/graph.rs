//! In-memory scenario graph.
//!
//! Topology (edges and the adjacency index) is fixed once the graph is built
//! and shared between clones. Per-node state (status, notes, position) is
//! owned by each graph, so a clone can be mutated without touching the graph
//! it was cloned from.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::types::{Edge, EdgeId, EdgeType, NodeId, NodeStatus, Position, ScenarioNode};

/// Error type for graph operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Node id not present in the graph.
    #[error("Scenario not found: {0}")]
    NotFound(NodeId),
    /// Node id appears twice in the dataset.
    #[error("Duplicate scenario id: {0}")]
    DuplicateNode(NodeId),
    /// Edge references a node that does not exist.
    #[error("Edge {edge} references unknown scenario {missing}")]
    DanglingEdge {
        /// The offending edge.
        edge: Edge,
        /// The endpoint that is missing.
        missing: NodeId,
    },
    /// Position has a NaN or infinite coordinate.
    #[error("Invalid position for scenario {id}: ({x}, {y})")]
    InvalidPosition {
        /// Scenario being moved.
        id: NodeId,
        /// Rejected horizontal coordinate.
        x: f64,
        /// Rejected vertical coordinate.
        y: f64,
    },
}

/// Edge direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges leaving the node.
    Outgoing,
    /// Edges arriving at the node.
    Incoming,
}

/// Adjacency key: (node slot, direction, optional type filter).
type AdjacencyKey = (usize, Direction, Option<EdgeType>);

#[derive(Debug, PartialEq)]
struct Topology {
    edges: Vec<Edge>,
    /// Node id -> slot in the node vector.
    slots: BTreeMap<NodeId, usize>,
    adjacency: HashMap<AdjacencyKey, Vec<EdgeId>>,
}

impl Topology {
    fn build(nodes: &[ScenarioNode], edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut slots = BTreeMap::new();
        for (slot, node) in nodes.iter().enumerate() {
            if slots.insert(node.id.clone(), slot).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        let mut adjacency: HashMap<AdjacencyKey, Vec<EdgeId>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            let id = EdgeId(i);
            let source = *slots.get(&edge.source).ok_or_else(|| GraphError::DanglingEdge {
                edge: edge.clone(),
                missing: edge.source.clone(),
            })?;
            let target = *slots.get(&edge.target).ok_or_else(|| GraphError::DanglingEdge {
                edge: edge.clone(),
                missing: edge.target.clone(),
            })?;

            for filter in [None, Some(edge.edge_type)] {
                adjacency.entry((source, Direction::Outgoing, filter)).or_default().push(id);
                adjacency.entry((target, Direction::Incoming, filter)).or_default().push(id);
            }
        }

        Ok(Self { edges, slots, adjacency })
    }
}

/// Scenario graph: nodes with mutable progress over a fixed topology.
#[derive(Debug, Clone)]
pub struct ScenarioGraph {
    nodes: Vec<ScenarioNode>,
    topology: Arc<Topology>,
}

impl ScenarioGraph {
    /// Build a graph, checking id uniqueness and edge endpoints.
    pub fn new(nodes: Vec<ScenarioNode>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let topology = Topology::build(&nodes, edges)?;
        Ok(Self {
            nodes,
            topology: Arc::new(topology),
        })
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Result<&ScenarioNode, GraphError> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// Whether the graph contains a node.
    pub fn contains(&self, id: &str) -> bool {
        self.topology.slots.contains_key(id)
    }

    /// Status of a node.
    pub fn status(&self, id: &str) -> Result<NodeStatus, GraphError> {
        self.node(id).map(|n| n.status)
    }

    /// All nodes in dataset order.
    pub fn nodes(&self) -> &[ScenarioNode] {
        &self.nodes
    }

    /// All edges in dataset order.
    pub fn edges(&self) -> &[Edge] {
        &self.topology.edges
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.topology.edges.get(id.0)
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.topology.edges.len()
    }

    /// Edges leaving `id`, optionally filtered by type.
    ///
    /// Unknown ids have no edges.
    pub fn outgoing(&self, id: &str, edge_type: Option<EdgeType>) -> EdgeIter<'_> {
        self.adjacent(id, Direction::Outgoing, edge_type)
    }

    /// Edges arriving at `id`, optionally filtered by type.
    ///
    /// Unknown ids have no edges.
    pub fn incoming(&self, id: &str, edge_type: Option<EdgeType>) -> EdgeIter<'_> {
        self.adjacent(id, Direction::Incoming, edge_type)
    }

    /// First edge matching (source, type, target), if the dataset has one.
    pub fn find_edge(&self, source: &str, edge_type: EdgeType, target: &str) -> Option<(EdgeId, &Edge)> {
        self.outgoing(source, Some(edge_type))
            .find(|(_, edge)| edge.target.as_str() == target)
    }

    /// Set a node's status, returning the previous one.
    pub fn set_status(&mut self, id: &str, status: NodeStatus) -> Result<NodeStatus, GraphError> {
        let node = self.node_mut(id)?;
        Ok(std::mem::replace(&mut node.status, status))
    }

    /// Set a node's position. Coordinates must be finite.
    pub fn set_position(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        if !position.is_finite() {
            return Err(GraphError::InvalidPosition {
                id: node.id.clone(),
                x: position.x,
                y: position.y,
            });
        }
        node.position = position;
        Ok(())
    }

    /// Set a node's notes.
    pub fn set_notes(&mut self, id: &str, notes: impl Into<String>) -> Result<(), GraphError> {
        self.node_mut(id)?.notes = notes.into();
        Ok(())
    }

    /// Whether both graphs share the same topology.
    pub fn same_topology(&self, other: &ScenarioGraph) -> bool {
        Arc::ptr_eq(&self.topology, &other.topology) || self.topology == other.topology
    }

    fn slot(&self, id: &str) -> Result<usize, GraphError> {
        self.topology
            .slots
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NotFound(NodeId::from(id)))
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut ScenarioNode, GraphError> {
        let slot = self.slot(id)?;
        Ok(&mut self.nodes[slot])
    }

    fn adjacent(&self, id: &str, direction: Direction, edge_type: Option<EdgeType>) -> EdgeIter<'_> {
        let ids = self
            .topology
            .slots
            .get(id)
            .and_then(|slot| self.topology.adjacency.get(&(*slot, direction, edge_type)))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        EdgeIter {
            edges: &self.topology.edges,
            ids: ids.iter(),
        }
    }
}

impl PartialEq for ScenarioGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.same_topology(other)
    }
}

/// Iterator over `(EdgeId, &Edge)` pairs from the adjacency index.
#[derive(Debug, Clone)]
pub struct EdgeIter<'a> {
    edges: &'a [Edge],
    ids: std::slice::Iter<'a, EdgeId>,
}

impl<'a> Iterator for EdgeIter<'a> {
    type Item = (EdgeId, &'a Edge);

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| (*id, &self.edges[id.0]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for EdgeIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, status: NodeStatus) -> ScenarioNode {
        ScenarioNode::new(id, format!("Scenario {}", id), status)
    }

    fn build_graph() -> ScenarioGraph {
        //  1 --unlocks--> 2 --unlocks--> 3
        //  1 --blocks---> 3
        //  3 --requiredby--> 2
        ScenarioGraph::new(
            vec![
                node("1", NodeStatus::Complete),
                node("2", NodeStatus::Incomplete),
                node("3", NodeStatus::Hidden),
            ],
            vec![
                Edge::new("1", "2", EdgeType::Unlocks),
                Edge::new("2", "3", EdgeType::Unlocks),
                Edge::new("1", "3", EdgeType::Blocks),
                Edge::new("3", "2", EdgeType::RequiredBy),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let graph = build_graph();
        assert_eq!(graph.node("2").unwrap().status, NodeStatus::Incomplete);
        assert!(graph.contains("3"));
        assert_eq!(
            graph.node("99").unwrap_err(),
            GraphError::NotFound(NodeId::from("99"))
        );
    }

    #[test]
    fn test_adjacency_filters() {
        let graph = build_graph();

        let out: Vec<_> = graph.outgoing("1", None).map(|(id, _)| id).collect();
        assert_eq!(out, vec![EdgeId(0), EdgeId(2)]);

        let unlocks: Vec<_> = graph.outgoing("1", Some(EdgeType::Unlocks)).collect();
        assert_eq!(unlocks.len(), 1);
        assert_eq!(unlocks[0].1.target.as_str(), "2");

        let into_2: Vec<_> = graph.incoming("2", None).map(|(_, e)| e.source.as_str()).collect();
        assert_eq!(into_2, vec!["1", "3"]);

        assert_eq!(graph.incoming("2", Some(EdgeType::Blocks)).len(), 0);
        assert_eq!(graph.outgoing("missing", None).len(), 0);
    }

    #[test]
    fn test_find_edge() {
        let graph = build_graph();
        let (id, edge) = graph.find_edge("1", EdgeType::Blocks, "3").unwrap();
        assert_eq!(id, EdgeId(2));
        assert_eq!(edge.edge_type, EdgeType::Blocks);
        assert!(graph.find_edge("1", EdgeType::Unlocks, "3").is_none());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let result = ScenarioGraph::new(
            vec![node("1", NodeStatus::Hidden), node("1", NodeStatus::Complete)],
            vec![],
        );
        assert_eq!(result.unwrap_err(), GraphError::DuplicateNode(NodeId::from("1")));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let result = ScenarioGraph::new(
            vec![node("1", NodeStatus::Hidden)],
            vec![Edge::new("1", "2", EdgeType::Unlocks)],
        );
        match result.unwrap_err() {
            GraphError::DanglingEdge { missing, .. } => assert_eq!(missing.as_str(), "2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let baseline = build_graph();
        let mut live = baseline.clone();

        let previous = live.set_status("3", NodeStatus::Incomplete).unwrap();
        live.set_position("3", Position::new(10.0, -4.0)).unwrap();
        live.set_notes("3", "found a key").unwrap();

        assert_eq!(previous, NodeStatus::Hidden);
        assert_eq!(baseline.status("3").unwrap(), NodeStatus::Hidden);
        assert_eq!(baseline.node("3").unwrap().notes, "");
        assert_eq!(live.node("3").unwrap().position, Position::new(10.0, -4.0));
        assert!(live.same_topology(&baseline));
        assert_ne!(live, baseline);
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let mut graph = build_graph();
        for position in [
            Position::new(f64::NAN, 7.0),
            Position::new(1.0, f64::INFINITY),
            Position::new(f64::NEG_INFINITY, 0.0),
        ] {
            assert!(matches!(
                graph.set_position("3", position),
                Err(GraphError::InvalidPosition { .. })
            ));
        }
        assert_eq!(graph.node("3").unwrap().position, Position::default());
        assert!(matches!(
            graph.set_position("99", Position::new(f64::NAN, 0.0)),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutating_unknown_node_fails() {
        let mut graph = build_graph();
        assert!(matches!(
            graph.set_status("42", NodeStatus::Complete),
            Err(GraphError::NotFound(_))
        ));
    }
}
