//! Road network graph for pathfinding
//!
//! An undirected, weighted graph of intersections that is validated once
//! and never mutated afterwards.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::error::{SimError, SimResult};
use super::types::{NodeId, Position, MIN_SEGMENT_LENGTH};

/// An intersection in the road network
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub label: String,
}

impl Node {
    pub fn new(id: usize, x: f32, y: f32, label: impl Into<String>) -> Self {
        Self {
            id: NodeId(id),
            position: Position::new(x, y),
            label: label.into(),
        }
    }
}

/// A road segment, traversable in both directions at the same cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: f32,
}

impl Edge {
    pub fn new(a: usize, b: usize, weight: f32) -> Self {
        Self {
            a: NodeId(a),
            b: NodeId(b),
            weight,
        }
    }
}

/// Immutable road network
///
/// Node ids are dense, so `NodeId(i)` is also the petgraph `NodeIndex` `i`
/// and the index into every per-node table.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    graph: UnGraph<NodeId, f32>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    heuristic_scale: f32,
}

impl RoadNetwork {
    /// Validate and build a network.
    ///
    /// Fails if the node list is empty or its ids are not `0..N` in order,
    /// or if an edge names an unknown node or carries a non-positive weight.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> SimResult<Self> {
        if nodes.is_empty() {
            return Err(SimError::EmptyNetwork);
        }

        let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
        for (index, node) in nodes.iter().enumerate() {
            if node.id != NodeId(index) {
                return Err(SimError::NonDenseNodeId {
                    expected: NodeId(index),
                    found: node.id,
                });
            }
            graph.add_node(node.id);
        }

        for (index, edge) in edges.iter().enumerate() {
            for node in [edge.a, edge.b] {
                if node.index() >= nodes.len() {
                    return Err(SimError::UnknownNode { edge: index, node });
                }
            }
            if !(edge.weight > 0.0 && edge.weight.is_finite()) {
                return Err(SimError::NonPositiveWeight {
                    edge: index,
                    weight: edge.weight,
                });
            }
            graph.add_edge(
                NodeIndex::new(edge.a.index()),
                NodeIndex::new(edge.b.index()),
                edge.weight,
            );
        }

        let heuristic_scale = admissible_scale(&nodes, &edges);

        Ok(Self {
            graph,
            nodes,
            edges,
            heuristic_scale,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.node(id).map(|node| node.position)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All `(neighbor, weight)` pairs reachable over one edge from `id`.
    ///
    /// Every edge is listed from both ends. Unknown ids have no neighbors.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, f32)> + '_ {
        let node = NodeIndex::new(id.index());
        self.contains(id)
            .then(|| self.graph.edges(node))
            .into_iter()
            .flatten()
            .map(move |edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other], *edge.weight())
            })
    }

    /// Factor turning straight-line distance into a lower bound on route cost
    pub fn heuristic_scale(&self) -> f32 {
        self.heuristic_scale
    }

    pub(crate) fn graph(&self) -> &UnGraph<NodeId, f32> {
        &self.graph
    }
}

/// Smallest weight-per-unit-length over all edges.
///
/// Any route is at least as long as the straight line between its ends, and
/// each of its edges costs at least `scale` per unit of length, so
/// `scale * straight_line` never overestimates the remaining cost.
fn admissible_scale(nodes: &[Node], edges: &[Edge]) -> f32 {
    edges
        .iter()
        .filter_map(|edge| {
            let length = nodes[edge.a.index()]
                .position
                .distance(&nodes[edge.b.index()].position);
            (length >= MIN_SEGMENT_LENGTH).then(|| edge.weight / length)
        })
        .reduce(f32::min)
        .unwrap_or(0.0)
}
