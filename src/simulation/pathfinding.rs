//! Shortest-route search over the road network
//!
//! Two strategies share one contract: [`PathStrategy::find`] returns the
//! cheapest [`Route`] between two intersections, or `None` when there is
//! nothing to drive (same endpoints, unknown ids, unreachable destination).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;

use super::road_network::RoadNetwork;
use super::types::NodeId;

/// Which search a vehicle set uses, chosen once when the set is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStrategy {
    /// Plain Dijkstra, ties settled by ascending node id
    #[default]
    Dijkstra,
    /// A* guided by scaled straight-line distance to the destination
    HeuristicGuided,
}

impl PathStrategy {
    pub fn find(self, network: &RoadNetwork, start: NodeId, end: NodeId) -> Option<Route> {
        if start == end || !network.contains(start) || !network.contains(end) {
            return None;
        }

        match self {
            PathStrategy::Dijkstra => dijkstra(network, start, end),
            PathStrategy::HeuristicGuided => heuristic_guided(network, start, end),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PathStrategy::Dijkstra => "dijkstra",
            PathStrategy::HeuristicGuided => "heuristic-guided",
        }
    }
}

/// An ordered list of at least two intersections joined by roads
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<NodeId>,
    cost: f32,
}

impl Route {
    /// Build a route through explicit waypoints.
    ///
    /// Each consecutive pair must share a road; parallel roads are costed at
    /// the cheapest one. Returns `None` for fewer than two waypoints or a
    /// missing road.
    pub fn through(network: &RoadNetwork, nodes: &[NodeId]) -> Option<Route> {
        if nodes.len() < 2 {
            return None;
        }

        let mut cost = 0.0;
        for pair in nodes.windows(2) {
            cost += network
                .neighbors(pair[0])
                .filter(|(next, _)| *next == pair[1])
                .map(|(_, weight)| weight)
                .reduce(f32::min)?;
        }

        Some(Route {
            nodes: nodes.to_vec(),
            cost,
        })
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Index of the final node
    pub fn last_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Total edge weight along the route
    pub fn cost(&self) -> f32 {
        self.cost
    }
}

fn dijkstra(network: &RoadNetwork, start: NodeId, end: NodeId) -> Option<Route> {
    let n = network.node_count();
    let mut dist = vec![f32::INFINITY; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut settled = vec![false; n];

    // Min-heap on (distance, id): equal distances pop in ascending id order,
    // which is the same frontier order as a linear scan with id tie-break.
    let mut frontier = BinaryHeap::new();
    dist[start.index()] = 0.0;
    frontier.push(Reverse((OrderedFloat(0.0f32), start)));

    while let Some(Reverse((OrderedFloat(cost), node))) = frontier.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if node == end {
            return Some(Route {
                nodes: reconstruct(&prev, start, end),
                cost,
            });
        }

        for (next, weight) in network.neighbors(node) {
            if settled[next.index()] {
                continue;
            }
            let candidate = cost + weight;
            if candidate < dist[next.index()] {
                dist[next.index()] = candidate;
                prev[next.index()] = Some(node);
                frontier.push(Reverse((OrderedFloat(candidate), next)));
            }
        }
    }

    None
}

fn reconstruct(prev: &[Option<NodeId>], start: NodeId, end: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![end];
    let mut current = end;
    while current != start {
        match prev[current.index()] {
            Some(previous) => {
                nodes.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    nodes.reverse();
    nodes
}

fn heuristic_guided(network: &RoadNetwork, start: NodeId, end: NodeId) -> Option<Route> {
    let goal = network.position(end)?;
    let scale = network.heuristic_scale();
    let graph = network.graph();
    let target = NodeIndex::new(end.index());

    let (cost, path) = astar(
        graph,
        NodeIndex::new(start.index()),
        |node| node == target,
        |edge| *edge.weight(),
        |node| {
            network
                .position(graph[node])
                .map_or(0.0, |position| position.distance(&goal) * scale)
        },
    )?;

    Some(Route {
        nodes: path.into_iter().map(|node| graph[node]).collect(),
        cost,
    })
}
