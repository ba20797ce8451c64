//! Road network construction and route search

use city_traffic::simulation::{
    city, Edge, Node, NodeId, PathStrategy, RoadNetwork, Route, SimError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f32 = 1e-4;

fn square() -> RoadNetwork {
    // 0 --- 1
    // |     |
    // 2 --- 3
    RoadNetwork::new(
        vec![
            Node::new(0, 0.0, 0.0, "NW"),
            Node::new(1, 10.0, 0.0, "NE"),
            Node::new(2, 0.0, 10.0, "SW"),
            Node::new(3, 10.0, 10.0, "SE"),
        ],
        vec![
            Edge::new(0, 1, 1.0),
            Edge::new(1, 3, 1.0),
            Edge::new(0, 2, 1.0),
            Edge::new(2, 3, 1.0),
        ],
    )
    .unwrap()
}

fn assert_valid_route(network: &RoadNetwork, route: &Route, start: NodeId, end: NodeId) {
    assert!(route.nodes().len() >= 2);
    assert_eq!(route.origin(), start);
    assert_eq!(route.destination(), end);
    let recomputed =
        Route::through(network, route.nodes()).expect("consecutive nodes share a road");
    assert!((recomputed.cost() - route.cost()).abs() < TOLERANCE);
}

#[test]
fn test_city_network_shape() {
    let network = city::downtown().unwrap();
    assert_eq!(network.node_count(), 26);
    assert_eq!(network.edge_count(), 61);
    assert_eq!(network.node(NodeId(0)).unwrap().label, "Downtown");
    assert_eq!(network.node(NodeId(25)).unwrap().label, "Bay");
}

#[test]
fn test_city_network_is_connected() {
    let network = city::downtown().unwrap();
    for end in 1..network.node_count() {
        assert!(
            PathStrategy::Dijkstra
                .find(&network, NodeId(0), NodeId(end))
                .is_some(),
            "node {} unreachable from 0",
            end
        );
    }
}

#[test]
fn test_neighbors_are_symmetric() {
    let network = city::downtown().unwrap();
    for node in network.nodes() {
        for (neighbor, weight) in network.neighbors(node.id) {
            assert!(
                network
                    .neighbors(neighbor)
                    .any(|(back, back_weight)| back == node.id && back_weight == weight),
                "{:?} -> {:?} has no way back",
                node.id,
                neighbor
            );
        }
    }
}

#[test]
fn test_neighbors_of_unknown_node_is_empty() {
    let network = square();
    assert_eq!(network.neighbors(NodeId(99)).count(), 0);
}

#[test]
fn test_edge_to_unknown_node_is_rejected() {
    let result = RoadNetwork::new(
        vec![Node::new(0, 0.0, 0.0, "A"), Node::new(1, 1.0, 0.0, "B")],
        vec![Edge::new(0, 1, 1.0), Edge::new(1, 7, 1.0)],
    );
    assert_eq!(
        result.unwrap_err(),
        SimError::UnknownNode {
            edge: 1,
            node: NodeId(7)
        }
    );
}

#[test]
fn test_non_positive_weight_is_rejected() {
    for weight in [0.0, -1.0, f32::NAN] {
        let result = RoadNetwork::new(
            vec![Node::new(0, 0.0, 0.0, "A"), Node::new(1, 1.0, 0.0, "B")],
            vec![Edge::new(0, 1, weight)],
        );
        assert!(matches!(
            result,
            Err(SimError::NonPositiveWeight { edge: 0, .. })
        ));
    }
}

#[test]
fn test_sparse_node_ids_are_rejected() {
    let result = RoadNetwork::new(
        vec![Node::new(0, 0.0, 0.0, "A"), Node::new(2, 1.0, 0.0, "B")],
        vec![],
    );
    assert_eq!(
        result.unwrap_err(),
        SimError::NonDenseNodeId {
            expected: NodeId(1),
            found: NodeId(2)
        }
    );
    assert_eq!(
        RoadNetwork::new(vec![], vec![]).unwrap_err(),
        SimError::EmptyNetwork
    );
}

#[test]
fn test_strategies_agree_on_cost_for_every_pair() {
    let network = city::downtown().unwrap();
    for start in 0..network.node_count() {
        for end in 0..network.node_count() {
            if start == end {
                continue;
            }
            let (start, end) = (NodeId(start), NodeId(end));
            let dijkstra = PathStrategy::Dijkstra.find(&network, start, end).unwrap();
            let guided = PathStrategy::HeuristicGuided
                .find(&network, start, end)
                .unwrap();

            assert_valid_route(&network, &dijkstra, start, end);
            assert_valid_route(&network, &guided, start, end);
            assert!(
                (dijkstra.cost() - guided.cost()).abs() < TOLERANCE,
                "{:?} -> {:?}: dijkstra {} vs guided {}",
                start,
                end,
                dijkstra.cost(),
                guided.cost()
            );
        }
    }
}

#[test]
fn test_heuristic_never_overestimates() {
    let network = city::downtown().unwrap();
    let scale = network.heuristic_scale();
    assert!(scale > 0.0);

    for start in network.nodes() {
        for end in network.nodes() {
            if start.id == end.id {
                continue;
            }
            let route = PathStrategy::Dijkstra
                .find(&network, start.id, end.id)
                .unwrap();
            let estimate = start.position.distance(&end.position) * scale;
            assert!(estimate <= route.cost() + TOLERANCE);
        }
    }
}

#[test]
fn test_dijkstra_prefers_cheaper_detour() {
    let network = RoadNetwork::new(
        vec![
            Node::new(0, 0.0, 0.0, "A"),
            Node::new(1, 10.0, 0.0, "B"),
            Node::new(2, 5.0, 5.0, "C"),
        ],
        vec![Edge::new(0, 1, 5.0), Edge::new(0, 2, 1.0), Edge::new(2, 1, 1.0)],
    )
    .unwrap();

    for strategy in [PathStrategy::Dijkstra, PathStrategy::HeuristicGuided] {
        let route = strategy.find(&network, NodeId(0), NodeId(1)).unwrap();
        assert_eq!(route.nodes(), &[NodeId(0), NodeId(2), NodeId(1)]);
        assert!((route.cost() - 2.0).abs() < TOLERANCE);
    }
}

#[test]
fn test_dijkstra_breaks_ties_by_lowest_id() {
    let network = square();
    let route = PathStrategy::Dijkstra
        .find(&network, NodeId(0), NodeId(3))
        .unwrap();
    assert_eq!(route.nodes(), &[NodeId(0), NodeId(1), NodeId(3)]);

    let again = PathStrategy::Dijkstra
        .find(&network, NodeId(0), NodeId(3))
        .unwrap();
    assert_eq!(route, again);
}

#[test]
fn test_same_start_and_end_is_no_route() {
    let network = square();
    for strategy in [PathStrategy::Dijkstra, PathStrategy::HeuristicGuided] {
        assert!(strategy.find(&network, NodeId(2), NodeId(2)).is_none());
        assert!(strategy.find(&network, NodeId(0), NodeId(42)).is_none());
    }
}

#[test]
fn test_disconnected_components_have_no_route() {
    let network = RoadNetwork::new(
        vec![
            Node::new(0, 0.0, 0.0, "A"),
            Node::new(1, 10.0, 0.0, "B"),
            Node::new(2, 100.0, 0.0, "C"),
            Node::new(3, 110.0, 0.0, "D"),
        ],
        vec![Edge::new(0, 1, 1.0), Edge::new(2, 3, 1.0)],
    )
    .unwrap();

    for strategy in [PathStrategy::Dijkstra, PathStrategy::HeuristicGuided] {
        assert!(strategy.find(&network, NodeId(0), NodeId(3)).is_none());
        assert!(strategy.find(&network, NodeId(2), NodeId(1)).is_none());
        assert!(strategy.find(&network, NodeId(2), NodeId(3)).is_some());
    }
}

#[test]
fn test_route_through_requires_roads() {
    let network = square();
    assert!(Route::through(&network, &[NodeId(0), NodeId(3)]).is_none());
    assert!(Route::through(&network, &[NodeId(0)]).is_none());
    let route = Route::through(&network, &[NodeId(0), NodeId(2), NodeId(3)]).unwrap();
    assert!((route.cost() - 2.0).abs() < TOLERANCE);
    assert_eq!(route.last_index(), 2);
}

#[test]
fn test_strategies_agree_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..200 {
        let node_count = rng.random_range(2..12);
        let nodes = (0..node_count)
            .map(|id| {
                let x = rng.random_range(0.0..500.0);
                let y = rng.random_range(0.0..500.0);
                Node::new(id, x, y, format!("N{}", id))
            })
            .collect();
        // Sparse enough to leave some pairs unreachable; self-loops and
        // parallel roads are allowed
        let edge_count = rng.random_range(0..node_count * 2);
        let edges = (0..edge_count)
            .map(|_| {
                Edge::new(
                    rng.random_range(0..node_count),
                    rng.random_range(0..node_count),
                    rng.random_range(0.1..3.0),
                )
            })
            .collect();
        let network = RoadNetwork::new(nodes, edges).unwrap();

        for start in 0..node_count {
            for end in 0..node_count {
                let (start, end) = (NodeId(start), NodeId(end));
                let dijkstra = PathStrategy::Dijkstra.find(&network, start, end);
                let guided = PathStrategy::HeuristicGuided.find(&network, start, end);
                match (dijkstra, guided) {
                    (None, None) => {}
                    (Some(dijkstra), Some(guided)) => {
                        assert_valid_route(&network, &dijkstra, start, end);
                        assert_valid_route(&network, &guided, start, end);
                        assert!(
                            (dijkstra.cost() - guided.cost()).abs() < 1e-3,
                            "{:?} -> {:?}: dijkstra {} vs guided {}",
                            start,
                            end,
                            dijkstra.cost(),
                            guided.cost()
                        );
                    }
                    (dijkstra, guided) => panic!(
                        "{:?} -> {:?}: dijkstra {:?} vs guided {:?}",
                        start, end, dijkstra, guided
                    ),
                }
            }
        }
    }
}
