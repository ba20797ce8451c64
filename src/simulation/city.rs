//! Built-in downtown road network
//!
//! 26 named intersections laid out on a 980x680 plane, joined by local
//! streets (weight ~1.0-1.5), diagonal shortcuts and a few cross-town
//! express routes (weight 1.7-2.0).

use super::error::SimResult;
use super::road_network::{Edge, Node, RoadNetwork};

const INTERSECTIONS: [(f32, f32, &str); 26] = [
    // Downtown
    (150.0, 80.0, "Downtown"),
    (300.0, 100.0, "Plaza"),
    (480.0, 90.0, "Market"),
    (650.0, 110.0, "Harbor"),
    (820.0, 85.0, "Bridge"),
    // Upper middle
    (100.0, 200.0, "West End"),
    (250.0, 220.0, "Central"),
    (420.0, 210.0, "Square"),
    (580.0, 230.0, "Park"),
    (750.0, 200.0, "Mall"),
    (880.0, 220.0, "Station"),
    // Commercial district
    (120.0, 330.0, "Arts"),
    (280.0, 350.0, "Business"),
    (450.0, 340.0, "Finance"),
    (620.0, 360.0, "Tech Hub"),
    (800.0, 330.0, "Campus"),
    // Lower middle
    (90.0, 460.0, "South"),
    (240.0, 480.0, "Clinic"),
    (400.0, 470.0, "School"),
    (560.0, 490.0, "Library"),
    (720.0, 460.0, "Sports"),
    (870.0, 480.0, "Arena"),
    // Residential
    (170.0, 580.0, "Gardens"),
    (350.0, 590.0, "Village"),
    (530.0, 580.0, "Heights"),
    (710.0, 590.0, "Bay"),
];

const ROADS: [(usize, usize, f32); 61] = [
    // East-west streets
    (0, 1, 1.2),
    (1, 2, 1.0),
    (2, 3, 1.3),
    (3, 4, 1.1),
    (5, 6, 1.0),
    (6, 7, 1.2),
    (7, 8, 1.1),
    (8, 9, 1.3),
    (9, 10, 1.0),
    (11, 12, 1.5),
    (12, 13, 1.3),
    (13, 14, 1.4),
    (14, 15, 1.2),
    (16, 17, 1.1),
    (17, 18, 1.0),
    (18, 19, 1.2),
    (19, 20, 1.1),
    (20, 21, 1.3),
    (22, 23, 1.0),
    (23, 24, 1.1),
    (24, 25, 1.2),
    // North-south, west side
    (0, 5, 1.0),
    (5, 11, 1.2),
    (11, 16, 1.1),
    (16, 22, 1.0),
    // North-south, centre left
    (1, 6, 1.1),
    (6, 12, 1.3),
    (12, 17, 1.2),
    (17, 22, 1.0),
    (22, 23, 1.0),
    // North-south, centre
    (2, 7, 1.0),
    (7, 13, 1.2),
    (13, 18, 1.1),
    (18, 23, 1.0),
    (23, 24, 1.1),
    // North-south, centre right
    (3, 8, 1.1),
    (8, 14, 1.3),
    (14, 19, 1.2),
    (19, 24, 1.1),
    // North-south, east side
    (4, 9, 1.0),
    (9, 15, 1.2),
    (15, 20, 1.1),
    (20, 25, 1.3),
    (10, 21, 1.4),
    // Diagonal shortcuts
    (0, 6, 1.4),
    (1, 7, 1.2),
    (2, 8, 1.3),
    (6, 13, 1.5),
    (7, 14, 1.3),
    (12, 18, 1.4),
    (13, 19, 1.2),
    (17, 23, 1.1),
    (18, 24, 1.3),
    (5, 12, 1.6),
    (8, 15, 1.5),
    (11, 17, 1.3),
    (14, 20, 1.4),
    // Express routes
    (0, 7, 2.0),
    (4, 15, 1.8),
    (11, 19, 1.9),
    (6, 18, 1.7),
];

/// Build the downtown network
pub fn downtown() -> SimResult<RoadNetwork> {
    let nodes = INTERSECTIONS
        .iter()
        .enumerate()
        .map(|(id, &(x, y, label))| Node::new(id, x, y, label))
        .collect();
    let edges = ROADS
        .iter()
        .map(|&(a, b, weight)| Edge::new(a, b, weight))
        .collect();
    RoadNetwork::new(nodes, edges)
}
