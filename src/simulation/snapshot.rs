//! Read-only views handed to the presentation layer between ticks

use std::sync::Arc;

use super::road_network::RoadNetwork;
use super::signal::Phase;
use super::types::{NodeId, Position, VehicleId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalView {
    pub node: NodeId,
    pub phase: Phase,
    pub queue_length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub position: Position,
    pub hue: f32,
    pub waiting: bool,
}

/// The simulation as it stood at the end of tick `tick`
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tick: u64,
    /// Shared with the simulation; never changes after construction
    pub network: Arc<RoadNetwork>,
    pub signals: Vec<SignalView>,
    pub vehicles: Vec<VehicleView>,
}
