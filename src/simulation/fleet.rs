//! Vehicle spawning and per-tick updates
//!
//! Vehicles live in a plain `Vec` indexed by spawn order. Updates run in
//! that order, each one seeing the others exactly as they stand at that
//! moment.

use rand::rngs::StdRng;

use super::pathfinding::PathStrategy;
use super::road_network::RoadNetwork;
use super::types::VehicleId;
use super::vehicle::{TickContext, Vehicle, VehicleUpdateResult};

/// Counts of what the fleet did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetTickSummary {
    pub moved: usize,
    pub waiting: usize,
    pub idle: usize,
    pub nodes_reached: usize,
    pub trips_completed: usize,
    pub rerouted: usize,
}

impl FleetTickSummary {
    fn record(&mut self, result: VehicleUpdateResult) {
        match result {
            VehicleUpdateResult::Idle => self.idle += 1,
            VehicleUpdateResult::Routed | VehicleUpdateResult::Moved => self.moved += 1,
            VehicleUpdateResult::Waiting => self.waiting += 1,
            VehicleUpdateResult::Rerouted => self.rerouted += 1,
            VehicleUpdateResult::ReachedNode(_) => self.nodes_reached += 1,
            VehicleUpdateResult::TripCompleted => self.trips_completed += 1,
        }
    }
}

/// Spawn `count` vehicles on random routes
pub fn spawn_fleet(
    count: usize,
    network: &RoadNetwork,
    strategy: PathStrategy,
    rng: &mut StdRng,
) -> Vec<Vehicle> {
    (0..count)
        .map(|index| Vehicle::spawn(VehicleId(index), network, strategy, rng))
        .collect()
}

/// Update the vehicle at `index`, reading every other vehicle in place
pub fn update_vehicle(
    index: usize,
    vehicles: &mut [Vehicle],
    ctx: &mut TickContext<'_>,
) -> Option<VehicleUpdateResult> {
    let (before, rest) = vehicles.split_at_mut(index);
    let (vehicle, after) = rest.split_first_mut()?;
    let others = before.iter().chain(after.iter());
    Some(vehicle.update(others, ctx))
}

/// Update all vehicles in index order
pub fn update_vehicles(vehicles: &mut [Vehicle], ctx: &mut TickContext<'_>) -> FleetTickSummary {
    let mut summary = FleetTickSummary::default();
    for index in 0..vehicles.len() {
        if let Some(result) = update_vehicle(index, vehicles, ctx) {
            summary.record(result);
        }
    }
    summary
}
