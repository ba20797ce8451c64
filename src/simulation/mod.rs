//! Standalone traffic simulation module
//!
//! Road network, route search, signals, vehicles and the scheduler that
//! drives them. Nothing here renders; callers poll [`Snapshot`]s and
//! [`StatsRecord`]s between ticks.

pub mod city;
mod config;
mod error;
mod fleet;
mod pathfinding;
mod road_network;
mod scheduler;
mod signal;
mod snapshot;
mod stats;
mod types;
mod vehicle;
mod world;

pub use config::{SimConfig, DEFAULT_VEHICLE_COUNT};
pub use error::{SimError, SimResult};
pub use fleet::{spawn_fleet, update_vehicle, update_vehicles, FleetTickSummary};
pub use pathfinding::{PathStrategy, Route};
pub use road_network::{Edge, Node, RoadNetwork};
pub use scheduler::{Command, FrameReport, Scheduler};
pub use signal::{Phase, Signal, SignalController, SignalTiming};
pub use snapshot::{SignalView, Snapshot, VehicleView};
pub use stats::{
    StatsAggregator, StatsRecord, TripLedger, DISTANCE_UNIT_SCALE, SAMPLE_INTERVAL_TICKS,
};
pub use types::{
    NodeId, Position, VehicleId, ARRIVAL_DISTANCE, CLOSE_DISTANCE, CRAWL_SPEED, MAX_MAX_SPEED,
    MIN_MAX_SPEED, MODERATE_DISTANCE, ROUTE_SELECTION_ATTEMPTS, SIGNAL_STOP_DISTANCE,
    STUCK_REROUTE_TICKS, VERY_CLOSE_DISTANCE,
};
pub use vehicle::{adapt_speed, select_route, TickContext, Vehicle, VehicleUpdateResult};
pub use world::{SimWorld, TICK_ELAPSED};
