//! Main simulation state that ties everything together
//!
//! `SimWorld` owns the network, the signals, the vehicles and the trip
//! ledger. It is created once, and its vehicle set is rebuilt wholesale on
//! reconfiguration or reset.

use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::city;
use super::config::SimConfig;
use super::error::SimResult;
use super::fleet::{self, FleetTickSummary};
use super::road_network::RoadNetwork;
use super::signal::SignalController;
use super::snapshot::{SignalView, Snapshot, VehicleView};
use super::stats::{StatsAggregator, StatsRecord};
use super::types::NodeId;
use super::vehicle::{TickContext, Vehicle};

/// Simulated time that passes in one tick, before the speed multiplier
pub const TICK_ELAPSED: f32 = 1.0;

/// The main simulation world
pub struct SimWorld {
    /// Road network, shared read-only with snapshots
    pub network: Arc<RoadNetwork>,

    /// One signal per intersection
    pub signals: SignalController,

    /// All vehicles, updated in index order
    pub vehicles: Vec<Vehicle>,

    /// Trip ledger and latest stats sample
    pub stats: StatsAggregator,

    config: SimConfig,

    rng: StdRng,
}

impl SimWorld {
    /// Build a world over `network`, rejecting an invalid configuration
    pub fn new(network: RoadNetwork, config: SimConfig) -> SimResult<Self> {
        config.validate()?;

        let mut rng = seeded_rng(config.seed);
        let signals = SignalController::new(network.node_count(), &config.signal_timing, &mut rng);
        let network = Arc::new(network);

        let mut world = Self {
            network,
            signals,
            vehicles: Vec::new(),
            stats: StatsAggregator::new(),
            config,
            rng,
        };
        world.rebuild_fleet();
        world.stats.reset(world.vehicles.len());
        Ok(world)
    }

    /// A world on the built-in downtown network
    pub fn city(config: SimConfig) -> SimResult<Self> {
        Self::new(city::downtown()?, config)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Advance signals, then every vehicle
    pub fn tick(&mut self) -> FleetTickSummary {
        self.signals.advance(TICK_ELAPSED * self.config.speed_multiplier);

        let mut ctx = TickContext {
            network: &self.network,
            strategy: self.config.path_strategy,
            speed_multiplier: self.config.speed_multiplier,
            signals: &mut self.signals,
            ledger: &mut self.stats.ledger,
            rng: &mut self.rng,
        };
        fleet::update_vehicles(&mut self.vehicles, &mut ctx)
    }

    /// Throw away every vehicle and spawn a fresh set
    pub fn rebuild_fleet(&mut self) {
        self.vehicles = fleet::spawn_fleet(
            self.config.vehicle_count,
            &self.network,
            self.config.path_strategy,
            &mut self.rng,
        );
        let idle = self.vehicles.iter().filter(|v| !v.has_route()).count();
        debug!(
            "Spawned {} vehicles using {} routing ({} idle)",
            self.vehicles.len(),
            self.config.path_strategy.name(),
            idle
        );
    }

    /// Validate and adopt `config`, rebuilding the vehicle set and taking a
    /// fresh stats sample. The trip ledger carries over.
    ///
    /// On error nothing changes.
    pub fn apply_config(&mut self, config: SimConfig) -> SimResult<()> {
        config.validate()?;

        if config.seed.is_some() && config.seed != self.config.seed {
            self.rng = seeded_rng(config.seed);
        }
        if config.signal_timing != self.config.signal_timing {
            self.signals = SignalController::new(
                self.network.node_count(),
                &config.signal_timing,
                &mut self.rng,
            );
        }
        self.config = config;
        self.rebuild_fleet();
        self.sample_stats();
        Ok(())
    }

    /// Fresh vehicles and an empty trip ledger
    pub fn reset(&mut self) {
        self.rebuild_fleet();
        self.stats.reset(self.vehicles.len());
    }

    pub fn sample_stats(&mut self) -> &StatsRecord {
        self.stats.sample(&self.vehicles)
    }

    pub fn snapshot(&self, tick: u64) -> Snapshot {
        let signals = self
            .signals
            .signals()
            .iter()
            .enumerate()
            .map(|(index, signal)| SignalView {
                node: NodeId(index),
                phase: signal.phase,
                queue_length: signal.queue_length,
            })
            .collect();

        let vehicles = self
            .vehicles
            .iter()
            .map(|vehicle| VehicleView {
                id: vehicle.id,
                position: vehicle.position,
                hue: vehicle.hue,
                waiting: vehicle.waiting,
            })
            .collect();

        Snapshot {
            tick,
            network: Arc::clone(&self.network),
            signals,
            vehicles,
        }
    }

    /// Log a summary of the world state
    pub fn log_summary(&self) {
        let stats = StatsRecord::derive(&self.vehicles, &self.stats.ledger);
        let red = self.signals.signals().iter().filter(|s| s.is_red()).count();
        let queued: u32 = self.signals.signals().iter().map(|s| s.queue_length).sum();

        info!(
            "Intersections: {}, Roads: {}, Red signals: {}, Queued: {}",
            self.network.node_count(),
            self.network.edge_count(),
            red,
            queued
        );
        info!(
            "Vehicles: {}, Avg speed: {:.2}, Congestion: {:.0}%",
            stats.active_vehicles, stats.average_speed, stats.congestion_percent
        );
        info!(
            "Completed journeys: {}, Distance: {:.1} km, Forced reroutes: {}",
            stats.throughput, stats.total_distance, stats.forced_reroutes
        );
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
