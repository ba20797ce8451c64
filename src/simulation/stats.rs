//! Aggregate statistics for the simulation
//!
//! The trip ledger accumulates over the whole run; the stats record is a
//! periodic sample derived from the ledger and the current vehicle states.

use super::vehicle::Vehicle;

/// Ticks between two stats samples
pub const SAMPLE_INTERVAL_TICKS: u64 = 30;

/// Ledger distance units per reported distance unit
pub const DISTANCE_UNIT_SCALE: f64 = 100.0;

/// Lifetime totals across every vehicle, cleared only by a full reset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripLedger {
    completed_journeys: u64,
    total_distance: f64,
    forced_reroutes: u64,
}

impl TripLedger {
    pub fn record_trip(&mut self, distance: f32) {
        self.completed_journeys += 1;
        self.total_distance += f64::from(distance.max(0.0));
    }

    pub fn record_reroute(&mut self) {
        self.forced_reroutes += 1;
    }

    pub fn completed_journeys(&self) -> u64 {
        self.completed_journeys
    }

    /// Distance in raw position units
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn forced_reroutes(&self) -> u64 {
        self.forced_reroutes
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One stats sample, as shown to the presentation layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsRecord {
    pub average_speed: f32,
    pub congestion_percent: f32,
    pub throughput: u64,
    /// Ledger distance divided by [`DISTANCE_UNIT_SCALE`]
    pub total_distance: f64,
    pub active_vehicles: usize,
    pub forced_reroutes: u64,
}

impl StatsRecord {
    /// Derive a record without touching any simulation state
    pub fn derive(vehicles: &[Vehicle], ledger: &TripLedger) -> Self {
        let active_vehicles = vehicles.len();
        let (average_speed, congestion_percent) = if active_vehicles == 0 {
            (0.0, 0.0)
        } else {
            let total_speed: f32 = vehicles.iter().map(|vehicle| vehicle.speed).sum();
            let waiting = vehicles.iter().filter(|vehicle| vehicle.waiting).count();
            (
                total_speed / active_vehicles as f32,
                waiting as f32 / active_vehicles as f32 * 100.0,
            )
        };

        Self {
            average_speed,
            congestion_percent,
            throughput: ledger.completed_journeys(),
            total_distance: ledger.total_distance() / DISTANCE_UNIT_SCALE,
            active_vehicles,
            forced_reroutes: ledger.forced_reroutes(),
        }
    }
}

/// Owns the trip ledger and the most recent sample
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    pub ledger: TripLedger,
    latest: StatsRecord,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a fresh sample and keep it as the latest record
    pub fn sample(&mut self, vehicles: &[Vehicle]) -> &StatsRecord {
        self.latest = StatsRecord::derive(vehicles, &self.ledger);
        &self.latest
    }

    pub fn latest(&self) -> &StatsRecord {
        &self.latest
    }

    /// Zero the ledger and publish a blank record for `active_vehicles`
    pub fn reset(&mut self, active_vehicles: usize) {
        self.ledger.reset();
        self.latest = StatsRecord {
            active_vehicles,
            ..StatsRecord::default()
        };
    }
}
