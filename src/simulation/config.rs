//! Simulation configuration

use super::error::{SimError, SimResult};
use super::pathfinding::PathStrategy;
use super::signal::SignalTiming;

/// Default fleet size
pub const DEFAULT_VEHICLE_COUNT: usize = 40;

/// Settings that shape a vehicle set; changing any of them rebuilds it
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub vehicle_count: usize,
    /// Scales vehicle movement and signal timers alike
    pub speed_multiplier: f32,
    pub path_strategy: PathStrategy,
    /// Seed for reproducible simulations; OS entropy when `None`
    pub seed: Option<u64>,
    pub signal_timing: SignalTiming,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            vehicle_count: DEFAULT_VEHICLE_COUNT,
            speed_multiplier: 1.0,
            path_strategy: PathStrategy::Dijkstra,
            seed: None,
            signal_timing: SignalTiming::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.vehicle_count < 1 {
            return Err(SimError::InvalidVehicleCount(self.vehicle_count));
        }
        if !(self.speed_multiplier > 0.0 && self.speed_multiplier.is_finite()) {
            return Err(SimError::InvalidSpeedMultiplier(self.speed_multiplier));
        }
        self.signal_timing.validate()
    }
}
