//! Core types for the traffic simulation
//!
//! Identifiers, geometry and the tuning constants shared by the vehicle
//! and signal logic.

/// A wrapper type for intersection IDs
///
/// Node ids are dense, so the inner value doubles as an index into every
/// per-node table (signals, positions, graph nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub usize);

/// A 2D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move towards `target` by at most `step`, never past it.
    ///
    /// Returns the new position and the distance actually covered. A target
    /// closer than [`MIN_SEGMENT_LENGTH`] leaves the position unchanged.
    pub fn step_towards(&self, target: &Position, step: f32) -> (Position, f32) {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < MIN_SEGMENT_LENGTH {
            return (*self, 0.0);
        }

        let moved = step.clamp(0.0, len);
        let next = Position {
            x: self.x + dx / len * moved,
            y: self.y + dy / len * moved,
        };
        (next, moved)
    }
}

/// Distance to a red signal below which a vehicle stops and queues
pub const SIGNAL_STOP_DISTANCE: f32 = 40.0;

/// Distance to the next node below which a vehicle snaps onto it
pub const ARRIVAL_DISTANCE: f32 = 5.0;

/// Segments shorter than this are treated as zero-length
pub const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// Ticks a vehicle may wait at a red signal before it gives up and reroutes
pub const STUCK_REROUTE_TICKS: u32 = 200;

/// Attempts spent looking for a routable pair of endpoints
pub const ROUTE_SELECTION_ATTEMPTS: usize = 10;

/// Proximity bands for collision avoidance, nearest first
pub const VERY_CLOSE_DISTANCE: f32 = 20.0;
pub const CLOSE_DISTANCE: f32 = 40.0;
pub const MODERATE_DISTANCE: f32 = 60.0;

/// Lowest crawl speed; also where a stopped vehicle restarts its ramp
pub const CRAWL_SPEED: f32 = 0.2;

/// Range for a vehicle's max speed, drawn once at creation
pub const MIN_MAX_SPEED: f32 = 1.8;
pub const MAX_MAX_SPEED: f32 = 3.6;
