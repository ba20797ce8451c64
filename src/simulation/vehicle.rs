//! Vehicle movement logic for the traffic simulation
//!
//! A vehicle is a plain record; [`Vehicle::update`] runs one tick of its
//! state machine: finish trip, wait at a red signal, adapt speed to nearby
//! traffic, then move towards the next node on its route.

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use super::pathfinding::{PathStrategy, Route};
use super::road_network::RoadNetwork;
use super::signal::SignalController;
use super::stats::TripLedger;
use super::types::{
    NodeId, Position, VehicleId, ARRIVAL_DISTANCE, CLOSE_DISTANCE, CRAWL_SPEED, MAX_MAX_SPEED,
    MIN_MAX_SPEED, MODERATE_DISTANCE, ROUTE_SELECTION_ATTEMPTS, SIGNAL_STOP_DISTANCE,
    STUCK_REROUTE_TICKS, VERY_CLOSE_DISTANCE,
};

const VERY_CLOSE_DECAY: f32 = 0.85;
const CLOSE_DECAY: f32 = 0.92;
const CLOSE_FLOOR: f32 = 0.4;
const MODERATE_DECAY: f32 = 0.96;
const MODERATE_FLOOR: f32 = 0.7;
const ACCELERATION: f32 = 1.03;

/// What a vehicle did during its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// No route; route selection was retried and failed again
    Idle,
    /// Previously idle, now has a fresh route
    Routed,
    /// Halted at a red signal
    Waiting,
    /// Waited too long at a red signal and took a new route
    Rerouted,
    /// Moved along the current road
    Moved,
    /// Snapped onto the next node of the route
    ReachedNode(NodeId),
    /// Finished the route and was handed a new one
    TripCompleted,
}

/// Everything a vehicle reads or writes besides its own record and its
/// neighbours' positions
pub struct TickContext<'a> {
    pub network: &'a RoadNetwork,
    pub strategy: PathStrategy,
    pub speed_multiplier: f32,
    pub signals: &'a mut SignalController,
    pub ledger: &'a mut TripLedger,
    pub rng: &'a mut StdRng,
}

/// A vehicle in the traffic simulation
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    /// `None` while idle after a failed route selection
    pub route: Option<Route>,
    /// Index of the route node most recently reached
    pub route_index: usize,
    pub position: Position,
    pub speed: f32,
    pub max_speed: f32,
    /// Display hue in degrees, fixed for the vehicle's lifetime
    pub hue: f32,
    pub waiting: bool,
    /// Consecutive ticks spent halted at a red signal
    pub stuck_ticks: u32,
    /// Distance covered on the current trip
    pub trip_distance: f32,
}

impl Vehicle {
    /// A vehicle parked at `position` with no route, starting at full speed
    pub fn new(id: VehicleId, max_speed: f32, hue: f32, position: Position) -> Self {
        Self {
            id,
            route: None,
            route_index: 0,
            position,
            speed: max_speed,
            max_speed,
            hue,
            waiting: false,
            stuck_ticks: 0,
            trip_distance: 0.0,
        }
    }

    /// Create a vehicle with a random max speed and colour, on a random route
    pub fn spawn(
        id: VehicleId,
        network: &RoadNetwork,
        strategy: PathStrategy,
        rng: &mut StdRng,
    ) -> Self {
        let max_speed = rng.random_range(MIN_MAX_SPEED..MAX_MAX_SPEED);
        let hue = rng.random_range(0.0..360.0);
        let parked_at = NodeId(rng.random_range(0..network.node_count().max(1)));
        let position = network.position(parked_at).unwrap_or_default();

        let mut vehicle = Vehicle::new(id, max_speed, hue, position);
        vehicle.start_new_trip(network, strategy, rng);
        vehicle
    }

    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }

    /// The node the vehicle is currently driving towards
    pub fn next_node(&self) -> Option<NodeId> {
        self.route.as_ref()?.get(self.route_index + 1)
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.route.as_ref().map(Route::destination)
    }

    /// Put the vehicle on the first node of `route` and clear trip progress
    pub fn begin_trip(&mut self, route: Route, network: &RoadNetwork) {
        if let Some(origin) = network.position(route.origin()) {
            self.position = origin;
        }
        self.route = Some(route);
        self.route_index = 0;
        self.trip_distance = 0.0;
    }

    /// Replace the current route with one between two random nodes.
    ///
    /// Returns `false` and leaves the vehicle idle if no routable pair was
    /// found within the attempt budget.
    pub fn start_new_trip(
        &mut self,
        network: &RoadNetwork,
        strategy: PathStrategy,
        rng: &mut StdRng,
    ) -> bool {
        match select_route(network, strategy, rng) {
            Some(route) => {
                self.begin_trip(route, network);
                true
            }
            None => {
                debug!("Vehicle {:?} found no route, staying idle", self.id);
                self.route = None;
                self.route_index = 0;
                self.trip_distance = 0.0;
                false
            }
        }
    }

    /// Run one tick of the vehicle state machine.
    ///
    /// `others` are the other vehicles as they stand right now; vehicles
    /// updated earlier in the same tick have already moved.
    pub fn update<'v>(
        &mut self,
        others: impl Iterator<Item = &'v Vehicle>,
        ctx: &mut TickContext<'_>,
    ) -> VehicleUpdateResult {
        let Some(route) = self.route.as_ref() else {
            self.waiting = false;
            return if self.start_new_trip(ctx.network, ctx.strategy, ctx.rng) {
                VehicleUpdateResult::Routed
            } else {
                VehicleUpdateResult::Idle
            };
        };

        if self.route_index >= route.last_index() {
            ctx.ledger.record_trip(self.trip_distance);
            self.start_new_trip(ctx.network, ctx.strategy, ctx.rng);
            return VehicleUpdateResult::TripCompleted;
        }

        let next = route.get(self.route_index + 1);
        let Some((next, target)) =
            next.and_then(|node| ctx.network.position(node).map(|position| (node, position)))
        else {
            self.route = None;
            return VehicleUpdateResult::Idle;
        };

        let distance = self.position.distance(&target);

        if ctx.signals.is_red(next) && distance < SIGNAL_STOP_DISTANCE {
            self.speed = 0.0;
            self.waiting = true;
            ctx.signals.enqueue(next);
            self.stuck_ticks += 1;

            if self.stuck_ticks > STUCK_REROUTE_TICKS {
                debug!(
                    "Vehicle {:?} stuck at {:?} for {} ticks, rerouting",
                    self.id, next, self.stuck_ticks
                );
                ctx.ledger.record_reroute();
                self.start_new_trip(ctx.network, ctx.strategy, ctx.rng);
                self.stuck_ticks = 0;
                return VehicleUpdateResult::Rerouted;
            }
            return VehicleUpdateResult::Waiting;
        }

        self.waiting = false;
        self.stuck_ticks = 0;

        let nearest = others
            .map(|other| other.position.distance(&self.position))
            .fold(f32::INFINITY, f32::min);
        self.speed = adapt_speed(self.speed, self.max_speed, nearest);

        if distance < ARRIVAL_DISTANCE {
            self.route_index += 1;
            self.position = target;
            return VehicleUpdateResult::ReachedNode(next);
        }

        let (position, moved) = self
            .position
            .step_towards(&target, self.speed * ctx.speed_multiplier);
        self.position = position;
        self.trip_distance += moved;
        VehicleUpdateResult::Moved
    }
}

/// Banded speed control based on the distance to the nearest other vehicle.
///
/// The result always lies in `[0, max_speed]`.
pub fn adapt_speed(speed: f32, max_speed: f32, nearest: f32) -> f32 {
    let max_speed = max_speed.max(0.0);
    let adapted = if nearest < VERY_CLOSE_DISTANCE {
        (speed * VERY_CLOSE_DECAY).max(CRAWL_SPEED)
    } else if nearest < CLOSE_DISTANCE {
        (speed * CLOSE_DECAY).max(max_speed * CLOSE_FLOOR)
    } else if nearest < MODERATE_DISTANCE {
        (speed * MODERATE_DECAY).max(max_speed * MODERATE_FLOOR)
    } else {
        // A vehicle leaving a red light has speed zero; start the ramp from
        // a crawl or it would never pick up again.
        (speed.max(CRAWL_SPEED) * ACCELERATION).min(max_speed)
    };
    adapted.clamp(0.0, max_speed)
}

/// Pick two distinct random nodes and route between them.
///
/// The destination is drawn from the nodes other than the start, so every
/// attempt is a real trip; attempts are spent on unreachable pairs.
pub fn select_route(
    network: &RoadNetwork,
    strategy: PathStrategy,
    rng: &mut StdRng,
) -> Option<Route> {
    let node_count = network.node_count();
    if node_count < 2 {
        return None;
    }

    for _ in 0..ROUTE_SELECTION_ATTEMPTS {
        let start = rng.random_range(0..node_count);
        let mut end = rng.random_range(0..node_count - 1);
        if end >= start {
            end += 1;
        }
        if let Some(route) = strategy.find(network, NodeId(start), NodeId(end)) {
            return Some(route);
        }
    }

    None
}
