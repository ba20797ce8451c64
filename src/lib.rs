//! City Traffic Simulation Library
//!
//! Vehicles routing across a weighted city road network, obeying traffic
//! signals and keeping their distance from each other.

pub mod simulation;
