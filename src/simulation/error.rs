//! Errors raised while building or reconfiguring a simulation
//!
//! Only configuration problems are errors. Unreachable destinations are
//! ordinary `None` results and degenerate geometry is absorbed numerically.

use thiserror::Error;

use super::types::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("road network has no intersections")]
    EmptyNetwork,
    #[error("node ids must be dense: expected {expected:?}, found {found:?}")]
    NonDenseNodeId { expected: NodeId, found: NodeId },
    #[error("edge {edge} references unknown node {node:?}")]
    UnknownNode { edge: usize, node: NodeId },
    #[error("edge {edge} has non-positive weight {weight}")]
    NonPositiveWeight { edge: usize, weight: f32 },
    #[error("vehicle count must be at least 1 (got {0})")]
    InvalidVehicleCount(usize),
    #[error("speed multiplier must be a positive finite number (got {0})")]
    InvalidSpeedMultiplier(f32),
    #[error("signal timing {field} is invalid: min {min:.2}, max {max:.2}")]
    InvalidSignalTiming {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("reconfiguration is only allowed while the simulation is paused")]
    NotPaused,
}

pub type SimResult<T> = Result<T, SimError>;
