//! Traffic signals, one per intersection
//!
//! Each signal cycles Green -> Red -> Green forever. Durations are drawn
//! once at construction so neighbouring intersections do not switch in
//! lockstep.

use rand::Rng;

use super::error::{SimError, SimResult};
use super::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Green,
    Red,
}

impl Phase {
    pub fn flipped(self) -> Phase {
        match self {
            Phase::Green => Phase::Red,
            Phase::Red => Phase::Green,
        }
    }
}

/// Bounds for the randomised signal plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalTiming {
    pub green_min: f32,
    pub green_max: f32,
    pub red_min: f32,
    pub red_max: f32,
    /// Upper bound for the time a signal has already spent in its first phase
    pub max_initial_offset: f32,
    /// Every n-th intersection starts green, the others red
    pub green_every: usize,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            green_min: 70.0,
            green_max: 100.0,
            red_min: 50.0,
            red_max: 80.0,
            max_initial_offset: 40.0,
            green_every: 3,
        }
    }
}

impl SignalTiming {
    pub fn validate(&self) -> SimResult<()> {
        let ranges = [
            ("green duration", self.green_min, self.green_max),
            ("red duration", self.red_min, self.red_max),
        ];
        for (field, min, max) in ranges {
            if !(min > 0.0 && min <= max && max.is_finite()) {
                return Err(SimError::InvalidSignalTiming { field, min, max });
            }
        }
        if !(self.max_initial_offset >= 0.0 && self.max_initial_offset.is_finite()) {
            return Err(SimError::InvalidSignalTiming {
                field: "initial offset",
                min: 0.0,
                max: self.max_initial_offset,
            });
        }
        Ok(())
    }
}

/// Signal state for a single intersection
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub phase: Phase,
    /// Time spent in the current phase
    pub timer: f32,
    pub green_duration: f32,
    pub red_duration: f32,
    /// Vehicles halted at this signal during the current tick
    pub queue_length: u32,
}

impl Signal {
    pub fn new(phase: Phase, green_duration: f32, red_duration: f32) -> Self {
        Self {
            phase,
            timer: 0.0,
            green_duration,
            red_duration,
            queue_length: 0,
        }
    }

    fn random(index: usize, timing: &SignalTiming, rng: &mut impl Rng) -> Self {
        let phase = if timing.green_every > 0 && index % timing.green_every == 0 {
            Phase::Green
        } else {
            Phase::Red
        };
        let mut signal = Signal::new(
            phase,
            uniform(rng, timing.green_min, timing.green_max),
            uniform(rng, timing.red_min, timing.red_max),
        );
        signal.timer = uniform(rng, 0.0, timing.max_initial_offset);
        signal
    }

    pub fn active_duration(&self) -> f32 {
        match self.phase {
            Phase::Green => self.green_duration,
            Phase::Red => self.red_duration,
        }
    }

    pub fn is_red(&self) -> bool {
        self.phase == Phase::Red
    }

    /// Advance the phase timer, flipping once the active duration is reached.
    /// Returns `true` if the phase changed.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        self.timer += elapsed;
        if self.timer >= self.active_duration() {
            self.phase = self.phase.flipped();
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

/// Uniform sample from `[min, max)`, or exactly `min` for an empty range
fn uniform(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// All signals in the network, indexed by node id
#[derive(Debug, Clone, Default)]
pub struct SignalController {
    signals: Vec<Signal>,
}

impl SignalController {
    /// One randomised signal per node
    pub fn new(node_count: usize, timing: &SignalTiming, rng: &mut impl Rng) -> Self {
        let signals = (0..node_count)
            .map(|index| Signal::random(index, timing, rng))
            .collect();
        Self { signals }
    }

    /// A controller with an explicit signal plan, one entry per node
    pub fn from_signals(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    /// Start of tick: advance every timer and clear the queues so the
    /// vehicle pass can recount them.
    pub fn advance(&mut self, elapsed: f32) {
        for signal in &mut self.signals {
            signal.queue_length = 0;
            signal.advance(elapsed);
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&Signal> {
        self.signals.get(node.index())
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Signal> {
        self.signals.get_mut(node.index())
    }

    /// Intersections without a signal never stop traffic
    pub fn is_red(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(Signal::is_red)
    }

    /// Count one more vehicle halted at `node` this tick
    pub fn enqueue(&mut self, node: NodeId) {
        if let Some(signal) = self.get_mut(node) {
            signal.queue_length += 1;
        }
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
