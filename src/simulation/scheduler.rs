//! Frame-paced driver for the simulation
//!
//! The presentation layer calls [`Scheduler::frame`] once per refresh.
//! Commands queued with [`Scheduler::enqueue`] are applied at the start of
//! the next frame, so they never land in the middle of a tick.

use std::collections::VecDeque;

use log::{info, warn};

use super::config::SimConfig;
use super::error::{SimError, SimResult};
use super::fleet::FleetTickSummary;
use super::snapshot::Snapshot;
use super::stats::{StatsRecord, SAMPLE_INTERVAL_TICKS};
use super::world::SimWorld;

/// External control inputs
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Pause,
    /// Pause, rebuild the vehicles and clear the trip ledger
    Reset,
    /// Adopt a new configuration; only accepted while paused
    Reconfigure(SimConfig),
}

/// Outcome of one frame
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Present if a tick ran during this frame
    pub tick: Option<FleetTickSummary>,
    /// A fresh stats sample was taken
    pub sampled: bool,
    /// Commands that were refused, with the reason
    pub rejected: Vec<(Command, SimError)>,
}

pub struct Scheduler {
    world: SimWorld,
    running: bool,
    tick_count: u64,
    sample_interval: u64,
    pending: VecDeque<Command>,
}

impl Scheduler {
    /// A paused scheduler around `world`
    pub fn new(world: SimWorld) -> Self {
        Self {
            world,
            running: false,
            tick_count: 0,
            sample_interval: SAMPLE_INTERVAL_TICKS,
            pending: VecDeque::new(),
        }
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The most recent stats sample
    pub fn stats(&self) -> &StatsRecord {
        self.world.stats.latest()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot(self.tick_count)
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("Simulation started at tick {}", self.tick_count);
        }
        self.running = true;
    }

    pub fn pause(&mut self) {
        if self.running {
            info!("Simulation paused at tick {}", self.tick_count);
        }
        self.running = false;
    }

    /// Pause, respawn every vehicle and zero the trip ledger and tick count
    pub fn reset(&mut self) {
        self.running = false;
        self.tick_count = 0;
        self.world.reset();
        info!("Simulation reset with {} vehicles", self.world.vehicles.len());
    }

    /// Adopt a new configuration. Refused while running or if invalid, in
    /// which case the current simulation is left as it was.
    pub fn reconfigure(&mut self, config: SimConfig) -> SimResult<()> {
        if self.running {
            return Err(SimError::NotPaused);
        }
        self.world.apply_config(config)?;
        info!(
            "Reconfigured: {} vehicles, speed x{}, {} routing",
            self.world.config().vehicle_count,
            self.world.config().speed_multiplier,
            self.world.config().path_strategy.name()
        );
        Ok(())
    }

    pub fn apply(&mut self, command: Command) -> SimResult<()> {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::Reconfigure(config) => self.reconfigure(config)?,
        }
        Ok(())
    }

    /// Queue a command for the next frame boundary
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// One refresh: apply queued commands, then tick if running
    pub fn frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        while let Some(command) = self.pending.pop_front() {
            if let Err(err) = self.apply(command.clone()) {
                warn!("Rejected {:?}: {}", command, err);
                report.rejected.push((command, err));
            }
        }

        if self.running {
            let before = self.tick_count;
            report.tick = Some(self.step());
            report.sampled = self.is_sample_tick(before + 1);
        }

        report
    }

    /// Run exactly one tick, whether or not the scheduler is running
    pub fn step(&mut self) -> FleetTickSummary {
        let summary = self.world.tick();
        self.tick_count += 1;
        if self.is_sample_tick(self.tick_count) {
            self.world.sample_stats();
        }
        summary
    }

    fn is_sample_tick(&self, tick: u64) -> bool {
        self.sample_interval > 0 && tick % self.sample_interval == 0
    }
}
