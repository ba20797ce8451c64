use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use city_traffic::simulation::{PathStrategy, Scheduler, SimConfig, SimWorld};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Dijkstra's algorithm
    Dijkstra,
    /// A* with a straight-line distance heuristic
    Heuristic,
}

impl From<Strategy> for PathStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Dijkstra => PathStrategy::Dijkstra,
            Strategy::Heuristic => PathStrategy::HeuristicGuided,
        }
    }
}

#[derive(Parser)]
#[command(name = "city_traffic")]
#[command(about = "Headless city traffic simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Number of vehicles on the road
    #[arg(long, default_value = "40")]
    vehicles: usize,

    /// Speed multiplier for vehicles and signal timers
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Route search strategy
    #[arg(long, value_enum, default_value = "dijkstra")]
    strategy: Strategy,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks between summary reports
    #[arg(long, default_value = "300")]
    report_every: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SimConfig {
        vehicle_count: cli.vehicles,
        speed_multiplier: cli.speed,
        path_strategy: cli.strategy.into(),
        seed: cli.seed,
        ..SimConfig::default()
    };

    run_headless(config, cli.ticks, cli.report_every)
}

/// Run the simulation without a display, one frame per tick
fn run_headless(config: SimConfig, ticks: u64, report_every: u64) -> Result<()> {
    info!("Running city traffic simulation in headless mode...");
    info!(
        "Ticks: {}, Vehicles: {}, Speed: x{}, Routing: {}",
        ticks,
        config.vehicle_count,
        config.speed_multiplier,
        config.path_strategy.name()
    );

    let world = SimWorld::city(config).context("Invalid simulation configuration")?;
    let mut scheduler = Scheduler::new(world);

    info!("=== Initial state ===");
    scheduler.world().log_summary();

    scheduler.start();
    while scheduler.tick_count() < ticks {
        scheduler.frame();

        let tick = scheduler.tick_count();
        if report_every > 0 && tick % report_every == 0 && tick < ticks {
            info!("--- After tick {} ---", tick);
            scheduler.world().log_summary();
        }
    }
    scheduler.pause();

    let stats = scheduler.world_mut().sample_stats().clone();
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks: {}", scheduler.tick_count());
    info!("Active vehicles: {}", stats.active_vehicles);
    info!("Average speed: {:.2}", stats.average_speed);
    info!("Congestion: {:.0}%", stats.congestion_percent);
    info!("Throughput: {}", stats.throughput);
    info!("Total distance: {:.1} km", stats.total_distance);
    info!("Forced reroutes: {}", stats.forced_reroutes);

    Ok(())
}
