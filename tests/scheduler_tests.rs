//! Scheduler commands, sampling cadence and stats derivation

use city_traffic::simulation::{
    Command, PathStrategy, Position, Scheduler, SimConfig, SimError, SimWorld,
    StatsRecord, TripLedger, Vehicle, VehicleId, SAMPLE_INTERVAL_TICKS,
};

fn scheduler(vehicle_count: usize) -> Scheduler {
    let config = SimConfig {
        vehicle_count,
        seed: Some(17),
        ..SimConfig::default()
    };
    Scheduler::new(SimWorld::city(config).unwrap())
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let zero_vehicles = SimConfig {
        vehicle_count: 0,
        ..SimConfig::default()
    };
    assert_eq!(
        SimWorld::city(zero_vehicles).err(),
        Some(SimError::InvalidVehicleCount(0))
    );

    for speed_multiplier in [0.0, -1.0, f32::INFINITY] {
        let config = SimConfig {
            speed_multiplier,
            ..SimConfig::default()
        };
        assert!(matches!(
            SimWorld::city(config),
            Err(SimError::InvalidSpeedMultiplier(_))
        ));
    }
}

#[test]
fn test_paused_scheduler_does_not_tick() {
    let mut scheduler = scheduler(5);
    assert!(!scheduler.is_running());

    let report = scheduler.frame();
    assert!(report.tick.is_none());
    assert_eq!(scheduler.tick_count(), 0);
    assert_eq!(scheduler.stats().active_vehicles, 5);
}

#[test]
fn test_stats_sampled_on_fixed_cadence() {
    let mut scheduler = scheduler(8);
    scheduler.start();

    for tick in 1..=SAMPLE_INTERVAL_TICKS * 3 {
        let report = scheduler.frame();
        assert!(report.tick.is_some());
        assert_eq!(report.sampled, tick % SAMPLE_INTERVAL_TICKS == 0);
    }

    assert_eq!(scheduler.tick_count(), SAMPLE_INTERVAL_TICKS * 3);
    let expected = StatsRecord::derive(
        &scheduler.world().vehicles,
        &scheduler.world().stats.ledger,
    );
    assert_eq!(scheduler.stats(), &expected);
}

#[test]
fn test_reconfigure_requires_pause() {
    let mut scheduler = scheduler(6);
    scheduler.start();

    let config = SimConfig {
        vehicle_count: 12,
        ..scheduler.world().config().clone()
    };
    assert_eq!(scheduler.reconfigure(config.clone()), Err(SimError::NotPaused));
    assert_eq!(scheduler.world().vehicles.len(), 6);

    scheduler.pause();
    assert_eq!(scheduler.stats().active_vehicles, 6);
    assert!(scheduler.reconfigure(config).is_ok());
    assert_eq!(scheduler.world().vehicles.len(), 12);
    assert_eq!(scheduler.stats().active_vehicles, 12);
    let expected = StatsRecord::derive(
        &scheduler.world().vehicles,
        &scheduler.world().stats.ledger,
    );
    assert_eq!(scheduler.stats(), &expected);
}

#[test]
fn test_rejected_reconfigure_leaves_state_untouched() {
    let mut scheduler = scheduler(6);
    scheduler.start();
    for _ in 0..10 {
        scheduler.frame();
    }
    scheduler.pause();

    let before: Vec<Position> = scheduler
        .world()
        .vehicles
        .iter()
        .map(|v| v.position)
        .collect();
    let previous = scheduler.world().config().clone();

    let invalid = SimConfig {
        speed_multiplier: 0.0,
        ..previous.clone()
    };
    assert!(scheduler.reconfigure(invalid).is_err());

    let after: Vec<Position> = scheduler
        .world()
        .vehicles
        .iter()
        .map(|v| v.position)
        .collect();
    assert_eq!(before, after);
    assert_eq!(scheduler.world().config(), &previous);
}

#[test]
fn test_reconfigure_keeps_ledger_and_reset_clears_it() {
    let mut scheduler = scheduler(4);
    scheduler.world_mut().stats.ledger.record_trip(150.0);
    scheduler.start();
    for _ in 0..5 {
        scheduler.frame();
    }
    scheduler.pause();

    let config = SimConfig {
        vehicle_count: 7,
        speed_multiplier: 2.0,
        path_strategy: PathStrategy::HeuristicGuided,
        ..scheduler.world().config().clone()
    };
    scheduler.reconfigure(config).unwrap();
    assert_eq!(scheduler.world().vehicles.len(), 7);
    assert_eq!(
        scheduler.world().config().path_strategy,
        PathStrategy::HeuristicGuided
    );
    assert!(scheduler.world().stats.ledger.completed_journeys() >= 1);
    assert_eq!(scheduler.tick_count(), 5);

    scheduler.start();
    scheduler.reset();
    assert!(!scheduler.is_running());
    assert_eq!(scheduler.tick_count(), 0);
    assert_eq!(scheduler.world().stats.ledger, TripLedger::default());
    assert_eq!(scheduler.world().vehicles.len(), 7);
    assert_eq!(scheduler.stats().throughput, 0);
    assert_eq!(scheduler.stats().active_vehicles, 7);
}

#[test]
fn test_queued_commands_apply_at_frame_boundary_in_order() {
    let mut scheduler = scheduler(3);
    let config = SimConfig {
        vehicle_count: 9,
        ..scheduler.world().config().clone()
    };

    scheduler.enqueue(Command::Start);
    scheduler.enqueue(Command::Reconfigure(config.clone()));
    assert_eq!(scheduler.tick_count(), 0);

    let report = scheduler.frame();
    assert!(report.tick.is_some());
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].1, SimError::NotPaused);
    assert_eq!(scheduler.world().vehicles.len(), 3);

    scheduler.enqueue(Command::Pause);
    scheduler.enqueue(Command::Reconfigure(config));
    let report = scheduler.frame();
    assert!(report.tick.is_none());
    assert!(report.rejected.is_empty());
    assert_eq!(scheduler.world().vehicles.len(), 9);
}

#[test]
fn test_snapshot_reflects_world() {
    let mut scheduler = scheduler(10);
    scheduler.start();
    scheduler.frame();

    let snapshot = scheduler.snapshot();
    let world = scheduler.world();
    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.network.node_count(), 26);
    assert_eq!(snapshot.signals.len(), 26);
    assert_eq!(snapshot.vehicles.len(), 10);
    for (view, vehicle) in snapshot.vehicles.iter().zip(&world.vehicles) {
        assert_eq!(view.id, vehicle.id);
        assert_eq!(view.position, vehicle.position);
        assert_eq!(view.waiting, vehicle.waiting);
        assert!((0.0..360.0).contains(&view.hue));
    }
    let queued: u32 = snapshot.signals.iter().map(|s| s.queue_length).sum();
    let waiting = world.vehicles.iter().filter(|v| v.waiting).count() as u32;
    assert_eq!(queued, waiting);
}

#[test]
fn test_stats_derivation() {
    let mut ledger = TripLedger::default();
    ledger.record_trip(250.0);
    ledger.record_trip(150.0);
    ledger.record_reroute();

    let mut vehicles: Vec<Vehicle> = (0..4)
        .map(|i| Vehicle::new(VehicleId(i), 3.0, 0.0, Position::default()))
        .collect();
    vehicles[0].speed = 1.0;
    vehicles[1].speed = 2.0;
    vehicles[2].speed = 0.0;
    vehicles[2].waiting = true;
    vehicles[3].speed = 0.0;
    vehicles[3].waiting = true;

    let record = StatsRecord::derive(&vehicles, &ledger);
    assert!((record.average_speed - 0.75).abs() < 1e-6);
    assert!((record.congestion_percent - 50.0).abs() < 1e-4);
    assert_eq!(record.throughput, 2);
    assert!((record.total_distance - 4.0).abs() < 1e-9);
    assert_eq!(record.active_vehicles, 4);
    assert_eq!(record.forced_reroutes, 1);

    let empty = StatsRecord::derive(&[], &TripLedger::default());
    assert_eq!(empty, StatsRecord::default());
}
