//! Scenario tests for the simulator driven the way a frame loop drives it.

use snowpile::prelude::*;

fn field(capacity: usize, initial: usize) -> Simulator {
    let config = SnowConfig::default()
        .with_capacity(capacity)
        .with_initial_count(initial)
        .with_bounds(200.0, 100.0)
        .with_seed(42);
    Simulator::new(config).unwrap()
}

// ============================================================================
// Settling
// ============================================================================

#[test]
fn test_single_flake_lands_on_ground() {
    let mut sim = field(10, 0);
    assert!(sim.insert(Particle::straight(DVec2::new(10.0, -100.0), 1.0)));

    let mut ticks = 0;
    while sim.particles()[0].active {
        sim.tick(1.0 / 60.0);
        ticks += 1;
        assert!(ticks <= 200, "flake never landed");
    }

    let flake = sim.particles()[0];
    assert_eq!(ticks, 200);
    assert!(!flake.active);
    assert_eq!(flake.position.y, 100.0);
    // Level neighbourhood: the increment goes to the left neighbour.
    assert_eq!(sim.pile_height(9), 4.0);
    assert_eq!(sim.pile_height(10), 0.0);
    assert_eq!(sim.pile().total_layers(), 1);
}

#[test]
fn test_flakes_at_same_bin_spread_outward() {
    let mut sim = field(10, 0);
    sim.insert(Particle::straight(DVec2::new(10.0, 99.0), 1.0));
    sim.insert(Particle::straight(DVec2::new(10.0, 98.0), 1.0));

    sim.tick(0.0);
    assert_eq!(sim.pile_height(9), 4.0);
    sim.tick(0.0);
    // Left shoulder is raised, so the right one grows.
    assert_eq!(sim.pile_height(11), 4.0);
    assert_eq!(sim.pile_height(10), 0.0);

    // Both shoulders raised: the centre grows, then left again.
    assert_eq!(sim.settle(10.0), Some(10));
    assert_eq!(sim.settle(10.0), Some(9));
    assert_eq!(sim.pile_height(9), 8.0);
}

#[test]
fn test_second_flake_lands_on_first() {
    let mut sim = field(10, 0);
    // Raise bins 9, 10 and 11 to one layer each.
    for _ in 0..3 {
        sim.settle(10.0);
    }
    sim.insert(Particle::straight(DVec2::new(10.0, 90.0), 2.0));
    for _ in 0..5 {
        sim.tick(0.0);
    }
    let flake = sim.particles()[0];
    assert!(!flake.active);
    assert_eq!(flake.position.y, 96.0);
}

#[test]
fn test_settled_flake_never_reactivates_without_shake() {
    let mut sim = field(500, 500);
    let mut settled = vec![false; sim.len()];

    for _ in 0..400 {
        sim.tick(0.016);
        for (i, p) in sim.particles().iter().enumerate() {
            if settled[i] {
                assert!(!p.active, "particle {} reactivated", i);
            }
            settled[i] |= !p.active;
        }
    }
    assert!(settled.iter().any(|&s| s));
}

#[test]
fn test_pile_heights_never_shrink() {
    let mut sim = field(500, 500);
    let mut previous: Vec<(i64, f64)> = Vec::new();

    for _ in 0..400 {
        sim.tick(0.016);
        for &(bin, height) in &previous {
            assert!(sim.pile_height(bin) >= height);
        }
        previous = sim.pile().iter().collect();
        assert!(previous.iter().all(|&(_, h)| h > 0.0));
    }
}

#[test]
fn test_height_query_is_stable() {
    let mut sim = field(200, 200);
    for _ in 0..300 {
        sim.tick(0.016);
    }
    for bin in -5..205 {
        assert_eq!(sim.pile_height(bin), sim.pile_height(bin));
    }
}

// ============================================================================
// Shake
// ============================================================================

#[test]
fn test_shake_resets_everything() {
    let mut sim = field(300, 300);
    for _ in 0..400 {
        sim.tick(0.016);
    }
    assert!(sim.settled_count() > 0);
    assert!(!sim.pile().is_empty());

    sim.on_shake();

    assert!(sim.pile().is_empty());
    for bin in -10..210 {
        assert_eq!(sim.pile_height(bin), 0.0);
    }
    assert_eq!(sim.settled_count(), 0);
    assert_eq!(sim.active_count(), 300);
    for p in sim.particles() {
        assert!(p.active);
        assert!(p.position.x >= 0.0 && p.position.x < 200.0);
        assert!(p.position.y >= 0.0 && p.position.y < 100.0);
        assert!(p.fall_speed >= 0.5 && p.fall_speed < 2.0);
        assert!(p.rotation_speed >= 0.02 && p.rotation_speed < 0.07);
    }
}

#[test]
fn test_motion_below_threshold_is_ignored() {
    let mut sim = field(50, 50);
    for _ in 0..300 {
        sim.tick(0.016);
    }
    let layers = sim.pile().total_layers();
    assert!(!sim.on_motion(MotionSample::new(3.0, -9.8, 14.9)));
    assert_eq!(sim.pile().total_layers(), layers);
    assert_eq!(sim.shakes(), 0);
}

#[test]
fn test_snow_falls_again_after_shake() {
    let mut sim = field(100, 100);
    for _ in 0..400 {
        sim.tick(0.016);
    }
    sim.on_shake();
    for _ in 0..400 {
        sim.tick(0.016);
    }
    assert!(sim.settled_count() > 0);
    assert_eq!(sim.pile().total_layers(), sim.settled_count() as u64);
}

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn test_spawn_adds_falling_flakes() {
    let mut sim = field(100, 10);
    let before = sim.active_count();

    let report = sim.spawn_at(50.0, 0.0, 5);

    assert_eq!(report, SpawnReport { spawned: 5, recycled: 0, rejected: 0 });
    assert_eq!(sim.active_count(), before + 5);
    for p in &sim.particles()[10..] {
        assert_eq!(p.position, DVec2::new(50.0, 0.0));
        assert!(p.active);
    }
}

#[test]
fn test_spawn_recycles_settled_at_capacity() {
    let mut sim = field(20, 20);
    while sim.settled_count() < 5 {
        sim.tick(0.016);
    }
    let settled_before = sim.settled_count();

    let report = sim.spawn_at(50.0, 0.0, 5);

    assert_eq!(report.recycled, 5);
    assert_eq!(sim.len(), 20);
    assert_eq!(sim.settled_count(), settled_before - 5);
    let at_spawn = sim
        .particles()
        .iter()
        .filter(|p| p.active && p.position == DVec2::new(50.0, 0.0))
        .count();
    assert_eq!(at_spawn, 5);
}

#[test]
fn test_spawn_gesture_drives_simulator() {
    let mut sim = field(100, 0);
    let mut gesture = SpawnGesture::from_config(sim.config());
    let interval = sim.config().spawn_interval();

    let first = gesture.press(30.0, 10.0).unwrap();
    sim.apply(first);
    for _ in 0..3 {
        if let Some(req) = gesture.advance(interval) {
            sim.apply(req);
        }
    }
    gesture.release();
    assert_eq!(gesture.advance(interval), None);

    assert_eq!(sim.len(), 4 * sim.config().spawn_batch);
}

// ============================================================================
// Rendering view
// ============================================================================

#[test]
fn test_frame_matches_state() {
    let mut sim = field(200, 200);
    for _ in 0..250 {
        sim.tick(0.016);
    }
    let frame = sim.frame();
    assert_eq!(frame.ground_level(), 100.0);
    assert_eq!(frame.flake_vertices().len(), sim.active_count());
    assert_eq!(frame.pile_columns().len(), sim.pile().len());
    for column in frame.pile_columns() {
        assert_eq!(column.ground, 100.0);
        assert!(column.height > 0.0);
    }
}

#[test]
fn test_resize_moves_ground() {
    let mut sim = field(10, 0);
    sim.insert(Particle::straight(DVec2::new(10.0, 0.0), 1.0));
    sim.set_field_bounds(200.0, 20.0).unwrap();
    for _ in 0..20 {
        sim.tick(0.0);
    }
    let flake = sim.particles()[0];
    assert!(!flake.active);
    assert_eq!(flake.position.y, 20.0);
}
