//! Integration tests for the salvo engine.

use std::collections::HashMap;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use trailburst_core::constants::{CROSS_SECTION_SIDES, FRAME_TIME, QUAD_INDICES};
use trailburst_core::params::*;
use trailburst_core::trail::{TrailStore, TrailStoreConfig};
use trailburst_core::types::{Target, TargetId};
use trailburst_ribbon::RibbonMesh;

use crate::engine::*;
use crate::error::SalvoError;
use crate::trail_store::RingTrailStore;

const DT: f32 = FRAME_TIME;

/// Stiff constant-speed pursuit with no bursts, so every shot lands.
fn pursuit_config(shoot_max: usize) -> SalvoConfig {
    SalvoConfig {
        shoot_max,
        params: MissileParams {
            start_speed: 10.0,
            max_speed: 10.0,
            accel_time: 0.0,
            torque_level: 400.0,
            damper: 40.0,
            hit_range: 1.0,
            ..MissileParams::for_variant(MissileVariant::Homing)
        },
        store: TrailStoreConfig {
            trail_count: 8,
            life: 2.0,
            ..TrailStoreConfig::default()
        },
        ..SalvoConfig::default()
    }
}

/// Longest edge over the triangles a mesh would draw this frame.
fn longest_drawn_edge(mesh: &RibbonMesh) -> f32 {
    let vertices = mesh.vertices();
    mesh.drawable_indices()
        .chunks_exact(3)
        .flat_map(|tri| {
            let [a, b, c] = [0, 1, 2].map(|i| vertices[tri[i] as usize]);
            [a.distance(b), b.distance(c), c.distance(a)]
        })
        .fold(0.0, f32::max)
}

fn engine_with_target(config: SalvoConfig, at: Vec3) -> SalvoEngine {
    let mut engine = SalvoEngine::new(config).unwrap();
    engine.set_target(TargetId(0), at);
    engine
}

// ---- Config ----

#[test]
fn test_default_config_is_valid() {
    SalvoConfig::default().validate().unwrap();
}

#[test]
fn test_config_json_fills_defaults() {
    let config = SalvoConfig::from_json(r#"{"seed": 7, "front": false}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert!(!config.front);
    assert_eq!(config.shoot_max, SalvoConfig::default().shoot_max);
    assert_eq!(config.params, MissileParams::for_variant(MissileVariant::Maneuver));
}

#[test]
fn test_config_json_roundtrip() {
    let config = pursuit_config(5);
    let json = serde_json::to_string(&config).unwrap();
    let back: SalvoConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);
}

#[test]
fn test_engine_rejects_bad_config() {
    let config = SalvoConfig {
        front_power: f32::NAN,
        ..SalvoConfig::default()
    };
    assert!(matches!(
        SalvoEngine::new(config),
        Err(SalvoError::Params(_))
    ));

    let config = SalvoConfig {
        store: TrailStoreConfig {
            trail_count: 0,
            ..TrailStoreConfig::default()
        },
        ..SalvoConfig::default()
    };
    assert!(SalvoEngine::new(config).is_err(), "empty store must be rejected");

    let config = SalvoConfig {
        store: TrailStoreConfig {
            life: 1e9,
            ..TrailStoreConfig::default()
        },
        ..SalvoConfig::default()
    };
    assert!(
        matches!(SalvoEngine::new(config), Err(SalvoError::Params(_))),
        "oversized trail life must be rejected before allocating"
    );
}

// ---- Store and ribbon together ----

#[test]
fn test_store_ribbon_draws_no_long_triangles() {
    let config = TrailStoreConfig {
        trail_count: 1,
        life: 0.1, // 6 nodes
        update_distance_min: 0.5,
        thickness: 0.25,
        ..TrailStoreConfig::default()
    };
    let mut store = RingTrailStore::new(config);
    let mut mesh = RibbonMesh::new(1, store.node_count(), config.thickness).unwrap();
    let limit = 1.0 + 2.0 * config.thickness + 1e-3;

    let start = Vec3::new(100.0, 0.0, 0.0);
    store.start_trail(0, start, Vec3::Z, 1.0).unwrap();
    store.dispatch(0.0);
    // Partly filled ring, then enough samples to wrap it twice.
    for step in 1..=14 {
        let now = step as f32 * 0.01;
        store
            .update_trail(0, start + Vec3::Z * step as f32, Vec3::Z, 1.0)
            .unwrap();
        store.dispatch(now);
        mesh.rebuild(&store.snapshot(), now, config.life).unwrap();

        let edge = longest_drawn_edge(&mesh);
        assert!(
            edge <= limit,
            "after {step} updates a drawn triangle spans {edge} units on a 1-unit-spaced trail"
        );
    }
}

// ---- Launch directions ----

#[test]
fn test_launch_directions_spread_around_axis() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let directions = launch_directions(8, 0.5, true, &mut rng);
    assert_eq!(directions.len(), 8);

    let mut angles: Vec<f32> = directions
        .iter()
        .map(|d| {
            assert_eq!(d.z, 0.5, "front salvo fires toward +Z");
            assert!((d.truncate().length() - 1.0).abs() < 1e-5);
            d.y.atan2(d.x).to_degrees().rem_euclid(360.0)
        })
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap());

    // Neighbours are 45 degrees apart, give or take 45% jitter on each side.
    for pair in angles.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= 45.0 * 0.1 - 1e-3 && gap <= 45.0 * 1.9 + 1e-3, "gap {gap}");
    }
}

#[test]
fn test_launch_directions_rear_salvo() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let directions = launch_directions(3, 2.0, false, &mut rng);
    assert!(directions.iter().all(|d| d.z == -2.0));
    assert!(launch_directions(0, 1.0, true, &mut rng).is_empty());
}

// ---- Targets ----

#[test]
fn test_set_target_moves_existing_entity() {
    let mut engine = SalvoEngine::new(pursuit_config(4)).unwrap();
    engine.set_target(TargetId(1), Vec3::ZERO);
    engine.set_target(TargetId(1), Vec3::new(0.0, 0.0, 5.0));
    let count = engine.world().query::<&Target>().iter().count();
    assert_eq!(count, 1, "same id should not spawn twice");

    assert!(engine.remove_target(TargetId(1)));
    assert!(!engine.remove_target(TargetId(1)));
}

#[test]
fn test_fire_without_targets_queues_nothing() {
    let mut engine = SalvoEngine::new(pursuit_config(4)).unwrap();
    assert_eq!(engine.fire_salvo().unwrap(), 0);
    let snapshot = engine.tick(DT).unwrap();
    assert!(snapshot.projectiles.is_empty());
    assert_eq!(snapshot.queued, 0);
}

#[test]
fn test_shoot_max_capped_at_pool_size() {
    let mut engine = engine_with_target(pursuit_config(50), Vec3::new(0.0, 0.0, 40.0));
    assert_eq!(engine.fire_salvo().unwrap(), 8);
}

#[test]
fn test_one_launch_per_tick_at_most() {
    let mut engine = engine_with_target(pursuit_config(6), Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();

    let mut in_flight = 0;
    let mut ticks = 0;
    while engine.snapshot().queued > 0 {
        let snapshot = engine.tick(DT).unwrap();
        let now = snapshot.projectiles.len();
        assert!(now <= in_flight + 1, "two launches in one tick");
        in_flight = now;
        ticks += 1;
        assert!(ticks <= 12, "stagger should skip at most one tick per shot");
    }
    assert_eq!(in_flight, 6);
    assert!(ticks >= 6);
}

#[test]
fn test_targets_assigned_round_robin() {
    let mut engine = SalvoEngine::new(pursuit_config(4)).unwrap();
    engine.set_target(TargetId(0), Vec3::new(-20.0, 0.0, 40.0));
    engine.set_target(TargetId(1), Vec3::new(20.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();
    while engine.snapshot().queued > 0 {
        engine.tick(DT).unwrap();
    }

    let mut per_target: HashMap<TargetId, usize> = HashMap::new();
    for projectile in engine.projectiles().iter().filter(|p| p.is_active()) {
        let entity = projectile.target().unwrap();
        let id = *engine.world().get::<&TargetId>(entity).unwrap();
        *per_target.entry(id).or_default() += 1;
    }
    assert_eq!(per_target.get(&TargetId(0)), Some(&2));
    assert_eq!(per_target.get(&TargetId(1)), Some(&2));
}

// ---- Full salvo ----

#[test]
fn test_full_salvo_hits_stationary_target() {
    let mut engine = engine_with_target(pursuit_config(8), Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();

    let mut ticks = 0;
    while engine.is_busy() {
        engine.tick(DT).unwrap();
        ticks += 1;
        assert!(ticks < 1500, "salvo still flying after {ticks} ticks");
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.hits, 8);
    assert_eq!(snapshot.lost, 0);
    assert!(snapshot.projectiles.is_empty());
    assert_eq!(snapshot.active_trails, 8, "stopped trails keep their history");
    assert!(engine.instance_matrices().is_empty());
}

#[test]
fn test_mesh_draw_range_follows_started_trails() {
    let mut engine = engine_with_target(pursuit_config(3), Vec3::new(0.0, 0.0, 40.0));
    assert_eq!(engine.rebuild_mesh().unwrap(), 0);

    engine.fire_salvo().unwrap();
    for _ in 0..30 {
        engine.tick(DT).unwrap();
    }
    let node_count = engine.store().node_count();
    let drawable = engine.rebuild_mesh().unwrap();
    assert_eq!(drawable, 3 * (node_count - 1) * QUAD_INDICES * CROSS_SECTION_SIDES);
    assert_eq!(engine.mesh().active_trails(), 3);
}

#[test]
fn test_salvo_away_from_origin_draws_short_segments() {
    let origin = Vec3::new(300.0, 0.0, 0.0);
    let config = SalvoConfig {
        origin,
        ..pursuit_config(3)
    };
    let mut engine = engine_with_target(config, origin + Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();
    for _ in 0..90 {
        engine.tick(DT).unwrap();
    }
    engine.rebuild_mesh().unwrap();

    // At 10 units/s each tick moves a tail by about 0.17 units.
    let edge = longest_drawn_edge(engine.mesh());
    assert!(edge < 1.0, "ribbon triangle spans {edge} units");
}

#[test]
fn test_instance_matrices_follow_projectiles() {
    let mut engine = engine_with_target(pursuit_config(4), Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();
    for _ in 0..20 {
        engine.tick(DT).unwrap();
    }
    let snapshot = engine.snapshot();
    let matrices = engine.instance_matrices();
    assert_eq!(matrices.len(), snapshot.projectiles.len());
    for (matrix, view) in matrices.iter().zip(&snapshot.projectiles) {
        assert!(matrix.w_axis.truncate().abs_diff_eq(view.position, 1e-5));
    }
}

#[test]
fn test_removed_target_retires_its_projectiles() {
    let mut engine = engine_with_target(pursuit_config(4), Vec3::new(0.0, 0.0, 80.0));
    engine.fire_salvo().unwrap();
    while engine.snapshot().queued > 0 {
        engine.tick(DT).unwrap();
    }
    assert!(engine.remove_target(TargetId(0)));

    let snapshot = engine.tick(DT).unwrap();
    assert_eq!(snapshot.lost, 4);
    assert!(snapshot.projectiles.is_empty());
    assert!(!engine.is_busy());
}

#[test]
fn test_reset_clears_flight_and_trails() {
    let mut engine = engine_with_target(pursuit_config(4), Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();
    for _ in 0..10 {
        engine.tick(DT).unwrap();
    }
    engine.reset().unwrap();

    let snapshot = engine.snapshot();
    assert!(snapshot.projectiles.is_empty());
    assert_eq!(snapshot.queued, 0);
    assert_eq!(snapshot.active_trails, 0);
}

#[test]
fn test_refire_restarts_salvo() {
    let mut engine = engine_with_target(pursuit_config(4), Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();
    for _ in 0..10 {
        engine.tick(DT).unwrap();
    }
    assert_eq!(engine.fire_salvo().unwrap(), 4);
    let snapshot = engine.snapshot();
    assert!(snapshot.projectiles.is_empty(), "refire retires the previous salvo");
    assert_eq!(snapshot.queued, 4);
}

// ---- Determinism ----

fn run_salvo(seed: u64, ticks: usize) -> Vec<String> {
    let config = SalvoConfig {
        seed,
        store: TrailStoreConfig {
            trail_count: 6,
            life: 1.0,
            ..TrailStoreConfig::default()
        },
        ..SalvoConfig::default()
    };
    let mut engine = SalvoEngine::new(config).unwrap();
    engine.set_target(TargetId(0), Vec3::new(10.0, 5.0, 60.0));
    engine.set_target(TargetId(1), Vec3::new(-10.0, 0.0, 50.0));
    engine.fire_salvo().unwrap();
    (0..ticks)
        .map(|_| serde_json::to_string(&engine.tick(DT).unwrap()).unwrap())
        .collect()
}

#[test]
fn test_same_seed_same_salvo() {
    assert_eq!(run_salvo(42, 120), run_salvo(42, 120));
}

#[test]
fn test_different_seed_different_salvo() {
    assert_ne!(run_salvo(42, 120), run_salvo(43, 120));
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = engine_with_target(pursuit_config(2), Vec3::new(0.0, 0.0, 40.0));
    engine.fire_salvo().unwrap();
    let snapshot = engine.tick(DT).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: SalvoSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, back);
    assert_eq!(back.tick, 1);
}
