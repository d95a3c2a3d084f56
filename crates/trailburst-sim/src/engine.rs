//! Salvo engine: the launcher pod and its tick loop.
//!
//! `SalvoEngine` owns the target world, the projectile pool, the trail store
//! and the ribbon mesh. Completely headless and seeded, so the same config
//! replays the same salvo.

use std::collections::VecDeque;

use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use trailburst_core::error::ParamsError;
use trailburst_core::params::{check_non_negative, MissileParams, MissileVariant};
use trailburst_core::trail::{TrailStore, TrailStoreConfig};
use trailburst_core::types::{Position, Target, TargetId};
use trailburst_flight::{FlightOutcome, ProjectileFlightState};
use trailburst_ribbon::RibbonMesh;

use crate::error::SalvoError;
use crate::trail_store::RingTrailStore;

/// Random spread of each launch angle, as a fraction of the even spacing.
const ANGLE_JITTER: f32 = 0.45;

/// Configuration for a launcher pod.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalvoConfig {
    /// RNG seed. Same seed = same salvo.
    pub seed: u64,
    /// Shots per salvo; capped at the trail count.
    pub shoot_max: usize,
    /// Fire toward +Z instead of -Z.
    pub front: bool,
    /// Forward component of every launch direction.
    pub front_power: f32,
    /// Launch point of the pod.
    pub origin: Vec3,
    pub params: MissileParams,
    pub store: TrailStoreConfig,
}

impl Default for SalvoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            shoot_max: 16,
            front: true,
            front_power: 1.0,
            origin: Vec3::ZERO,
            params: MissileParams::for_variant(MissileVariant::Maneuver),
            store: TrailStoreConfig::default(),
        }
    }
}

impl SalvoConfig {
    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        self.params.validate()?;
        self.store.validate()?;
        check_non_negative("front_power", self.front_power)?;
        for value in self.origin.to_array() {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite {
                    field: "origin",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Per-projectile view for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub slot: usize,
    pub position: Vec3,
    pub forward: Vec3,
    pub speed: f32,
    pub wind_count: u32,
    pub clamp_count: u32,
}

/// State of the engine after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalvoSnapshot {
    pub tick: u64,
    pub time: f32,
    /// Projectiles in flight, in slot order.
    pub projectiles: Vec<ProjectileView>,
    /// Shots still waiting to launch.
    pub queued: usize,
    /// Trails with history, including stopped ones still fading.
    pub active_trails: usize,
    /// Hits since the engine was created.
    pub hits: u32,
    /// Projectiles retired because their target disappeared.
    pub lost: u32,
}

#[derive(Debug, Clone, Copy)]
struct QueuedShot {
    direction: Vec3,
    target: Entity,
}

/// The salvo engine. Owns the ECS world and all flight state.
pub struct SalvoEngine {
    config: SalvoConfig,
    world: World,
    projectiles: Vec<ProjectileFlightState>,
    store: RingTrailStore,
    mesh: RibbonMesh,
    rng: ChaCha8Rng,
    queue: VecDeque<QueuedShot>,
    shoot_count: usize,
    shoot_wait: u32,
    tick: u64,
    time: f32,
    hits: u32,
    lost: u32,
}

impl SalvoEngine {
    /// Create an engine with an empty target world and an idle pool.
    pub fn new(config: SalvoConfig) -> Result<Self, SalvoError> {
        config.validate()?;
        let store = RingTrailStore::new(config.store);
        let mesh = RibbonMesh::new(
            config.store.trail_count,
            store.node_count(),
            config.store.thickness,
        )?;
        let projectiles = (0..config.store.trail_count)
            .map(ProjectileFlightState::new)
            .collect();
        info!(
            seed = config.seed,
            trail_count = config.store.trail_count,
            node_count = store.node_count(),
            "salvo engine created"
        );

        Ok(Self {
            config,
            world: World::new(),
            projectiles,
            store,
            mesh,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            queue: VecDeque::new(),
            shoot_count: 0,
            shoot_wait: 0,
            tick: 0,
            time: 0.0,
            hits: 0,
            lost: 0,
        })
    }

    /// Place target `id`, spawning it if it does not exist yet.
    pub fn set_target(&mut self, id: TargetId, position: Vec3) {
        if let Some(entity) = self.find_target(id) {
            if let Ok(mut pos) = self.world.get::<&mut Position>(entity) {
                pos.0 = position;
            }
            return;
        }
        self.world.spawn((Target, id, Position(position)));
    }

    /// Despawn target `id`. Projectiles homing on it retire on their next tick.
    pub fn remove_target(&mut self, id: TargetId) -> bool {
        match self.find_target(id) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    /// Retire everything, then queue a fresh salvo. Returns the number of shots queued.
    pub fn fire_salvo(&mut self) -> Result<usize, SalvoError> {
        self.reset()?;

        let targets = self.targets_by_id();
        if targets.is_empty() {
            warn!("no targets; salvo not fired");
            return Ok(0);
        }

        let count = self.config.shoot_max.min(self.projectiles.len());
        let mut directions = launch_directions(
            count,
            self.config.front_power,
            self.config.front,
            &mut self.rng,
        );
        directions.shuffle(&mut self.rng);
        self.queue = directions
            .into_iter()
            .enumerate()
            .map(|(i, direction)| QueuedShot {
                direction,
                target: targets[i % targets.len()],
            })
            .collect();

        info!(shots = count, targets = targets.len(), "salvo fired");
        Ok(count)
    }

    /// Advance the engine by `dt` seconds and return the resulting snapshot.
    pub fn tick(&mut self, dt: f32) -> Result<SalvoSnapshot, SalvoError> {
        for projectile in self.projectiles.iter_mut() {
            match projectile.advance(dt, &self.world, &mut self.store, &mut self.rng)? {
                FlightOutcome::Hit => {
                    self.hits += 1;
                    projectile.retire(&mut self.store)?;
                }
                FlightOutcome::TargetLost => self.lost += 1,
                FlightOutcome::Inactive | FlightOutcome::InFlight => {}
            }
        }

        self.launch_next()?;

        self.time += dt;
        self.tick += 1;
        self.store.dispatch(self.time);
        Ok(self.snapshot())
    }

    /// Refresh the ribbon vertices from the store. Returns the drawable index count.
    pub fn rebuild_mesh(&mut self) -> Result<usize, SalvoError> {
        let snapshot = self.store.snapshot();
        let drawable = self
            .mesh
            .rebuild(&snapshot, self.time, self.config.store.life)?;
        Ok(drawable)
    }

    /// Retire every projectile, drop queued shots and wipe all trails.
    pub fn reset(&mut self) -> Result<(), SalvoError> {
        for projectile in self.projectiles.iter_mut() {
            projectile.retire(&mut self.store)?;
        }
        self.store.clear();
        self.queue.clear();
        self.shoot_count = 0;
        self.shoot_wait = 0;
        info!(tick = self.tick, "salvo reset");
        Ok(())
    }

    /// Model matrices of projectiles in flight, for instanced drawing.
    pub fn instance_matrices(&self) -> Vec<Mat4> {
        self.projectiles
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.pose().matrix())
            .collect()
    }

    /// Build a snapshot of the current state without advancing.
    pub fn snapshot(&self) -> SalvoSnapshot {
        let projectiles = self
            .projectiles
            .iter()
            .filter(|p| p.is_active())
            .map(|p| ProjectileView {
                slot: p.slot(),
                position: p.pose().position,
                forward: p.forward(),
                speed: p.pose().speed,
                wind_count: p.burst().state.wind_count,
                clamp_count: p.clamp_count(),
            })
            .collect();

        SalvoSnapshot {
            tick: self.tick,
            time: self.time,
            projectiles,
            queued: self.queue.len(),
            active_trails: self.store.snapshot().started_count(),
            hits: self.hits,
            lost: self.lost,
        }
    }

    pub fn config(&self) -> &SalvoConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn projectiles(&self) -> &[ProjectileFlightState] {
        &self.projectiles
    }

    pub fn store(&self) -> &RingTrailStore {
        &self.store
    }

    pub fn mesh(&self) -> &RibbonMesh {
        &self.mesh
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Whether queued shots remain or any projectile is still in flight.
    pub fn is_busy(&self) -> bool {
        !self.queue.is_empty() || self.projectiles.iter().any(|p| p.is_active())
    }

    /// Launch the next queued shot unless the stagger is still counting down.
    fn launch_next(&mut self) -> Result<(), SalvoError> {
        if self.queue.is_empty() {
            return Ok(());
        }
        if self.shoot_wait > 0 {
            self.shoot_wait -= 1;
            return Ok(());
        }
        let Some(shot) = self.queue.pop_front() else {
            return Ok(());
        };

        let slot = self.shoot_count;
        self.projectiles[slot].launch(
            self.config.origin,
            shot.direction,
            shot.target,
            &self.config.params,
            &mut self.store,
            &mut self.rng,
        )?;
        self.shoot_count += 1;
        self.shoot_wait = self.rng.gen_range(0..=1);

        if self.queue.is_empty() {
            debug!(shots = self.shoot_count, "salvo fully launched");
        }
        Ok(())
    }

    fn find_target(&self, id: TargetId) -> Option<Entity> {
        self.world
            .query::<&TargetId>()
            .iter()
            .find(|(_, tid)| **tid == id)
            .map(|(entity, _)| entity)
    }

    /// Live targets ordered by id, so shot `i` homes on target `i % count`.
    fn targets_by_id(&self) -> Vec<Entity> {
        let mut targets: Vec<(TargetId, Entity)> = self
            .world
            .query::<(&Target, &TargetId)>()
            .iter()
            .map(|(entity, (_, id))| (*id, entity))
            .collect();
        targets.sort_by_key(|(id, _)| *id);
        targets.into_iter().map(|(_, entity)| entity).collect()
    }
}

/// Launch directions spread evenly around the forward axis.
///
/// Angles start at a random offset and each is jittered by up to 45% of the
/// spacing. The lateral part is unit length; the forward part is
/// `front_power`, toward +Z when `front` and -Z otherwise.
pub fn launch_directions<R: Rng + ?Sized>(
    count: usize,
    front_power: f32,
    front: bool,
    rng: &mut R,
) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let start = rng.gen_range(0.0..360.0f32);
    let step = 360.0 / count as f32;
    let jitter = step * ANGLE_JITTER;
    let z = if front { front_power } else { -front_power };

    (0..count)
        .map(|i| {
            let angle = start + step * i as f32 + rng.gen_range(-jitter..=jitter);
            let mut direction = Quat::from_rotation_z(angle.to_radians()) * Vec3::Y;
            direction.z = z;
            direction
        })
        .collect()
}
