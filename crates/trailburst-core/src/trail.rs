//! Trail-store contract: node layout, ring-buffer indexing and write commands.
//!
//! The store keeps `trail_count` ring buffers of `node_count` nodes each,
//! flattened into one array. Each trail's head index points at its newest
//! written node. Offset 0 is therefore the newest sample, and sample time
//! increases from offset 1 (the oldest) up to offset `node_count` (the head
//! again). Slots not yet written after a start sit at the start position
//! with a negative time.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ParamsError, TrailError};
use crate::params::check_non_negative;

/// One timestamped path sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailNode {
    /// Creation time; negative means the slot was never written.
    pub time: f32,
    pub position: Vec3,
    /// Unit direction of travel when sampled.
    pub direction: Vec3,
    pub speed: f32,
}

impl TrailNode {
    /// Sentinel for a slot that was never written.
    pub const EMPTY: Self = Self {
        time: -1.0,
        position: Vec3::ZERO,
        direction: Vec3::ZERO,
        speed: 0.0,
    };

    /// Placeholder for a slot that a freshly started trail has not reached
    /// yet. It never counts as alive but sits at `position` so degenerate
    /// ribbon segments collapse there rather than at the world origin.
    pub fn unwritten_at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::EMPTY
        }
    }

    /// Whether this node has been written and has not aged out at `now`.
    pub fn is_alive(&self, now: f32, life: f32) -> bool {
        self.time >= 0.0 && (now - self.time) < life
    }
}

impl Default for TrailNode {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Per-trail ring-buffer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    /// Newest written slot of the ring; negative until the trail is first started.
    pub head_index: i32,
}

impl Trail {
    pub const UNSTARTED: Self = Self { head_index: -1 };

    pub fn is_started(&self) -> bool {
        self.head_index >= 0
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::UNSTARTED
    }
}

/// Flat index of the node `offset` places past `head` in ring `trail`.
pub fn ring_slot(trail: usize, head: i32, offset: usize, node_count: usize) -> usize {
    let n = node_count as i64;
    let local = (head as i64 + offset as i64).rem_euclid(n) as usize;
    trail * node_count + local
}

/// Read-only view of a trail store after its compute pass has completed.
#[derive(Debug, Clone, Copy)]
pub struct TrailSnapshot<'a> {
    pub node_count: usize,
    pub trails: &'a [Trail],
    pub nodes: &'a [TrailNode],
}

impl<'a> TrailSnapshot<'a> {
    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    /// Node at logical `offset` from the head of `trail`, or `None` for an
    /// unstarted trail. Offset 0 is the newest sample, offset 1 the oldest.
    pub fn node(&self, trail: usize, offset: usize) -> Option<&'a TrailNode> {
        let head = self.trails.get(trail)?.head_index;
        if head < 0 {
            return None;
        }
        self.nodes.get(ring_slot(trail, head, offset, self.node_count))
    }

    /// Number of trails that have been started.
    pub fn started_count(&self) -> usize {
        self.trails.iter().filter(|t| t.is_started()).count()
    }
}

/// Write side of a trail store, one slot per projectile.
pub trait TrailStore {
    /// Reset the slot's ring around `tail` and seed its first sample.
    fn start_trail(
        &mut self,
        slot: usize,
        tail: Vec3,
        velocity: Vec3,
        inertia_ratio: f32,
    ) -> Result<(), TrailError>;

    /// Append a sample if the tail moved far enough since the last one.
    fn update_trail(
        &mut self,
        slot: usize,
        tail: Vec3,
        velocity: Vec3,
        inertia_ratio: f32,
    ) -> Result<(), TrailError>;

    /// Stop writing to the slot; existing samples fade out over their life.
    fn stop_trail(&mut self, slot: usize) -> Result<(), TrailError>;

    /// Reset every trail to empty.
    fn clear(&mut self);

    /// Reset one trail to empty.
    fn clear_slot(&mut self, slot: usize) -> Result<(), TrailError>;
}

/// Trail store sizing and appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailStoreConfig {
    /// Number of trails (and so the projectile pool size).
    pub trail_count: usize,
    /// Seconds a sample stays visible.
    pub life: f32,
    /// Minimum distance between recorded samples.
    pub update_distance_min: f32,
    /// Fraction of projectile speed stored in each sample.
    pub inertia: f32,
    /// Ribbon radius.
    pub thickness: f32,
}

impl Default for TrailStoreConfig {
    fn default() -> Self {
        Self {
            trail_count: 16,
            life: DEFAULT_TRAIL_LIFE,
            update_distance_min: DEFAULT_UPDATE_DISTANCE_MIN,
            inertia: DEFAULT_TRAIL_INERTIA,
            thickness: DEFAULT_TRAIL_THICKNESS,
        }
    }
}

impl TrailStoreConfig {
    /// Nodes per trail: enough to hold `life` seconds at `MAX_FPS`.
    pub fn node_count(&self) -> usize {
        (self.life * MAX_FPS).ceil() as usize
    }

    pub fn total_node_count(&self) -> usize {
        self.trail_count * self.node_count()
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        check_non_negative("life", self.life)?;
        if self.life > MAX_TRAIL_LIFE {
            return Err(ParamsError::TooLarge {
                field: "life",
                value: self.life,
                max: MAX_TRAIL_LIFE,
            });
        }
        check_non_negative("update_distance_min", self.update_distance_min)?;
        check_non_negative("inertia", self.inertia)?;
        check_non_negative("thickness", self.thickness)?;
        if self.trail_count == 0 || self.node_count() < 2 {
            return Err(ParamsError::EmptyStore);
        }
        Ok(())
    }
}
