//! Target lookup by entity handle.

use glam::Vec3;
use hecs::{Entity, World};

use trailburst_core::types::Position;

/// Resolves a target handle to its current position.
///
/// `None` means the target no longer exists; projectiles homing on it retire.
pub trait TargetSource {
    fn target_position(&self, target: Entity) -> Option<Vec3>;
}

impl TargetSource for World {
    fn target_position(&self, target: Entity) -> Option<Vec3> {
        self.get::<&Position>(target).ok().map(|p| p.0)
    }
}
