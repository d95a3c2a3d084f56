//! Spring-damper orientation controller.
//!
//! The relative rotation from the current orientation to the look-at rotation
//! is treated as a restoring torque on a virtual spring. Angular velocity is
//! integrated with explicit Euler plus linear damping, then turned back into a
//! small rotation increment each tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use trailburst_core::constants::ROTATION_INCREMENT_MAX;
use trailburst_core::math::{look_rotation, FORWARD, UP};
use trailburst_core::types::{AngularState, Pose, SpeedRamp};

/// Steering gains for one projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationController {
    /// Spring constant.
    pub torque_level: f32,
    /// Linear angular damping.
    pub damper: f32,
}

/// Diagnostics from one controller step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TorqueReport {
    /// The rotation increment reached unit length and was scaled back.
    pub clamped: bool,
    /// Angular velocity was non-finite and had to be zeroed.
    pub reset: bool,
}

impl OrientationController {
    pub fn new(torque_level: f32, damper: f32) -> Self {
        Self {
            torque_level,
            damper,
        }
    }

    /// Restoring torque toward `target` from the current pose.
    ///
    /// Zero when the target sits exactly on the projectile.
    pub fn torque(pose: &Pose, target: Vec3) -> Vec3 {
        let up = pose.rotation * UP;
        let Some(look) = look_rotation(target - pose.position, up) else {
            return Vec3::ZERO;
        };
        let rel = look * pose.rotation.conjugate();
        // Short path: q and -q are the same rotation.
        if rel.w < 0.0 {
            -rel.xyz()
        } else {
            rel.xyz()
        }
    }

    /// Advance rotation, speed and position by one tick toward `target`.
    pub fn step(
        &self,
        pose: &mut Pose,
        angular: &mut AngularState,
        ramp: &mut SpeedRamp,
        target: Vec3,
        dt: f32,
    ) -> TorqueReport {
        let mut report = TorqueReport::default();

        let torque = Self::torque(pose, target);
        angular.omega += torque * (self.torque_level * dt);
        angular.omega -= angular.omega * (self.damper * dt);

        let mut r = angular.omega * dt;
        if !r.is_finite() {
            warn!(omega = ?angular.omega, "non-finite angular velocity; resetting");
            angular.omega = Vec3::ZERO;
            r = Vec3::ZERO;
            report.reset = true;
        }

        // w = sqrt(1 - |r|^2) is only defined below unit length.
        let len2 = r.length_squared();
        if len2 >= 1.0 {
            warn!(
                increment = len2.sqrt(),
                dt, "rotation increment reached unit length; clamping"
            );
            r *= ROTATION_INCREMENT_MAX / len2.sqrt();
            report.clamped = true;
        }
        let w = (1.0 - r.length_squared()).max(0.0).sqrt();
        let q = Quat::from_xyzw(r.x, r.y, r.z, w);
        pose.rotation = (q * pose.rotation).normalize();

        pose.forward = pose.rotation * FORWARD;
        pose.speed = ramp.advance(dt);
        pose.position += pose.forward * (pose.speed * dt);

        report
    }
}
