//! Fundamental kinematic types and ECS marker components.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::easing::{clamp01, ease_in_quad};
use crate::math::FORWARD;

/// World-space position component for targets and other scene anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Distance to another position.
    pub fn range_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }
}

/// Marks an entity as something projectiles can home on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target;

/// Caller-facing identifier of a target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Position, orientation and speed of one projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Unit quaternion.
    pub rotation: Quat,
    /// `rotation * FORWARD`, kept in sync by the controller.
    pub forward: Vec3,
    pub speed: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            forward: FORWARD,
            speed: 0.0,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat, speed: f32) -> Self {
        Self {
            position,
            rotation,
            forward: rotation * FORWARD,
            speed,
        }
    }

    /// Current velocity (`forward * speed`).
    pub fn velocity(&self) -> Vec3 {
        self.forward * self.speed
    }

    /// Model matrix for instanced drawing (unit scale).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Angular velocity accumulated from spring torque.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngularState {
    pub omega: Vec3,
}

/// Ease-in acceleration from a start speed to a cruise speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedRamp {
    pub start_speed: f32,
    pub max_speed: f32,
    /// Seconds to reach `max_speed`; zero means cruise immediately.
    pub accel_time: f32,
    /// Seconds elapsed on the ramp.
    pub shift_time: f32,
}

impl SpeedRamp {
    pub fn new(start_speed: f32, max_speed: f32, accel_time: f32) -> Self {
        Self {
            start_speed,
            max_speed,
            accel_time,
            shift_time: 0.0,
        }
    }

    /// Advance the ramp by `dt` and return the speed for this tick.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.shift_time < self.accel_time {
            self.shift_time += dt;
            let t = clamp01(self.shift_time / self.accel_time);
            ease_in_quad(self.start_speed, self.max_speed, t)
        } else {
            self.max_speed
        }
    }

    /// Whether the ramp has reached cruise speed.
    pub fn is_complete(&self) -> bool {
        self.shift_time >= self.accel_time
    }
}
