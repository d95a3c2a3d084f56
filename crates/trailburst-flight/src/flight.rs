//! Full kinematic state of one projectile, advanced once per tick.

use glam::{Quat, Vec3};
use hecs::Entity;
use rand::Rng;
use tracing::{debug, warn};

use trailburst_core::error::TrailError;
use trailburst_core::math::rotation_to;
use trailburst_core::params::MissileParams;
use trailburst_core::trail::TrailStore;
use trailburst_core::types::{AngularState, Pose, SpeedRamp};

use crate::burst::{BurstAim, EvasiveBurst};
use crate::controller::OrientationController;
use crate::target::TargetSource;

/// Result of one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    /// The projectile was not in flight; nothing happened.
    Inactive,
    InFlight,
    /// Within hit range of the target; the caller should retire it.
    Hit,
    /// The target no longer exists; the projectile has been retired.
    TargetLost,
}

/// One pooled projectile bound to a trail-store slot.
#[derive(Debug, Clone)]
pub struct ProjectileFlightState {
    slot: usize,
    active: bool,
    target: Option<Entity>,
    params: MissileParams,
    controller: OrientationController,
    pose: Pose,
    angular: AngularState,
    ramp: SpeedRamp,
    burst: EvasiveBurst,
    /// Ticks whose rotation increment had to be clamped since launch.
    clamp_count: u32,
    flight_time: f32,
}

impl ProjectileFlightState {
    /// An idle projectile writing to trail `slot`.
    pub fn new(slot: usize) -> Self {
        let params = MissileParams::default();
        Self {
            slot,
            active: false,
            target: None,
            params,
            controller: OrientationController::new(params.torque_level, params.damper),
            pose: Pose::default(),
            angular: AngularState::default(),
            ramp: SpeedRamp::default(),
            burst: EvasiveBurst::disabled(),
            clamp_count: 0,
            flight_time: 0.0,
        }
    }

    /// Fire from `origin` along `direction` at `target`.
    ///
    /// Resets every sub-state, arms the burst machine and starts the trail at
    /// the projectile's tail.
    pub fn launch<S, R>(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        target: Entity,
        params: &MissileParams,
        trails: &mut S,
        rng: &mut R,
    ) -> Result<(), TrailError>
    where
        S: TrailStore + ?Sized,
        R: Rng + ?Sized,
    {
        let rotation = Quat::IDENTITY.slerp(rotation_to(direction), params.shoot_direct);

        self.active = true;
        self.target = Some(target);
        self.params = *params;
        self.controller = OrientationController::new(params.torque_level, params.damper);
        self.pose = Pose::new(origin, rotation, params.start_speed);
        self.angular = AngularState::default();
        self.ramp = SpeedRamp::new(params.start_speed, params.max_speed, params.accel_time);
        self.burst = EvasiveBurst::launch(&params.burst, direction, rng);
        self.clamp_count = 0;
        self.flight_time = 0.0;

        trails.start_trail(
            self.slot,
            self.tail(),
            self.pose.velocity(),
            params.inertia_ratio,
        )?;
        debug!(slot = self.slot, ?origin, ?direction, "projectile launched");
        Ok(())
    }

    /// Advance one tick: burst displacement, then steering, then a trail sample.
    pub fn advance<T, S, R>(
        &mut self,
        dt: f32,
        targets: &T,
        trails: &mut S,
        rng: &mut R,
    ) -> Result<FlightOutcome, TrailError>
    where
        T: TargetSource + ?Sized,
        S: TrailStore + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.active {
            return Ok(FlightOutcome::Inactive);
        }

        let Some(target_pos) = self.target.and_then(|t| targets.target_position(t)) else {
            warn!(slot = self.slot, "target lost; retiring projectile");
            self.retire(trails)?;
            return Ok(FlightOutcome::TargetLost);
        };

        let aim = BurstAim {
            target_direction: target_pos - self.pose.position,
            forward: self.pose.forward,
        };
        self.burst.step(&mut self.pose.position, aim, dt, rng);

        let report = self.controller.step(
            &mut self.pose,
            &mut self.angular,
            &mut self.ramp,
            target_pos,
            dt,
        );
        if report.clamped || report.reset {
            self.clamp_count += 1;
        }
        self.flight_time += dt;

        trails.update_trail(
            self.slot,
            self.tail(),
            self.pose.velocity(),
            self.params.inertia_ratio,
        )?;

        if self.pose.position.distance(target_pos) < self.params.hit_range {
            Ok(FlightOutcome::Hit)
        } else {
            Ok(FlightOutcome::InFlight)
        }
    }

    /// Stop the trail and go idle. Safe to call more than once.
    pub fn retire<S>(&mut self, trails: &mut S) -> Result<(), TrailError>
    where
        S: TrailStore + ?Sized,
    {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        trails.stop_trail(self.slot)?;
        debug!(
            slot = self.slot,
            flight_time = self.flight_time,
            clamps = self.clamp_count,
            "projectile retired"
        );
        Ok(())
    }

    /// Where trail samples are taken: `missile_length` behind the nose.
    pub fn tail(&self) -> Vec3 {
        self.pose.position - self.pose.forward * self.params.missile_length
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn angular(&self) -> &AngularState {
        &self.angular
    }

    pub fn burst(&self) -> &EvasiveBurst {
        &self.burst
    }

    pub fn params(&self) -> &MissileParams {
        &self.params
    }

    pub fn clamp_count(&self) -> u32 {
        self.clamp_count
    }

    pub fn flight_time(&self) -> f32 {
        self.flight_time
    }

    /// Current heading, `rotation * FORWARD`.
    pub fn forward(&self) -> Vec3 {
        self.pose.forward
    }
}
