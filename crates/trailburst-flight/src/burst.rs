//! Evasive-burst state machine.
//!
//! Each launch arms a timed positional impulse: an optional pre-burst delay,
//! then a window that eases in, holds, and eases out. When a window closes the
//! machine re-arms with a fresh direction until `WINDING_MAX` bursts have
//! fired, then stays disabled until the next launch.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use trailburst_core::constants::*;
use trailburst_core::easing::{clamp01, ease_in_quad, ease_out_quad, lerp};
use trailburst_core::math::{angle_deg, rotation_to, FORWARD};
use trailburst_core::params::{BurstParams, FloatRange, FrameRange};

/// Mutable burst state of one projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstState {
    pub enabled: bool,
    /// Unit direction of the current impulse.
    pub force: Vec3,
    /// Current impulse strength.
    pub power: f32,
    /// Peak strength of the current window.
    pub power_max: f32,
    /// Seconds into the current window; negative while the pre-burst delay runs.
    pub power_time: f32,
    /// Length of the current window in seconds.
    pub power_enable_time: f32,
    /// Bursts re-armed since launch.
    pub wind_count: u32,
}

impl Default for BurstState {
    fn default() -> Self {
        Self {
            enabled: false,
            force: FORWARD,
            power: 0.0,
            power_max: 0.0,
            power_time: 0.0,
            power_enable_time: 0.0,
            wind_count: 0,
        }
    }
}

/// Where the projectile is pointing relative to its target when a burst re-arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstAim {
    /// Vector from the projectile to its target (need not be normalized).
    pub target_direction: Vec3,
    /// Current unit forward direction.
    pub forward: Vec3,
}

/// Outcome of one re-arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitReport {
    /// Direction samples drawn, at most `EMIT_ATTEMPTS_MAX`.
    pub attempts: u32,
    /// The sample cap was hit and the last candidate was accepted unchecked.
    pub capped: bool,
    /// Angle between the previous and the new force (degrees).
    pub angle_deg: f32,
}

/// Burst state plus the parameters it was armed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvasiveBurst {
    pub state: BurstState,
    params: BurstParams,
}

impl Default for EvasiveBurst {
    fn default() -> Self {
        Self::disabled()
    }
}

impl EvasiveBurst {
    /// A machine that never fires.
    pub fn disabled() -> Self {
        Self {
            state: BurstState::default(),
            params: BurstParams::disabled(),
        }
    }

    /// Arm for a new launch: the first window kicks along the launch direction
    /// after a randomized delay.
    pub fn launch<R: Rng + ?Sized>(params: &BurstParams, launch_direction: Vec3, rng: &mut R) -> Self {
        if !params.enabled {
            return Self::disabled();
        }
        let state = BurstState {
            enabled: true,
            force: launch_direction.try_normalize().unwrap_or(FORWARD),
            power: 0.0,
            power_max: sample_power(params.launch_power, rng),
            power_time: -sample_secs(params.delay_frames, rng),
            power_enable_time: sample_secs(params.launch_frames, rng),
            wind_count: 0,
        };
        Self {
            state,
            params: *params,
        }
    }

    pub fn params(&self) -> &BurstParams {
        &self.params
    }

    /// Advance the envelope by `dt` and displace `position` by the current impulse.
    ///
    /// Returns the re-arm report when a window closed this tick and a new burst
    /// was drawn.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        position: &mut Vec3,
        aim: BurstAim,
        dt: f32,
        rng: &mut R,
    ) -> Option<EmitReport> {
        if !self.state.enabled {
            return None;
        }

        self.state.power_time += dt;
        // Pre-burst delay.
        if self.state.power_time < 0.0 {
            return None;
        }

        let mut report = None;
        if self.state.power_time < self.state.power_enable_time {
            self.state.power = window_power(
                self.state.power_time,
                self.state.power_enable_time,
                self.state.power_max,
            );
        } else {
            self.state.power = 0.0;
            if self.state.wind_count < WINDING_MAX {
                report = Some(self.emit(aim, rng));
            } else {
                self.state.enabled = false;
                debug!(wind_count = self.state.wind_count, "bursts exhausted");
            }
        }

        *position += self.state.force * (self.state.power * dt);
        report
    }

    /// Draw a new burst direction and window.
    ///
    /// Candidates are rejected while they point within `EMIT_MIN_ANGLE_DEG` of
    /// the previous force; after `EMIT_ATTEMPTS_MAX` samples the last one is
    /// kept regardless.
    pub fn emit<R: Rng + ?Sized>(&mut self, aim: BurstAim, rng: &mut R) -> EmitReport {
        let target_dir = aim.target_direction.try_normalize().unwrap_or(aim.forward);
        let facing = angle_deg(target_dir, aim.forward);
        let frame = rotation_to(target_dir);

        let mut attempts = 0;
        let mut candidate;
        let mut angle;
        loop {
            let mut local = Vec3::new(
                signed_lateral(rng),
                signed_lateral(rng),
                0.0,
            );
            // Facing away from the target: push the burst back toward it.
            if facing > EMIT_FACING_LIMIT_DEG {
                let t = clamp01((facing - EMIT_BIAS_START_DEG) / EMIT_BIAS_SPAN_DEG);
                local.z = lerp(EMIT_FORWARD_RANGE.0, EMIT_FORWARD_RANGE.1, t);
            }
            candidate = (frame * local).normalize_or_zero();
            angle = angle_deg(self.state.force, candidate);
            attempts += 1;
            if attempts >= EMIT_ATTEMPTS_MAX || angle >= EMIT_MIN_ANGLE_DEG {
                break;
            }
        }

        self.state.force = candidate;
        self.state.power = 0.0;
        self.state.power_max = sample_power(self.params.power, rng);
        self.state.power_time = 0.0;
        self.state.power_enable_time = sample_secs(self.params.power_frames, rng);
        self.state.enabled = true;
        self.state.wind_count += 1;

        let capped = angle < EMIT_MIN_ANGLE_DEG;
        debug!(
            wind_count = self.state.wind_count,
            attempts, capped, "burst re-armed"
        );
        EmitReport {
            attempts,
            capped,
            angle_deg: angle,
        }
    }
}

/// Impulse strength `t` seconds into a window of length `duration` peaking at `max`.
pub fn window_power(t: f32, duration: f32, max: f32) -> f32 {
    if t < POWER_EDGE_TIME {
        ease_in_quad(0.0, max, t / POWER_EDGE_TIME)
    } else if t < duration - POWER_EDGE_TIME {
        max
    } else {
        let t = (t - (duration - POWER_EDGE_TIME)) / POWER_EDGE_TIME;
        ease_out_quad(max, 0.0, t)
    }
}

fn signed_lateral<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let magnitude = rng.gen_range(EMIT_LATERAL_RANGE.0..=EMIT_LATERAL_RANGE.1);
    if rng.gen_bool(0.5) {
        -magnitude
    } else {
        magnitude
    }
}

fn sample_power<R: Rng + ?Sized>(range: FloatRange, rng: &mut R) -> f32 {
    rng.gen_range(range.min..=range.max)
}

fn sample_frames<R: Rng + ?Sized>(range: FrameRange, rng: &mut R) -> u32 {
    if range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

fn sample_secs<R: Rng + ?Sized>(range: FrameRange, rng: &mut R) -> f32 {
    FrameRange::to_secs(sample_frames(range, rng))
}
