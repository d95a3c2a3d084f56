//! Missile parameters and the built-in variant profiles.
//!
//! One parameter block drives every projectile; variants differ only in the
//! values selected at spawn.

use serde::{Deserialize, Serialize};

use crate::constants::FRAME_TIME;
use crate::error::ParamsError;

/// Inclusive `[min, max]` range of a continuous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &'static str) -> Result<(), ParamsError> {
        check_non_negative(field, self.min)?;
        check_non_negative(field, self.max)?;
        if self.min > self.max {
            return Err(ParamsError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Half-open `[min, max)` range of a frame count at the nominal frame time.
/// A range with `min == max` always yields `min`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub min: u32,
    pub max: u32,
}

impl FrameRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Convert a frame count to seconds.
    pub fn to_secs(frames: u32) -> f32 {
        frames as f32 * FRAME_TIME
    }

    fn validate(&self, field: &'static str) -> Result<(), ParamsError> {
        if self.min > self.max {
            return Err(ParamsError::InvertedRange {
                field,
                min: self.min as f32,
                max: self.max as f32,
            });
        }
        Ok(())
    }
}

/// Evasive-burst tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstParams {
    /// Whether the projectile fires bursts at all.
    pub enabled: bool,
    /// Delay before the first window opens.
    pub delay_frames: FrameRange,
    /// Peak power of the launch kick along the launch direction.
    pub launch_power: FloatRange,
    /// Length of the launch kick window. Zero skips the kick and re-arms immediately.
    pub launch_frames: FrameRange,
    /// Peak power of each re-armed burst.
    pub power: FloatRange,
    /// Length of each re-armed burst window.
    pub power_frames: FrameRange,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self::disabled()
    }
}

impl BurstParams {
    /// No bursts: pure pursuit.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            delay_frames: FrameRange::new(0, 0),
            launch_power: FloatRange::new(0.0, 0.0),
            launch_frames: FrameRange::new(0, 0),
            power: FloatRange::new(0.0, 0.0),
            power_frames: FrameRange::new(0, 0),
        }
    }

    fn validate(&self) -> Result<(), ParamsError> {
        self.delay_frames.validate("burst.delay_frames")?;
        self.launch_power.validate("burst.launch_power")?;
        self.launch_frames.validate("burst.launch_frames")?;
        self.power.validate("burst.power")?;
        self.power_frames.validate("burst.power_frames")?;
        Ok(())
    }
}

/// Projectile variants, each mapping to a parameter profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileVariant {
    /// Plain spring-torque pursuit.
    #[default]
    Homing,
    /// Pursuit that leaves a trail.
    Trail,
    /// Delayed evasive bursts before settling into pursuit.
    Power,
    /// Launch kick plus re-armed bursts, stiff steering.
    Maneuver,
}

/// Parameters shared by every projectile of a salvo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileParams {
    /// Speed right after launch.
    pub start_speed: f32,
    /// Cruise speed reached after `accel_time`.
    pub max_speed: f32,
    /// Seconds of ease-in acceleration (smaller is snappier).
    pub accel_time: f32,
    /// Spring constant of the steering torque.
    pub torque_level: f32,
    /// Angular damping (too weak wobbles, too strong feels heavy).
    pub damper: f32,
    /// Distance to the target that counts as a hit.
    pub hit_range: f32,
    /// Offset from the nose to the tail, where trail samples are taken.
    pub missile_length: f32,
    /// How far the launch direction is slerped away from canonical forward (0..1).
    pub shoot_direct: f32,
    /// Multiplier on the trail store's inertia for this projectile.
    pub inertia_ratio: f32,
    pub burst: BurstParams,
}

impl Default for MissileParams {
    fn default() -> Self {
        Self::for_variant(MissileVariant::default())
    }
}

impl MissileParams {
    /// Built-in profile for a variant.
    pub fn for_variant(variant: MissileVariant) -> Self {
        match variant {
            MissileVariant::Homing => Self {
                start_speed: 2.0,
                max_speed: 12.0,
                accel_time: 1.5,
                torque_level: 10.0,
                damper: 4.0,
                hit_range: 1.0,
                missile_length: 0.0,
                shoot_direct: 1.0,
                inertia_ratio: 1.0,
                burst: BurstParams::disabled(),
            },
            MissileVariant::Trail => Self {
                hit_range: 1.0,
                ..Self::for_variant(MissileVariant::Homing)
            },
            MissileVariant::Power => Self {
                start_speed: 4.0,
                max_speed: 16.0,
                accel_time: 1.0,
                torque_level: 10.0,
                damper: 4.0,
                hit_range: 2.0,
                missile_length: 0.0,
                shoot_direct: 1.0,
                inertia_ratio: 1.0,
                burst: BurstParams {
                    enabled: true,
                    delay_frames: FrameRange::new(15, 25),
                    launch_power: FloatRange::new(0.0, 0.0),
                    launch_frames: FrameRange::new(0, 0),
                    power: FloatRange::new(20.0, 40.0),
                    power_frames: FrameRange::new(10, 20),
                },
            },
            MissileVariant::Maneuver => Self {
                start_speed: 5.0,
                max_speed: 20.0,
                accel_time: 1.0,
                torque_level: 15.0,
                damper: 5.0,
                hit_range: 3.0,
                missile_length: 0.0,
                shoot_direct: 1.0,
                inertia_ratio: 1.0,
                burst: BurstParams {
                    enabled: true,
                    delay_frames: FrameRange::new(0, 0),
                    launch_power: FloatRange::new(30.0, 50.0),
                    launch_frames: FrameRange::new(10, 15),
                    power: FloatRange::new(20.0, 35.0),
                    power_frames: FrameRange::new(8, 15),
                },
            },
        }
    }

    /// Parse and validate parameters from JSON. Missing fields take the
    /// default profile's values.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Check that every value is usable by the controller and burst machine.
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_non_negative("start_speed", self.start_speed)?;
        check_non_negative("max_speed", self.max_speed)?;
        check_non_negative("accel_time", self.accel_time)?;
        check_non_negative("torque_level", self.torque_level)?;
        check_non_negative("damper", self.damper)?;
        check_non_negative("hit_range", self.hit_range)?;
        check_non_negative("missile_length", self.missile_length)?;
        check_non_negative("inertia_ratio", self.inertia_ratio)?;
        if !(0.0..=1.0).contains(&self.shoot_direct) {
            return Err(ParamsError::ShootDirectOutOfRange(self.shoot_direct));
        }
        self.burst.validate()
    }
}

/// Reject NaN, infinities and negative values.
pub fn check_non_negative(field: &'static str, value: f32) -> Result<(), ParamsError> {
    if !value.is_finite() {
        return Err(ParamsError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ParamsError::Negative { field, value });
    }
    Ok(())
}
