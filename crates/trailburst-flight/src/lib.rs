//! Homing flight for TRAILBURST projectiles.
//!
//! A spring-damper orientation controller steers each projectile toward its
//! target, an evasive-burst state machine layers eased positional kicks on
//! top, and `ProjectileFlightState` composes both and feeds the trail store.
//! Everything here is plain data advanced by an explicit `advance(dt)` call.

pub mod burst;
pub mod controller;
pub mod flight;
pub mod target;

pub use burst::{BurstAim, BurstState, EmitReport, EvasiveBurst};
pub use controller::{OrientationController, TorqueReport};
pub use flight::{FlightOutcome, ProjectileFlightState};
pub use target::TargetSource;
pub use trailburst_core as core;
