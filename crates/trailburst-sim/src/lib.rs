//! Salvo driver for TRAILBURST.
//!
//! Owns the projectile pool, the target world and a CPU trail store, fires
//! salvos from a launcher pod and advances everything at an explicit tick.

pub mod engine;
pub mod error;
pub mod trail_store;

pub use engine::{launch_directions, ProjectileView, SalvoConfig, SalvoEngine, SalvoSnapshot};
pub use error::SalvoError;
pub use trail_store::RingTrailStore;
pub use trailburst_core as core;

#[cfg(test)]
mod tests;
