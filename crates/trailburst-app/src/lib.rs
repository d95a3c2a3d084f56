//! TRAILBURST headless driver.
//!
//! Loads a scenario, runs one salvo to completion and reports the final
//! snapshot. Rendering frontends consume the same engine and snapshots.

pub mod error;
pub mod game_loop;
pub mod scenario;

pub use trailburst_core as core;
