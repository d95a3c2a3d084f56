//! Scenario files: a salvo config plus the targets it fires at.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use trailburst_core::error::ParamsError;
use trailburst_sim::SalvoConfig;

use crate::error::AppError;

/// Upper bound on ticks when a scenario does not set one (one minute at 60 Hz).
pub const DEFAULT_MAX_TICKS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub salvo: SalvoConfig,
    /// Target positions; target `i` gets id `i`.
    pub targets: Vec<Vec3>,
    /// Stop after this many ticks even if projectiles are still flying.
    pub max_ticks: u64,
    /// Rebuild the ribbon mesh every this many ticks; 0 disables it.
    pub mesh_interval: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            salvo: SalvoConfig::default(),
            targets: vec![Vec3::new(-8.0, 4.0, 60.0), Vec3::new(8.0, -4.0, 60.0)],
            max_ticks: DEFAULT_MAX_TICKS,
            mesh_interval: 30,
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let scenario: Self = serde_json::from_str(json).map_err(ParamsError::from)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.salvo.validate()?;
        if self.targets.is_empty() {
            return Err(AppError::NoTargets);
        }
        Ok(())
    }
}
