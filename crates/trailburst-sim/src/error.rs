//! Errors surfaced by the salvo driver.

use thiserror::Error;

use trailburst_core::error::{GeometryError, ParamsError, TrailError};

#[derive(Error, Debug)]
pub enum SalvoError {
    #[error("invalid salvo configuration: {0}")]
    Params(#[from] ParamsError),

    #[error("trail store: {0}")]
    Trail(#[from] TrailError),

    #[error("ribbon geometry: {0}")]
    Geometry(#[from] GeometryError),
}
