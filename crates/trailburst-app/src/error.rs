//! Top-level error for the driver binary.

use std::path::PathBuf;

use thiserror::Error;

use trailburst_core::error::ParamsError;
use trailburst_sim::SalvoError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Salvo(#[from] SalvoError),

    #[error("failed to write snapshot: {0}")]
    Output(#[from] serde_json::Error),

    #[error("scenario has no targets")]
    NoTargets,
}
