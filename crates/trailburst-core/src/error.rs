//! Error types shared by the flight, ribbon and trail-store crates.

use thiserror::Error;

/// Invalid missile or salvo parameters.
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} range is inverted: [{min}, {max}]")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("shoot_direct must lie in [0, 1], got {0}")]
    ShootDirectOutOfRange(f32),

    #[error("trail store needs at least one trail and two nodes per trail")]
    EmptyStore,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trail-store command errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrailError {
    #[error("trail slot {slot} out of range (trail count {trail_count})")]
    SlotOutOfRange { slot: usize, trail_count: usize },
}

/// Snapshot or buffer sizes that do not match the ribbon dimensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("ribbon needs at least two nodes per trail, got {0}")]
    NodeCountTooSmall(usize),

    #[error("trail buffer holds {actual} entries, expected {expected}")]
    TrailBufferSize { expected: usize, actual: usize },

    #[error("snapshot has {actual} nodes per trail, expected {expected}")]
    NodeCountMismatch { expected: usize, actual: usize },

    #[error("node buffer holds {actual} entries, expected {expected}")]
    NodeBufferSize { expected: usize, actual: usize },

    #[error("vertex buffer holds {actual} entries, expected {expected}")]
    VertexBufferSize { expected: usize, actual: usize },

    #[error("index buffer holds {actual} entries, expected {expected}")]
    IndexBufferSize { expected: usize, actual: usize },
}
