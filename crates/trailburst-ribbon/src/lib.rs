//! Ribbon geometry for TRAILBURST trails.
//!
//! Turns a trail-store snapshot into a tube mesh: an eight-sided ring at every
//! path sample, stitched to the next ring by a fixed index buffer.

pub mod geometry;
pub mod mesh;

pub use geometry::{build_index_buffer, build_vertices, index_count, vertex_count};
pub use mesh::RibbonMesh;
pub use trailburst_core as core;
