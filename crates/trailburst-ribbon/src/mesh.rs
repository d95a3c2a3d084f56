//! Cached ribbon mesh owned by the frame driver.

use glam::Vec3;
use tracing::debug;

use trailburst_core::constants::{CROSS_SECTION_SIDES, QUAD_INDICES};
use trailburst_core::error::GeometryError;
use trailburst_core::trail::TrailSnapshot;

use crate::geometry::{build_index_buffer, build_vertices, vertex_count};

/// Index buffer built once for fixed dimensions, plus the per-frame vertices.
#[derive(Debug, Clone)]
pub struct RibbonMesh {
    trail_count: usize,
    node_count: usize,
    thickness: f32,
    indices: Vec<u32>,
    vertices: Vec<Vec3>,
    active_trails: usize,
}

impl RibbonMesh {
    pub fn new(trail_count: usize, node_count: usize, thickness: f32) -> Result<Self, GeometryError> {
        let indices = build_index_buffer(trail_count, node_count)?;
        debug!(
            trail_count,
            node_count,
            indices = indices.len(),
            "ribbon index buffer built"
        );
        Ok(Self {
            trail_count,
            node_count,
            thickness,
            indices,
            vertices: vec![Vec3::ZERO; vertex_count(trail_count, node_count)],
            active_trails: 0,
        })
    }

    /// Refresh vertices from a completed store snapshot.
    ///
    /// Returns the number of indices worth drawing this frame.
    pub fn rebuild(&mut self, snapshot: &TrailSnapshot<'_>, now: f32, life: f32) -> Result<usize, GeometryError> {
        if snapshot.trail_count() != self.trail_count {
            return Err(GeometryError::TrailBufferSize {
                expected: self.trail_count,
                actual: snapshot.trail_count(),
            });
        }
        if snapshot.node_count != self.node_count {
            return Err(GeometryError::NodeCountMismatch {
                expected: self.node_count,
                actual: snapshot.node_count,
            });
        }
        self.active_trails = build_vertices(snapshot, self.thickness, now, life, &mut self.vertices)?;
        Ok(self.active_index_count())
    }

    /// Indices covering the trails written by the last rebuild.
    pub fn active_index_count(&self) -> usize {
        self.active_trails * (self.node_count - 1) * QUAD_INDICES * CROSS_SECTION_SIDES
    }

    /// The prefix of the index buffer worth drawing.
    pub fn drawable_indices(&self) -> &[u32] {
        &self.indices[..self.active_index_count()]
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn active_trails(&self) -> usize {
        self.active_trails
    }

    pub fn trail_count(&self) -> usize {
        self.trail_count
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }
}
