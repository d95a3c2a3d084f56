//! Index and vertex builders for trail ribbons.
//!
//! Vertices are laid out node-major, side-minor: ring `n` of trail block `b`
//! starts at `(b * node_count + n) * CROSS_SECTION_SIDES`. Only started trails
//! get a block, packed from the front of the buffer in trail order, so the
//! first `active * (node_count - 1) * 48` indices cover exactly the live rings.

use glam::Vec3;

use trailburst_core::constants::{CROSS_SECTION_SIDES, CROSS_SECTION_STEP, QUAD_INDICES};
use trailburst_core::error::GeometryError;
use trailburst_core::math::UP;
use trailburst_core::trail::TrailSnapshot;

/// Indices needed to draw `trail_count` full trails.
pub fn index_count(trail_count: usize, node_count: usize) -> usize {
    trail_count * node_count.saturating_sub(1) * CROSS_SECTION_SIDES * QUAD_INDICES
}

/// Vertices needed to hold `trail_count` full trails.
pub fn vertex_count(trail_count: usize, node_count: usize) -> usize {
    trail_count * node_count * CROSS_SECTION_SIDES
}

/// Static triangulation joining each ring to the next one along the trail.
///
/// The last node of a trail never starts a segment, so each trail contributes
/// `node_count - 1` segments of eight quads.
pub fn build_index_buffer(trail_count: usize, node_count: usize) -> Result<Vec<u32>, GeometryError> {
    if node_count < 2 {
        return Err(GeometryError::NodeCountTooSmall(node_count));
    }

    let sides = CROSS_SECTION_SIDES as u32;
    let mut indices = Vec::with_capacity(index_count(trail_count, node_count));
    for trail in 0..trail_count {
        for node in 0..node_count - 1 {
            let vert = ((trail * node_count + node) * CROSS_SECTION_SIDES) as u32;
            for c in 0..sides {
                // The last side wraps back to side 0.
                let a = vert + c;
                let b = if c == sides - 1 { vert } else { a + 1 };
                indices.extend_from_slice(&[a, a + sides, b, b, a + sides, b + sides]);
            }
        }
    }
    Ok(indices)
}

/// Fill `vertices` with a ring per node for every started trail in `snapshot`.
///
/// Ring `k` sits on the node at offset `k` from the head. The head is the
/// newest sample, so ring 0 pairs it with the oldest one and collapses, while
/// rings 1.. run from oldest to newest. A node whose successor is older than
/// itself, or which is unwritten or past `life` at `now`, collapses onto its
/// successor so the segment has zero length. Returns the number of started trails written; unstarted trails are
/// skipped and leave no block behind.
pub fn build_vertices(
    snapshot: &TrailSnapshot<'_>,
    thickness: f32,
    now: f32,
    life: f32,
    vertices: &mut [Vec3],
) -> Result<usize, GeometryError> {
    let node_count = snapshot.node_count;
    let trail_count = snapshot.trail_count();
    if node_count < 2 {
        return Err(GeometryError::NodeCountTooSmall(node_count));
    }
    let expected_nodes = trail_count * node_count;
    if snapshot.nodes.len() != expected_nodes {
        return Err(GeometryError::NodeBufferSize {
            expected: expected_nodes,
            actual: snapshot.nodes.len(),
        });
    }
    let expected_verts = vertex_count(trail_count, node_count);
    if vertices.len() != expected_verts {
        return Err(GeometryError::VertexBufferSize {
            expected: expected_verts,
            actual: vertices.len(),
        });
    }

    let mut active = 0;
    let mut out = 0;
    for trail in 0..trail_count {
        if !snapshot.trails[trail].is_started() {
            continue;
        }
        active += 1;

        for k in 0..node_count {
            let (Some(&first), Some(&second)) = (snapshot.node(trail, k), snapshot.node(trail, k + 1))
            else {
                continue;
            };
            let usable = second.time >= first.time && first.is_alive(now, life);
            let p0 = if usable { first.position } else { second.position };

            let tangent = (second.position - p0).normalize_or_zero();
            let binormal = tangent.cross(UP);
            let normal = tangent.cross(binormal);

            for side in 0..CROSS_SECTION_SIDES {
                let r = side as f32 * CROSS_SECTION_STEP;
                let offset = (normal * r.cos() + binormal * r.sin()).normalize_or_zero();
                vertices[out] = p0 + offset * thickness;
                out += 1;
            }
        }
    }
    Ok(active)
}
