//! Rotation helpers built on glam, using +Z forward and +Y up.

use glam::{Mat3, Quat, Vec3};

/// Canonical forward axis.
pub const FORWARD: Vec3 = Vec3::Z;

/// Canonical up axis.
pub const UP: Vec3 = Vec3::Y;

/// Rotation whose forward axis points along `forward` and whose up axis is as close
/// to `up` as possible.
///
/// Returns `None` when `forward` has no length. When `forward` is parallel to `up`,
/// an arbitrary perpendicular right axis is used.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let f = forward.try_normalize()?;
    let right = up
        .cross(f)
        .try_normalize()
        .unwrap_or_else(|| f.any_orthonormal_vector());
    let up = f.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, f)))
}

/// Shortest rotation taking the canonical forward axis onto `direction`.
/// A zero-length direction yields the identity.
pub fn rotation_to(direction: Vec3) -> Quat {
    match direction.try_normalize() {
        Some(dir) => Quat::from_rotation_arc(FORWARD, dir),
        None => Quat::IDENTITY,
    }
}

/// Unsigned angle between two vectors in degrees; 0 if either has no length.
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}
