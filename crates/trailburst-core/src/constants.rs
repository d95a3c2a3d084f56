//! Flight and trail tuning constants.

/// Nominal frame time the burst envelope and frame-count ranges are authored against (seconds).
pub const FRAME_TIME: f32 = 0.016667;

/// Highest frame rate the trail store sizes its ring buffers for.
pub const MAX_FPS: f32 = 60.0;

// --- Evasive bursts ---

/// Number of re-armed bursts a projectile may fire per launch.
pub const WINDING_MAX: u32 = 2;

/// Ease-in / ease-out duration at both edges of a burst window (seconds).
pub const POWER_EDGE_TIME: f32 = FRAME_TIME * 4.0;

/// Upper bound on burst-direction samples per re-arm.
pub const EMIT_ATTEMPTS_MAX: u32 = 10;

/// Minimum angle between consecutive burst directions (degrees).
pub const EMIT_MIN_ANGLE_DEG: f32 = 60.0;

/// Magnitude range of the lateral x/y components of a burst candidate.
pub const EMIT_LATERAL_RANGE: (f32, f32) = (100.0, 130.0);

/// Range of the forward component added when the projectile faces away from its target.
pub const EMIT_FORWARD_RANGE: (f32, f32) = (200.0, 400.0);

/// Facing error beyond which bursts are biased back toward the target (degrees).
pub const EMIT_FACING_LIMIT_DEG: f32 = 90.0;

/// Start and width of the forward-bias ramp (degrees).
pub const EMIT_BIAS_START_DEG: f32 = 30.0;
pub const EMIT_BIAS_SPAN_DEG: f32 = 30.0;

// --- Orientation ---

/// Length the per-tick rotation increment is clamped to when `|omega * dt|` reaches 1.
pub const ROTATION_INCREMENT_MAX: f32 = 1.0 - 1e-6;

// --- Ribbon geometry ---

/// Sides of the ribbon cross-section polygon.
pub const CROSS_SECTION_SIDES: usize = 8;

/// Radians covered by one side of the cross-section.
pub const CROSS_SECTION_STEP: f32 = std::f32::consts::TAU / CROSS_SECTION_SIDES as f32;

/// Indices needed per quad (two triangles).
pub const QUAD_INDICES: usize = 6;

// --- Trail store defaults ---

/// Seconds a trail sample stays visible.
pub const DEFAULT_TRAIL_LIFE: f32 = 10.0;

/// Longest accepted sample life; bounds each ring at 3600 nodes.
pub const MAX_TRAIL_LIFE: f32 = 60.0;

/// Minimum distance between recorded samples.
pub const DEFAULT_UPDATE_DISTANCE_MIN: f32 = 0.01;

/// Fraction of projectile speed stored as trail inertia.
pub const DEFAULT_TRAIL_INERTIA: f32 = 0.1;

/// Ribbon radius.
pub const DEFAULT_TRAIL_THICKNESS: f32 = 0.25;
