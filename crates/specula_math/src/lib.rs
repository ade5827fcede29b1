//! Specula math - vectors, rays and parameter intervals.
//!
//! `Vec3` and friends come straight from `glam`; this crate only adds the
//! ray-tracing specific pieces on top.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Minimum ray parameter for secondary and shadow rays.
///
/// Keeps a ray spawned on a surface from re-hitting that same surface.
pub const EPSILON: f32 = 1e-4;

/// Floor for squared distances (inverse-square falloff at very close range).
pub const EPSILON_SQUARED: f32 = EPSILON * EPSILON;

/// Determinant below which a ray/triangle system is treated as singular.
pub const DETERMINANT_EPSILON: f32 = 1e-8;
