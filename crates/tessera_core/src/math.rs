//! Math utilities
//!
//! Re-exports glam with a few helpers used by the physics clients.

pub use glam::*;

/// Clamp each component of `point` into the box spanned by `min` and `max`.
#[inline]
pub fn clamp_to_box(point: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    point.clamp(min, max)
}
