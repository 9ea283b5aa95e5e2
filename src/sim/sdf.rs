//! Signed distance functions for static colliders
//!
//! Overlap tests and contact points in the reference world are expressed as
//! signed distances: negative inside, zero on the surface, positive outside.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Closest point to `p` on the segment `a..b`
pub fn closest_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a; // Degenerate segment
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Signed distance to a capsule (segment `a..b` thickened by `half_thickness`)
#[inline]
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2, half_thickness: f32) -> f32 {
    (p - closest_on_segment(p, a, b)).length() - half_thickness
}
