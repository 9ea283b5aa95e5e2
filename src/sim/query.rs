//! Physics query contract consumed by the projectile integrator
//!
//! The integrator never owns a physics world; it asks a backend two questions
//! per sub-step (did the swept ball hit anything, is the ball inside anything).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier of a collider inside a query backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub u32);

/// Bit filter over collider layers (layer `n` is bit `n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing a single layer
    pub const fn layer(layer: u8) -> Self {
        LayerMask(1u32 << (layer as u32 & 31))
    }

    /// This mask plus another layer
    pub const fn with(self, layer: u8) -> Self {
        LayerMask(self.0 | (1u32 << (layer as u32 & 31)))
    }

    #[inline]
    pub fn contains(&self, layer: u8) -> bool {
        self.0 & (1u32 << (layer as u32 & 31)) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// First obstacle met by a swept circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Contact point on the obstacle surface
    pub point: Vec2,
    /// Center of the moving circle at the moment of contact
    pub centroid: Vec2,
    /// Distance travelled along the sweep direction before contact
    pub distance: f32,
    /// Surface normal at the contact (pointing toward the moving circle)
    pub normal: Vec2,
    pub collider: ColliderHandle,
}

/// Swept-circle and static-overlap queries against a set of colliders.
///
/// Implementations must be reentrant: every call is independent and may be
/// issued hundreds of times per frame.
pub trait PhysicsQuery {
    /// Sweep a circle from `origin` along unit `direction` for `max_distance`
    fn sweep_circle(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SweepHit>;

    /// Any collider overlapping the circle at `center`
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Option<ColliderHandle>;
}

/// Backend with no colliders at all (open sky)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySpace;

impl PhysicsQuery for EmptySpace {
    fn sweep_circle(&self, _: Vec2, _: f32, _: Vec2, _: f32, _: LayerMask) -> Option<SweepHit> {
        None
    }

    fn overlap_circle(&self, _: Vec2, _: f32, _: LayerMask) -> Option<ColliderHandle> {
        None
    }
}
