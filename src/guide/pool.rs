//! Pooled guide markers
//!
//! Dots are allocated once per variant and reused every frame. A write
//! activates the first `used` slots and deactivates the rest, so a shorter
//! prediction never leaves dots from a longer one behind.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One reusable guide dot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dot {
    pub position: Vec2,
    pub active: bool,
}

/// Fixed-capacity dot arena for one shot variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotPool {
    slots: Vec<Dot>,
    used: usize,
}

impl DotPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Dot::default(); capacity],
            used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of active dots
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn slots(&self) -> &[Dot] {
        &self.slots
    }

    /// Place dots along `points`; returns how many were activated
    pub fn write(&mut self, points: &[Vec2]) -> usize {
        let used = points.len().min(self.slots.len());
        for (slot, point) in self.slots.iter_mut().zip(points) {
            slot.position = *point;
            slot.active = true;
        }
        for slot in &mut self.slots[used..] {
            slot.active = false;
        }
        self.used = used;
        used
    }

    /// Deactivate every dot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        self.used = 0;
    }

    /// Positions of the active dots, in path order
    pub fn active_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.slots[..self.used].iter().map(|d| d.position)
    }
}

/// Ghost ball marking where a predicted shot rests
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GhostMarker {
    pub position: Vec2,
    pub visible: bool,
}

impl GhostMarker {
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shorter_write_deactivates_tail() {
        let mut pool = DotPool::new(5);
        let long: Vec<Vec2> = (0..5).map(|i| Vec2::splat(i as f32)).collect();
        assert_eq!(pool.write(&long), 5);

        assert_eq!(pool.write(&long[..2]), 2);
        assert!(pool.slots()[..2].iter().all(|d| d.active));
        assert!(pool.slots()[2..].iter().all(|d| !d.active));
        assert_eq!(pool.active_positions().collect::<Vec<_>>(), long[..2].to_vec());
    }

    #[test]
    fn test_overlong_write_truncates() {
        let mut pool = DotPool::new(3);
        let points = vec![Vec2::ONE; 10];
        assert_eq!(pool.write(&points), 3);
        assert_eq!(pool.used(), 3);
    }

    #[test]
    fn test_clear_and_ghost() {
        let mut pool = DotPool::new(4);
        pool.write(&[Vec2::X, Vec2::Y]);
        pool.clear();
        assert_eq!(pool.used(), 0);
        assert!(pool.slots().iter().all(|d| !d.active));

        let mut ghost = GhostMarker::default();
        assert!(!ghost.visible);
        ghost.place(Vec2::new(1.0, 2.0));
        assert!(ghost.visible);
        ghost.hide();
        assert!(!ghost.visible);
        assert_eq!(ghost.position, Vec2::new(1.0, 2.0));
    }

    proptest! {
        #[test]
        fn prop_pool_watermark(capacity in 0usize..40, first in 0usize..60, second in 0usize..60) {
            let mut pool = DotPool::new(capacity);
            for len in [first, second] {
                let points: Vec<Vec2> = (0..len).map(|i| Vec2::new(i as f32, -(i as f32))).collect();
                let used = pool.write(&points);
                prop_assert_eq!(used, len.min(capacity));
                for (i, dot) in pool.slots().iter().enumerate() {
                    if i < used {
                        prop_assert!(dot.active);
                        prop_assert_eq!(dot.position, points[i]);
                    } else {
                        prop_assert!(!dot.active);
                    }
                }
            }
        }
    }
}
