//! Collision detection for a circular ball against axis-aligned rectangles
//!
//! Bricks are resolved with the closest-point method: clamp the circle center
//! into the rectangle, and the circle overlaps when that point is closer than
//! the radius. Response reflects along the axis of smaller penetration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Point inside the rectangle closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Axis a collision is resolved on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of a circle-rectangle check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Axis whose velocity component should flip
    pub axis: Axis,
    /// Distance to push the circle out along `axis`
    pub penetration: f32,
    /// Push direction along `axis` (+1 or -1)
    pub sign: f32,
}

/// Check a circle against a rectangle
///
/// Returns `None` when the circle does not overlap. Otherwise reports the axis
/// with the smaller penetration (`radius - |d|` per axis) as the separating axis.
/// When the center sits exactly on the rectangle along an axis, the push
/// direction falls back to opposing the velocity.
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    velocity: Vec2,
    rect: &Rect,
) -> Option<CollisionResult> {
    let closest = rect.closest_point(center);
    let d = center - closest;

    if d.length() >= radius {
        return None;
    }

    let overlap_x = radius - d.x.abs();
    let overlap_y = radius - d.y.abs();

    let (axis, penetration, delta, vel) = if overlap_x < overlap_y {
        (Axis::Horizontal, overlap_x, d.x, velocity.x)
    } else {
        (Axis::Vertical, overlap_y, d.y, velocity.y)
    };

    let sign = if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else if vel > 0.0 {
        -1.0
    } else {
        1.0
    };

    Some(CollisionResult {
        axis,
        penetration,
        sign,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> Rect {
        Rect::new(100.0, 100.0, 70.0, 20.0)
    }

    #[test]
    fn test_miss_when_far() {
        let r = circle_rect_collision(Vec2::new(50.0, 50.0), 8.0, Vec2::ZERO, &brick());
        assert!(r.is_none());
    }

    #[test]
    fn test_touching_exactly_is_not_a_hit() {
        // Distance to the bottom edge equals the radius
        let r = circle_rect_collision(Vec2::new(130.0, 128.0), 8.0, Vec2::ZERO, &brick());
        assert!(r.is_none());
    }

    #[test]
    fn test_hit_from_below_is_vertical() {
        let r = circle_rect_collision(
            Vec2::new(130.0, 125.0),
            8.0,
            Vec2::new(0.0, -5.0),
            &brick(),
        )
        .expect("hit");
        assert_eq!(r.axis, Axis::Vertical);
        assert_eq!(r.sign, 1.0);
        assert!((r.penetration - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_from_side_is_horizontal() {
        let r = circle_rect_collision(
            Vec2::new(95.0, 110.0),
            8.0,
            Vec2::new(5.0, 0.0),
            &brick(),
        )
        .expect("hit");
        assert_eq!(r.axis, Axis::Horizontal);
        assert_eq!(r.sign, -1.0);
        assert!((r.penetration - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_inside_pushes_against_velocity() {
        let r = circle_rect_collision(
            Vec2::new(130.0, 110.0),
            8.0,
            Vec2::new(0.0, -5.0),
            &brick(),
        )
        .expect("hit");
        assert_eq!(r.axis, Axis::Vertical);
        assert_eq!(r.sign, 1.0);
        assert_eq!(r.penetration, 8.0);
    }

    #[test]
    fn test_closest_point_clamps() {
        let rect = brick();
        assert_eq!(rect.closest_point(Vec2::new(0.0, 0.0)), Vec2::new(100.0, 100.0));
        assert_eq!(rect.closest_point(Vec2::new(500.0, 110.0)), Vec2::new(170.0, 110.0));
    }
}
