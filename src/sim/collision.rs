//! Collision detection for axis-aligned geometry
//!
//! Balls are circles, everything else (bricks, paddle, power-ups) is an
//! axis-aligned rectangle described by its centre and full size.

use glam::Vec2;

/// Collision failures that have no meaningful push-out direction
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// Circle centre lies inside (or exactly on) the rectangle
    #[error("circle centre is inside the rectangle")]
    CenterInside,
}

/// Circle/rectangle overlap details
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Unit push-out direction, from the nearest rectangle point toward the circle centre
    pub direction: Vec2,
    /// Penetration depth (radius - distance)
    pub amount: f32,
    /// Offset from the nearest rectangle point to the circle centre (not unit)
    pub point: Vec2,
}

/// Scale `v` to unit length
///
/// `v` must be non-zero: a zero vector yields NaN components. Use
/// [`Vec2::try_normalize`] where zero is possible.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v / v.length()
}

/// Check a circle against an axis-aligned rectangle
///
/// Returns `Ok(None)` on a miss. A circle whose centre sits inside the
/// rectangle has no defined push-out direction and is reported as
/// [`CollisionError::CenterInside`].
pub fn circle_rect_overlap(
    center: Vec2,
    radius: f32,
    rect_pos: Vec2,
    rect_size: Vec2,
) -> Result<Option<Overlap>, CollisionError> {
    let half = rect_size / 2.0;
    let nearest = center.clamp(rect_pos - half, rect_pos + half);
    let point = center - nearest;
    let distance = point.length();

    if distance >= radius {
        return Ok(None);
    }

    let direction = point.try_normalize().ok_or(CollisionError::CenterInside)?;
    Ok(Some(Overlap {
        direction,
        amount: radius - distance,
        point,
    }))
}

/// Axis-aligned rectangle overlap test (touching edges count as overlap)
pub fn rect_rect_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let gap = (a_pos - b_pos).abs();
    let reach = (a_size + b_size) / 2.0;
    gap.x <= reach.x && gap.y <= reach.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BRICK: Vec2 = Vec2::new(40.0, 20.0);

    #[test]
    fn test_normalize_zero_is_not_finite() {
        assert!(!normalize(Vec2::ZERO).is_finite());
    }

    #[test]
    fn test_circle_rect_miss() {
        // Bounding boxes don't touch
        let result = circle_rect_overlap(Vec2::new(100.0, 100.0), 6.0, Vec2::ZERO, BRICK);
        assert_eq!(result, Ok(None));

        // Near a corner: bounding boxes touch but the circle doesn't
        let result = circle_rect_overlap(Vec2::new(25.0, 15.0), 6.0, Vec2::ZERO, BRICK);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_circle_rect_hit_from_above() {
        // Rect top edge is at y = -10; circle centre 4 above it
        let hit = circle_rect_overlap(Vec2::new(5.0, -14.0), 6.0, Vec2::ZERO, BRICK)
            .unwrap()
            .unwrap();
        assert!((hit.direction - Vec2::new(0.0, -1.0)).length() < 1e-6);
        assert!((hit.amount - 2.0).abs() < 1e-6);
        assert_eq!(hit.point, Vec2::new(0.0, -4.0));
    }

    #[test]
    fn test_circle_rect_hit_from_side() {
        let hit = circle_rect_overlap(Vec2::new(23.0, 0.0), 6.0, Vec2::ZERO, BRICK)
            .unwrap()
            .unwrap();
        assert!(hit.direction.x > 0.99);
        assert!((hit.amount - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_centered_in_rect_is_degenerate() {
        // Radius larger than the smaller half-extent: overlapping, but no push-out direction
        let result = circle_rect_overlap(Vec2::ZERO, 11.0, Vec2::ZERO, BRICK);
        assert_eq!(result, Err(CollisionError::CenterInside));
    }

    #[test]
    fn test_rect_rect() {
        let paddle = Vec2::new(100.0, 20.0);
        assert!(rect_rect_overlap(Vec2::ZERO, paddle, Vec2::new(60.0, 15.0), BRICK));
        assert!(!rect_rect_overlap(Vec2::ZERO, paddle, Vec2::new(71.0, 0.0), BRICK));
        assert!(!rect_rect_overlap(Vec2::ZERO, paddle, Vec2::new(0.0, 21.0), BRICK));
        // Edges touching
        assert!(rect_rect_overlap(Vec2::ZERO, paddle, Vec2::new(70.0, 0.0), BRICK));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_unit(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4) {
            prop_assume!(x.abs() > 1.0e-3 || y.abs() > 1.0e-3);
            let n = normalize(Vec2::new(x, y));
            prop_assert!((n.length() - 1.0).abs() < 1.0e-4);
        }

        #[test]
        fn prop_rect_rect_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            aw in 1.0f32..80.0, ah in 1.0f32..80.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let a_size = Vec2::new(aw, ah);
            prop_assert_eq!(
                rect_rect_overlap(a, a_size, b, BRICK),
                rect_rect_overlap(b, BRICK, a, a_size)
            );
        }

        #[test]
        fn prop_far_circles_never_overlap(
            cx in -500.0f32..500.0, cy in -500.0f32..500.0, radius in 1.0f32..20.0,
        ) {
            // Circle's bounding box does not intersect the rect
            prop_assume!(cx.abs() >= BRICK.x / 2.0 + radius || cy.abs() >= BRICK.y / 2.0 + radius);
            prop_assert_eq!(circle_rect_overlap(Vec2::new(cx, cy), radius, Vec2::ZERO, BRICK), Ok(None));
        }

        #[test]
        fn prop_overlap_pushes_out(cx in -30.0f32..30.0, cy in -20.0f32..20.0) {
            let center = Vec2::new(cx, cy);
            if let Ok(Some(hit)) = circle_rect_overlap(center, 6.0, Vec2::ZERO, BRICK) {
                let moved = center + hit.direction * hit.amount;
                let after = circle_rect_overlap(moved, 6.0, Vec2::ZERO, BRICK);
                prop_assert!(matches!(after, Ok(None)) || matches!(after, Ok(Some(h)) if h.amount < 1.0e-3));
            }
        }
    }
}
