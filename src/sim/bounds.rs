//! Circular world boundary

use glam::Vec3;

use crate::xz_length;

/// Pull a position back inside the circle of radius `limit` around the origin.
///
/// Angle and height are preserved; only the horizontal magnitude is clamped.
#[inline]
pub fn clamp_to_bounds(mut pos: Vec3, limit: f32) -> Vec3 {
    let r = xz_length(pos);
    if r > limit {
        let theta = pos.z.atan2(pos.x);
        pos.x = theta.cos() * limit;
        pos.z = theta.sin() * limit;
    }
    pos
}

/// Whether a point lies within `radius` of the world origin (horizontally)
#[inline]
pub fn within_radius(pos: Vec3, radius: f32) -> bool {
    xz_length(pos) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_RADIUS, RADIUS};
    use proptest::prelude::*;

    const LIMIT: f32 = RADIUS - PLAYER_RADIUS;

    #[test]
    fn test_inside_untouched() {
        let p = Vec3::new(10.0, 1.6, -20.0);
        assert_eq!(clamp_to_bounds(p, LIMIT), p);
    }

    #[test]
    fn test_outside_projected_radially() {
        let p = Vec3::new(100.0, 2.0, 0.0);
        let c = clamp_to_bounds(p, LIMIT);
        assert!((c.x - LIMIT).abs() < 1e-4);
        assert!(c.z.abs() < 1e-4);
        assert_eq!(c.y, 2.0);

        let p = Vec3::new(-80.0, 0.0, -80.0);
        let c = clamp_to_bounds(p, LIMIT);
        assert!((xz_length(c) - LIMIT).abs() < 1e-3);
        assert!((c.x - c.z).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_within_limit(x in -1.0e4f32..1.0e4, z in -1.0e4f32..1.0e4) {
            let c = clamp_to_bounds(Vec3::new(x, 0.0, z), LIMIT);
            prop_assert!(xz_length(c) <= LIMIT + 1e-3);
        }
    }
}
