//! 2D vector primitives
//!
//! Thin helpers over `glam::Vec2` for the operations the integrator and the
//! force laws need. All pure, no state.

use glam::Vec2;

#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

#[inline]
pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

#[inline]
pub fn scale(v: Vec2, s: f32) -> Vec2 {
    v * s
}

/// Unit vector in the direction of `v`, or zero for a zero-length input
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Rotate by exactly 90°: (x, y) -> (-y, x)
#[inline]
pub fn rotate_90(v: Vec2) -> Vec2 {
    v.perp()
}

#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_rotate_90_is_counter_clockwise() {
        assert_eq!(rotate_90(Vec2::X), Vec2::Y);
        assert_eq!(rotate_90(Vec2::Y), Vec2::NEG_X);
        assert_eq!(rotate_90(Vec2::new(3.0, -2.0)), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        assert!((normalize(Vec2::new(0.0, -7.0)) - Vec2::NEG_Y).length() < EPS);
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert!((distance_squared(a, b) - 25.0).abs() < EPS);
        assert_eq!(sub(b, a), Vec2::new(3.0, 4.0));
        assert_eq!(add(a, scale(b, 2.0)), Vec2::new(9.0, 11.0));
    }
}
