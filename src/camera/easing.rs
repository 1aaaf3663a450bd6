//! Pure easing helpers for the dock transition. No scene dependencies,
//! just math.

use bevy::prelude::*;

/// Quadratic ease-in-out over normalized time in [0, 1].
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Linearly interpolate between two points.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Interpolate with ease-in-out applied to `t`.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    lerp_vec3(a, b, ease_in_out(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(0.5), 0.5);
    }

    #[test]
    fn test_ease_in_out_is_slow_at_the_edges() {
        assert!(ease_in_out(0.1) < 0.1);
        assert!(ease_in_out(0.9) > 0.9);
    }

    #[test]
    fn test_ease_in_out_clamps() {
        assert_eq!(ease_in_out(-2.0), 0.0);
        assert_eq!(ease_in_out(3.0), 1.0);
    }

    #[test]
    fn test_ease_vec3_midpoint() {
        let mid = ease_vec3(Vec3::ZERO, Vec3::new(10.0, -4.0, 2.0), 0.5);
        assert!((mid - Vec3::new(5.0, -2.0, 1.0)).length() < 1e-5);
    }
}
