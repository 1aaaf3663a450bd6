//! Procedural particle field sampling
//!
//! Pure math behind the starfield and the solar eruption plume. The RNG is
//! passed in so tests can run seeded; call sites use `rand::thread_rng()`.

use bevy::prelude::*;
use rand::Rng;

/// Sample `count` points on the surface of a sphere of the given radius.
///
/// Each point is drawn as three independent uniform samples in [-1, 1],
/// normalized and scaled. Every returned point lies at exactly `radius` from
/// the origin (up to float rounding); the distribution inherits the cube's
/// corner bias rather than being uniform over the sphere.
pub fn sphere_surface_positions<R: Rng>(rng: &mut R, count: usize, radius: f32) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(count);

    while positions.len() < count {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        // A draw too close to the origin has no usable direction; redraw.
        if v.length_squared() < 1e-6 {
            continue;
        }
        positions.push(v.normalize() * radius);
    }

    positions
}

/// Sample `count` points uniformly inside a ball of the given radius.
///
/// Rejection sampling over the enclosing cube: accept iff the norm is below
/// `radius`. Expected acceptance is the ball/cube volume ratio (~0.524), so
/// this terminates quickly in practice with no attempt bound.
pub fn sphere_volume_positions<R: Rng>(rng: &mut R, count: usize, radius: f32) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(count);

    while positions.len() < count {
        let v = Vec3::new(
            rng.gen_range(-radius..=radius),
            rng.gen_range(-radius..=radius),
            rng.gen_range(-radius..=radius),
        );
        if v.length() < radius {
            positions.push(v);
        }
    }

    positions
}

/// One uniformly random point inside a ball; used when recycling a spent
/// eruption particle back into the emitter volume.
pub fn sphere_volume_point<R: Rng>(rng: &mut R, radius: f32) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-radius..=radius),
            rng.gen_range(-radius..=radius),
            rng.gen_range(-radius..=radius),
        );
        if v.length() < radius {
            return v;
        }
    }
}

/// Independent uniform size per particle in [min, max].
pub fn random_sizes<R: Rng>(rng: &mut R, count: usize, min: f32, max: f32) -> Vec<f32> {
    (0..count).map(|_| rng.gen_range(min..=max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_surface_positions_lie_on_sphere() {
        let mut rng = StdRng::seed_from_u64(7);
        let radius = 1200.0;
        let positions = sphere_surface_positions(&mut rng, 500, radius);

        assert_eq!(positions.len(), 500);
        for p in &positions {
            assert!(
                (p.length() - radius).abs() < 1e-2,
                "point {:?} has norm {} != {}",
                p,
                p.length(),
                radius
            );
        }
    }

    #[test]
    fn test_volume_positions_stay_inside_ball() {
        let mut rng = StdRng::seed_from_u64(11);
        let radius = 180.0;
        let positions = sphere_volume_positions(&mut rng, 500, radius);

        assert_eq!(positions.len(), 500);
        for p in &positions {
            assert!(p.length() < radius, "point {:?} escaped the ball", p);
        }
    }

    #[test]
    fn test_volume_point_inside_ball() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            assert!(sphere_volume_point(&mut rng, 42.0).length() < 42.0);
        }
    }

    #[test]
    fn test_random_sizes_within_bounds() {
        let mut rng = StdRng::seed_from_u64(17);
        let sizes = random_sizes(&mut rng, 300, 0.5, 3.5);

        assert_eq!(sizes.len(), 300);
        for s in &sizes {
            assert!((0.5..=3.5).contains(s));
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(19);
        assert!(sphere_surface_positions(&mut rng, 0, 10.0).is_empty());
        assert!(sphere_volume_positions(&mut rng, 0, 10.0).is_empty());
        assert!(random_sizes(&mut rng, 0, 0.0, 1.0).is_empty());
    }
}
