//! Pure kinematics helpers for the per-frame scheduler.

use bevy::prelude::*;
use rand::Rng;

use crate::field::sphere_volume_point;

/// Fixed per-frame yaw increments; clouds outrun the earth so the two
/// spheres visibly drift against each other.
pub const EARTH_SPIN_STEP: f32 = 0.0005;
pub const CLOUD_SPIN_STEP: f32 = 0.0007;

/// Per-frame advance of the starfield material's time uniform.
pub const TWINKLE_STEP: f32 = 0.01;

/// Circular orbit in the XZ plane. The center is supplied per frame, so the
/// path follows its anchor if that body drifts.
#[derive(Component, Clone, Copy, Debug)]
pub struct OrbitPath {
    pub radius: f32,
    pub phase: f32,
    pub height: f32,
    pub angular_speed: f32,
}

impl OrbitPath {
    pub fn new(radius: f32, phase: f32, height: f32, angular_speed: f32) -> Self {
        Self {
            radius,
            phase,
            height,
            angular_speed,
        }
    }

    /// Derive the path that passes through `start` while circling `center`.
    pub fn around(center: Vec3, start: Vec3, angular_speed: f32) -> Self {
        let dx = start.x - center.x;
        let dz = start.z - center.z;
        Self {
            radius: (dx * dx + dz * dz).sqrt(),
            phase: dz.atan2(dx),
            height: start.y,
            angular_speed,
        }
    }

    /// Position after `elapsed_secs` of wall-clock time, circling `center`.
    pub fn position(&self, center: Vec3, elapsed_secs: f32) -> Vec3 {
        let angle = self.phase + self.angular_speed * elapsed_secs;
        Vec3::new(
            center.x + self.radius * angle.cos(),
            self.height,
            center.z + self.radius * angle.sin(),
        )
    }
}

/// Advance one eruption particle radially outward. Drift speeds up with
/// distance from the emitter, capped at `speed` once past one radius.
pub fn eruption_step(position: Vec3, radius: f32, speed: f32) -> Vec3 {
    let distance = position.length();
    if distance < 1e-4 {
        return position;
    }
    let scale = (distance / radius).min(1.0);
    position + (position / distance) * (speed * scale)
}

/// Advance a whole plume, recycling particles past twice the emission radius
/// back into the volume. Post-condition: every particle sits within `2 * radius`.
pub fn advance_plume<R: Rng>(positions: &mut [Vec3], radius: f32, speed: f32, rng: &mut R) {
    for p in positions.iter_mut() {
        let next = eruption_step(*p, radius, speed);
        *p = if next.length() > radius * 2.0 {
            sphere_volume_point(rng, radius)
        } else {
            next
        };
    }
}
