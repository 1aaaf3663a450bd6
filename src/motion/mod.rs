//! Per-frame animation scheduler
//!
//! Body spin, twinkle time, planetary and lunar orbits and the eruption
//! plume all advance here. Motion halts while paused or docked; rendering is
//! Bevy's own pipeline and keeps running regardless, so the frame stays live
//! while the scene is frozen.

use bevy::prelude::*;
use rand::thread_rng;

pub mod kinematics;

pub use kinematics::{
    CLOUD_SPIN_STEP, EARTH_SPIN_STEP, OrbitPath, TWINKLE_STEP, advance_plume,
};

use crate::camera::DockState;
use crate::input::Paused;
use crate::materials::{StarfieldMaterial, write_sprite_centers};
use crate::scene::{Body, EarthMoonGroup, EruptionField};

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (spin_bodies, advance_twinkle, drift_eruptions).run_if(motion_active),
                (orbit_earth_group, orbit_moon).run_if(orbit_active),
            ),
        );
    }
}

/// Spin/twinkle/eruptions run while not paused and not docked.
pub fn motion_active(paused: Res<Paused>, dock: Res<State<DockState>>) -> bool {
    !paused.0 && *dock.get() != DockState::Docked
}

/// Orbit positioning only runs while free-orbiting; during the dock
/// transition the tween owns these transforms.
pub fn orbit_active(paused: Res<Paused>, dock: Res<State<DockState>>) -> bool {
    !paused.0 && *dock.get() == DockState::Orbiting
}

/// Fixed per-frame yaw for earth and clouds.
pub fn spin_bodies(mut bodies: Query<(&Body, &mut Transform)>) {
    for (body, mut transform) in &mut bodies {
        match body {
            Body::Earth => transform.rotate_y(EARTH_SPIN_STEP),
            Body::Clouds => transform.rotate_y(CLOUD_SPIN_STEP),
            _ => {}
        }
    }
}

/// Advance the shared time uniform; the only mutation the starfield needs.
pub fn advance_twinkle(mut materials: ResMut<Assets<StarfieldMaterial>>) {
    for (_, material) in materials.iter_mut() {
        material.time += TWINKLE_STEP;
    }
}

/// Carry the earth group along its circle around the sun's current position.
pub fn orbit_earth_group(
    time: Res<Time>,
    suns: Query<(&Body, &Transform), Without<EarthMoonGroup>>,
    mut groups: Query<(&mut Transform, &OrbitPath), With<EarthMoonGroup>>,
) {
    let Some((_, sun_transform)) = suns.iter().find(|(body, _)| **body == Body::Sun) else {
        return;
    };
    let Ok((mut transform, path)) = groups.single_mut() else {
        return;
    };
    transform.translation = path.position(sun_transform.translation, time.elapsed_secs());
}

/// Smaller, faster circle for the moon, local to the earth group.
pub fn orbit_moon(
    time: Res<Time>,
    mut moons: Query<(&Body, &mut Transform, &OrbitPath)>,
) {
    for (body, mut transform, path) in &mut moons {
        if *body == Body::Moon {
            transform.translation = path.position(Vec3::ZERO, time.elapsed_secs());
        }
    }
}

/// Drift eruption particles outward, recycle spent ones, and mirror the new
/// positions into the render mesh.
pub fn drift_eruptions(
    mut meshes: ResMut<Assets<Mesh>>,
    mut fields: Query<(&mut EruptionField, &Mesh3d)>,
) {
    let mut rng = thread_rng();
    for (field, mesh_handle) in &mut fields {
        let field = field.into_inner();
        advance_plume(&mut field.positions, field.radius, field.speed, &mut rng);

        let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
            continue;
        };
        write_sprite_centers(mesh, &field.positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use std::f32::consts::TAU;

    fn spin_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.init_state::<DockState>();
        app.insert_resource(Paused(false));
        app.add_systems(Update, spin_bodies.run_if(motion_active));
        app
    }

    fn yaw_of(app: &mut App, entity: Entity) -> f32 {
        let transform = app.world().get::<Transform>(entity).unwrap();
        transform.rotation.to_euler(EulerRot::YXZ).0
    }

    #[test]
    fn test_thousand_frames_of_spin() {
        let mut app = spin_app();
        let earth = app
            .world_mut()
            .spawn((Body::Earth, Transform::IDENTITY))
            .id();
        let clouds = app
            .world_mut()
            .spawn((Body::Clouds, Transform::IDENTITY))
            .id();

        for _ in 0..1000 {
            app.update();
        }

        let earth_yaw = yaw_of(&mut app, earth).rem_euclid(TAU);
        let cloud_yaw = yaw_of(&mut app, clouds).rem_euclid(TAU);
        assert!(
            (earth_yaw - 1000.0 * EARTH_SPIN_STEP).abs() < 1e-3,
            "earth yaw {}",
            earth_yaw
        );
        assert!(
            (cloud_yaw - 1000.0 * CLOUD_SPIN_STEP).abs() < 1e-3,
            "cloud yaw {}",
            cloud_yaw
        );
    }

    #[test]
    fn test_pause_freezes_spin() {
        let mut app = spin_app();
        let earth = app
            .world_mut()
            .spawn((Body::Earth, Transform::IDENTITY))
            .id();

        app.update();
        let moved = yaw_of(&mut app, earth);
        assert!(moved > 0.0);

        app.insert_resource(Paused(true));
        for _ in 0..50 {
            app.update();
        }
        assert_eq!(yaw_of(&mut app, earth), moved);
    }

    #[test]
    fn test_docked_suspends_spin() {
        let mut app = spin_app();
        let earth = app
            .world_mut()
            .spawn((Body::Earth, Transform::IDENTITY))
            .id();

        app.world_mut()
            .resource_mut::<NextState<DockState>>()
            .set(DockState::Docked);
        app.update();
        let after_transition = yaw_of(&mut app, earth);

        for _ in 0..50 {
            app.update();
        }
        assert_eq!(yaw_of(&mut app, earth), after_transition);
    }
}
