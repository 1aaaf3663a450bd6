//! Camera rig: damped orbit navigation, dock proximity detection and the
//! docking transition.
//!
//! The rig is the only writer of the camera transform: `bevy_panorbit_camera`
//! drives it while controls are enabled, the dock tween drives it during the
//! transition, and the session restore performs hard jumps. Orbit controls
//! are disabled on Docking entry so they never fight the animation.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

pub mod dock;
pub mod easing;

pub use dock::{
    DEFAULT_ORBIT_DISTANCE, DockCompleted, DockReset, DockState, DockingTween,
    MAX_ORBIT_DISTANCE, MIN_ORBIT_DISTANCE, PortalReveal, orbit_pose_from, should_begin_docking,
};

use crate::input::{CursorNdc, FocusNudge};
use crate::scene::EarthMoonGroup;

/// The one scene camera.
#[derive(Component)]
pub struct MainCamera;

/// Cursor-driven drift of the orbit focus while idling.
const PARALLAX_GAIN: f32 = 12.0;

/// Proximity checks run at most once per window, on camera movement.
const PROXIMITY_WINDOW_SECS: f32 = 0.1;

#[derive(Resource)]
struct ProximityGate {
    timer: Timer,
    pending: bool,
}

impl Default for ProximityGate {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(PROXIMITY_WINDOW_SECS, TimerMode::Repeating),
            pending: false,
        }
    }
}

pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<DockState>()
            .init_resource::<DockCompleted>()
            .init_resource::<ProximityGate>()
            .add_message::<PortalReveal>()
            .add_message::<DockReset>()
            .add_systems(Startup, spawn_rig)
            .add_systems(
                Update,
                (follow_focus, check_dock_proximity).run_if(in_state(DockState::Orbiting)),
            )
            .add_systems(
                Update,
                drive_docking
                    .run_if(in_state(DockState::Docking))
                    .run_if(resource_exists::<DockingTween>),
            )
            .add_systems(Update, reset_dock)
            .add_systems(OnEnter(DockState::Docking), begin_docking)
            .add_systems(OnEnter(DockState::Docked), finish_docking);
    }
}

/// Deep-space backdrop color of the landing page.
const SPACE_CLEAR_COLOR: Color = Color::srgb(0.016, 0.051, 0.129);
const FOG_COLOR: Color = Color::srgb(0.325, 0.369, 0.953);

/// Spawn the scene camera with its orbit controller, fog and tonemapping.
pub fn spawn_rig(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 1.0,
            far: 20_000.0,
            ..default()
        }),
        Camera {
            clear_color: ClearColorConfig::Custom(SPACE_CLEAR_COLOR),
            ..default()
        },
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(DEFAULT_ORBIT_DISTANCE),
            yaw: Some(0.0),
            pitch: Some(0.15),
            zoom_lower_limit: MIN_ORBIT_DISTANCE,
            zoom_upper_limit: Some(MAX_ORBIT_DISTANCE),
            force_update: true,
            ..default()
        },
        MainCamera,
        Tonemapping::TonyMcMapface,
        DistanceFog {
            color: FOG_COLOR,
            falloff: FogFalloff::Linear {
                start: DEFAULT_ORBIT_DISTANCE,
                end: 2000.0,
            },
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, DEFAULT_ORBIT_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Main Camera"),
    ));
}

/// Idle camera-follow: re-target the orbit focus at the earth group every
/// frame, drifting slightly toward the cursor. Suspended outside Orbiting.
fn follow_focus(
    cursor: Res<CursorNdc>,
    nudge: Res<FocusNudge>,
    groups: Query<&GlobalTransform, With<EarthMoonGroup>>,
    mut cameras: Query<&mut PanOrbitCamera, With<MainCamera>>,
) {
    let Ok(group) = groups.single() else {
        return;
    };
    let Ok(mut pan_orbit) = cameras.single_mut() else {
        return;
    };

    let parallax = Vec3::new(cursor.0.x, cursor.0.y, 0.0) * PARALLAX_GAIN;
    pan_orbit.target_focus = group.translation() + parallax + nudge.0;
}

/// Distance check against the orbit focus, throttled to the proximity
/// window; intermediate movement inside a window is dropped, not queued.
fn check_dock_proximity(
    time: Res<Time>,
    mut gate: ResMut<ProximityGate>,
    completed: Res<DockCompleted>,
    moved: Query<(), (With<MainCamera>, Changed<Transform>)>,
    cameras: Query<(&Transform, &PanOrbitCamera), With<MainCamera>>,
    mut next: ResMut<NextState<DockState>>,
) {
    if !moved.is_empty() {
        gate.pending = true;
    }
    if !gate.timer.tick(time.delta()).just_finished() || !gate.pending {
        return;
    }
    gate.pending = false;

    let Ok((transform, pan_orbit)) = cameras.single() else {
        return;
    };
    let distance = transform.translation.distance(pan_orbit.focus);
    if should_begin_docking(distance, completed.0) {
        info!("dock proximity reached at distance {distance:.1}");
        next.set(DockState::Docking);
    }
}

/// Disable the controls and capture the tween start poses.
fn begin_docking(
    mut commands: Commands,
    mut cameras: Query<(&Transform, &mut PanOrbitCamera), With<MainCamera>>,
    groups: Query<&Transform, (With<EarthMoonGroup>, Without<MainCamera>)>,
) {
    let Ok((camera_transform, mut pan_orbit)) = cameras.single_mut() else {
        return;
    };
    let Ok(group) = groups.single() else {
        return;
    };

    pan_orbit.enabled = false;
    commands.insert_resource(DockingTween::new(
        group.translation,
        camera_transform.translation,
        group.rotation,
    ));
    info!("docking transition started");
}

/// Advance the tween: globe translation, globe yaw and camera translation in
/// parallel, with the camera re-targeted at the globe every step.
fn drive_docking(
    time: Res<Time>,
    mut tween: ResMut<DockingTween>,
    mut groups: Query<&mut Transform, (With<EarthMoonGroup>, Without<MainCamera>)>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
    mut next: ResMut<NextState<DockState>>,
) {
    let Ok(mut group) = groups.single_mut() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    tween.elapsed += time.delta_secs();
    let pose = tween.sample();
    group.translation = pose.globe_position;
    group.rotation = pose.globe_rotation;
    camera.translation = pose.camera_position;
    camera.look_at(pose.globe_position, Vec3::Y);

    if tween.finished() {
        next.set(DockState::Docked);
    }
}

/// Docked entry: mark the dock completed and raise the reveal signal. The
/// snapshot write lives in the session module, on the same transition.
fn finish_docking(
    mut commands: Commands,
    mut completed: ResMut<DockCompleted>,
    mut reveal: MessageWriter<PortalReveal>,
) {
    completed.0 = true;
    reveal.write(PortalReveal);
    commands.remove_resource::<DockingTween>();
    info!("camera docked; portal reveal raised");
}

/// Explicit external reset: back to Orbiting with controls re-enabled and
/// the default framing restored.
fn reset_dock(
    mut resets: MessageReader<DockReset>,
    mut completed: ResMut<DockCompleted>,
    mut nudge: ResMut<FocusNudge>,
    mut next: ResMut<NextState<DockState>>,
    mut cameras: Query<&mut PanOrbitCamera, With<MainCamera>>,
    groups: Query<&GlobalTransform, With<EarthMoonGroup>>,
) {
    if resets.read().next().is_none() {
        return;
    }

    completed.0 = false;
    nudge.0 = Vec3::ZERO;
    next.set(DockState::Orbiting);

    let Ok(mut pan_orbit) = cameras.single_mut() else {
        return;
    };
    let focus = groups
        .single()
        .map(|g| g.translation())
        .unwrap_or(Vec3::ZERO);
    pan_orbit.enabled = true;
    set_orbit_pose(
        &mut pan_orbit,
        focus,
        Vec3::new(0.0, 0.0, DEFAULT_ORBIT_DISTANCE),
    );
    info!("dock reset; returning to free orbit");
}

/// Write a full orbit pose onto the controller so it picks the camera up
/// exactly where a hard jump put it.
pub fn set_orbit_pose(pan_orbit: &mut PanOrbitCamera, focus: Vec3, offset: Vec3) {
    let (yaw, pitch, radius) = orbit_pose_from(offset);
    pan_orbit.focus = focus;
    pan_orbit.target_focus = focus;
    pan_orbit.yaw = Some(yaw);
    pan_orbit.target_yaw = yaw;
    pan_orbit.pitch = Some(pitch);
    pan_orbit.target_pitch = pitch;
    pan_orbit.radius = Some(radius);
    pan_orbit.target_radius = radius;
    pan_orbit.force_update = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    fn rig_app() -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.init_resource::<Time>();
        app.init_resource::<CursorNdc>();
        app.init_resource::<FocusNudge>();
        app.add_plugins(CameraRigPlugin);

        let group = app
            .world_mut()
            .spawn((
                EarthMoonGroup,
                Transform::IDENTITY,
                GlobalTransform::IDENTITY,
            ))
            .id();

        // First update runs Startup and spawns the rig camera.
        app.update();
        let camera = app
            .world_mut()
            .query_filtered::<Entity, With<MainCamera>>()
            .single(app.world())
            .expect("rig camera spawned");

        // Park the camera inside the dock trigger margin.
        app.world_mut()
            .get_mut::<Transform>(camera)
            .unwrap()
            .translation = Vec3::new(0.0, 0.0, MIN_ORBIT_DISTANCE + 5.0);
        (app, camera, group)
    }

    fn advance(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    fn dock_state(app: &App) -> DockState {
        *app.world().resource::<State<DockState>>().get()
    }

    #[test]
    fn test_proximity_triggers_docking_within_one_window() {
        let (mut app, camera, _) = rig_app();

        advance(&mut app, 150);
        // Transition request lands this frame, applies on the next.
        advance(&mut app, 16);

        assert_eq!(dock_state(&app), DockState::Docking);
        let pan_orbit = app.world().get::<PanOrbitCamera>(camera).unwrap();
        assert!(!pan_orbit.enabled, "controls must drop on Docking entry");
        assert!(app.world().contains_resource::<DockingTween>());
    }

    #[test]
    fn test_distance_outside_margin_keeps_orbiting() {
        let (mut app, camera, _) = rig_app();
        app.world_mut()
            .get_mut::<Transform>(camera)
            .unwrap()
            .translation = Vec3::new(0.0, 0.0, MIN_ORBIT_DISTANCE + 50.0);

        for _ in 0..20 {
            advance(&mut app, 150);
        }
        assert_eq!(dock_state(&app), DockState::Orbiting);
    }

    #[test]
    fn test_docking_completes_into_terminal_docked() {
        let (mut app, camera, group) = rig_app();

        advance(&mut app, 150);
        advance(&mut app, 16);
        assert_eq!(dock_state(&app), DockState::Docking);

        // Run the tween past its duration.
        advance(&mut app, 3000);
        advance(&mut app, 16);
        assert_eq!(dock_state(&app), DockState::Docked);
        assert!(app.world().resource::<DockCompleted>().0);
        assert!(!app.world().resource::<Messages<PortalReveal>>().is_empty());

        let camera_transform = app.world().get::<Transform>(camera).unwrap();
        assert!((camera_transform.translation - dock::DOCK_CAMERA_POSITION).length() < 1e-3);
        let group_transform = app.world().get::<Transform>(group).unwrap();
        assert!((group_transform.translation - dock::DOCK_GLOBE_POSITION).length() < 1e-3);

        // Terminal: controls stay disabled however long we keep running.
        for _ in 0..20 {
            advance(&mut app, 150);
        }
        assert_eq!(dock_state(&app), DockState::Docked);
        let pan_orbit = app.world().get::<PanOrbitCamera>(camera).unwrap();
        assert!(!pan_orbit.enabled);
    }

    #[test]
    fn test_completed_dock_suppresses_retrigger() {
        let (mut app, camera, _) = rig_app();

        advance(&mut app, 150);
        advance(&mut app, 16);
        advance(&mut app, 3000);
        advance(&mut app, 16);
        assert_eq!(dock_state(&app), DockState::Docked);

        // Reset re-enables navigation.
        app.world_mut()
            .resource_mut::<Messages<DockReset>>()
            .write(DockReset);
        advance(&mut app, 16);
        advance(&mut app, 16);
        assert_eq!(dock_state(&app), DockState::Orbiting);
        assert!(app.world().get::<PanOrbitCamera>(camera).unwrap().enabled);
        assert!(!app.world().resource::<DockCompleted>().0);
    }
}
