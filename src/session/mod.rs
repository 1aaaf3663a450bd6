//! Session persistence systems
//!
//! Saves the docked pose when the transition completes and restores it on
//! startup and when the window regains focus. Restores are hard jumps: the
//! stored transforms are applied directly and the dock state is forced,
//! never re-animated.

use bevy::prelude::*;
use bevy::window::WindowFocused;
use bevy_panorbit_camera::PanOrbitCamera;
use chrono::Utc;

pub mod store;

pub use store::{PersistedSnapshot, SnapshotStore, Vec3Record};

use crate::camera::{
    DockCompleted, DockReset, DockState, MainCamera, set_orbit_pose, spawn_rig,
};
use crate::scene::{EarthMoonGroup, spawn_scene};

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        let store = match SnapshotStore::new() {
            Ok(store) => store,
            Err(err) => {
                warn!("session cache directory unavailable ({err:#}); using temp dir");
                SnapshotStore::new_in_dir(std::env::temp_dir().join("starportal-session"))
            }
        };

        app.insert_resource(store)
            .add_systems(
                Startup,
                restore_on_start.after(spawn_scene).after(spawn_rig),
            )
            .add_systems(Update, (restore_on_focus, clear_on_reset))
            .add_systems(OnEnter(DockState::Docked), save_session);
    }
}

/// Persist the docked pose. Runs on the Docking→Docked transition (and on a
/// forced restore into Docked, where it rewrites identical data).
fn save_session(
    store: Res<SnapshotStore>,
    groups: Query<&Transform, (With<EarthMoonGroup>, Without<MainCamera>)>,
    cameras: Query<(&Transform, &PanOrbitCamera), With<MainCamera>>,
) {
    let Ok(group) = groups.single() else {
        return;
    };
    let Ok((camera, pan_orbit)) = cameras.single() else {
        return;
    };

    let snapshot = PersistedSnapshot {
        globe_position: group.translation.into(),
        camera_position: camera.translation.into(),
        controls_enabled: pan_orbit.enabled,
        saved_at: Utc::now(),
    };
    match store.save(&snapshot) {
        Ok(()) => debug!("session snapshot saved"),
        Err(err) => warn!("failed to persist session snapshot: {err:#}"),
    }
}

fn restore_on_start(
    store: Res<SnapshotStore>,
    mut groups: Query<&mut Transform, (With<EarthMoonGroup>, Without<MainCamera>)>,
    mut cameras: Query<(&mut Transform, &mut PanOrbitCamera), With<MainCamera>>,
    mut next: ResMut<NextState<DockState>>,
    mut completed: ResMut<DockCompleted>,
) {
    let Some(snapshot) = store.load() else {
        return;
    };
    info!("restoring session snapshot from previous visit");
    apply_snapshot(&snapshot, &mut groups, &mut cameras, &mut next, &mut completed);
}

/// Re-apply the snapshot when the window comes back into focus, so a
/// backgrounded session resumes in the same pose.
fn restore_on_focus(
    mut focus_events: MessageReader<WindowFocused>,
    store: Res<SnapshotStore>,
    mut groups: Query<&mut Transform, (With<EarthMoonGroup>, Without<MainCamera>)>,
    mut cameras: Query<(&mut Transform, &mut PanOrbitCamera), With<MainCamera>>,
    mut next: ResMut<NextState<DockState>>,
    mut completed: ResMut<DockCompleted>,
) {
    if !focus_events.read().any(|event| event.focused) {
        return;
    }
    let Some(snapshot) = store.load() else {
        return;
    };
    apply_snapshot(&snapshot, &mut groups, &mut cameras, &mut next, &mut completed);
}

/// An explicit dock reset also forgets the persisted pose.
fn clear_on_reset(mut resets: MessageReader<DockReset>, store: Res<SnapshotStore>) {
    if resets.read().next().is_some() {
        store.clear();
    }
}

fn apply_snapshot(
    snapshot: &PersistedSnapshot,
    groups: &mut Query<&mut Transform, (With<EarthMoonGroup>, Without<MainCamera>)>,
    cameras: &mut Query<(&mut Transform, &mut PanOrbitCamera), With<MainCamera>>,
    next: &mut NextState<DockState>,
    completed: &mut DockCompleted,
) {
    let Ok(mut group) = groups.single_mut() else {
        return;
    };
    let Ok((mut camera, mut pan_orbit)) = cameras.single_mut() else {
        return;
    };

    let globe: Vec3 = snapshot.globe_position.into();
    group.translation = globe;
    camera.translation = snapshot.camera_position.into();
    camera.look_at(globe, Vec3::Y);

    pan_orbit.enabled = snapshot.controls_enabled;
    if snapshot.controls_enabled {
        set_orbit_pose(&mut pan_orbit, globe, camera.translation - globe);
        next.set(DockState::Orbiting);
    } else {
        completed.0 = true;
        next.set(DockState::Docked);
    }
}
