//! Dock transition state machine and tween.
//!
//! Orbiting is the free-navigation state; flying close enough to the globe
//! starts Docking, a fixed-length animated transition that parks the globe
//! and camera into the portal framing. Docked is terminal until the explicit
//! reset input.

use bevy::prelude::*;

use crate::camera::easing::{ease_in_out, ease_vec3};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockState {
    #[default]
    Orbiting,
    Docking,
    Docked,
}

/// Orbit distance clamp while navigating.
pub const MIN_ORBIT_DISTANCE: f32 = 200.0;
pub const MAX_ORBIT_DISTANCE: f32 = 500.0;
pub const DEFAULT_ORBIT_DISTANCE: f32 = 400.0;

/// Zooming to within this margin of the minimum distance starts the dock.
pub const DOCK_TRIGGER_MARGIN: f32 = 10.0;

pub const DOCK_DURATION_SECS: f32 = 2.5;

/// Parked framing: globe shifts aside to make room for the portal panel,
/// camera pulls to a fixed vantage, globe takes one extra part-turn.
pub const DOCK_GLOBE_POSITION: Vec3 = Vec3::new(-170.0, -30.0, 0.0);
pub const DOCK_CAMERA_POSITION: Vec3 = Vec3::new(55.0, 8.0, 310.0);
pub const DOCK_YAW_TURN: f32 = 2.3;

/// Set after the first completed dock; the proximity trigger never fires
/// again for the session until reset.
#[derive(Resource, Default)]
pub struct DockCompleted(pub bool);

/// Raised exactly once per Docked entry; the login surface listens.
#[derive(Message)]
pub struct PortalReveal;

/// Explicit external reset back to free orbiting.
#[derive(Message)]
pub struct DockReset;

/// In-flight dock animation state.
#[derive(Resource)]
pub struct DockingTween {
    pub elapsed: f32,
    pub globe_from: Vec3,
    pub camera_from: Vec3,
    pub rotation_from: Quat,
}

/// One sampled animation step.
pub struct DockPose {
    pub globe_position: Vec3,
    pub globe_rotation: Quat,
    pub camera_position: Vec3,
}

impl DockingTween {
    pub fn new(globe_from: Vec3, camera_from: Vec3, rotation_from: Quat) -> Self {
        Self {
            elapsed: 0.0,
            globe_from,
            camera_from,
            rotation_from,
        }
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / DOCK_DURATION_SECS).clamp(0.0, 1.0)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= DOCK_DURATION_SECS
    }

    /// Globe position, globe rotation and camera position for the current
    /// progress, all on the same ease-in-out curve.
    pub fn sample(&self) -> DockPose {
        let t = self.progress();
        DockPose {
            globe_position: ease_vec3(self.globe_from, DOCK_GLOBE_POSITION, t),
            globe_rotation: self.rotation_from
                * Quat::from_rotation_y(ease_in_out(t) * DOCK_YAW_TURN),
            camera_position: ease_vec3(self.camera_from, DOCK_CAMERA_POSITION, t),
        }
    }
}

/// Proximity trigger guard: only from free orbit, only before the first
/// completed dock.
pub fn should_begin_docking(distance: f32, dock_completed: bool) -> bool {
    !dock_completed && distance <= MIN_ORBIT_DISTANCE + DOCK_TRIGGER_MARGIN
}

/// Derive a yaw/pitch/radius orbit pose from a camera offset relative to its
/// focus, clamping the radius into the navigable range.
pub fn orbit_pose_from(offset: Vec3) -> (f32, f32, f32) {
    let length = offset.length().max(1e-5);
    let radius = length.clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
    let pitch = (offset.y / length).clamp(-1.0, 1.0).asin();
    let yaw = offset.x.atan2(offset.z);
    (yaw, pitch, radius)
}
