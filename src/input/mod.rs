//! Viewport and input handling
//!
//! Window messages are consumed once per frame by these systems; nothing
//! mutates scene state from callback context. Resize keeps the viewport
//! bookkeeping current, the cursor feeds NDC picking and the idle parallax,
//! and the keyboard drives pause, focus nudges and the dock reset.

use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, WindowResized};
use bevy_panorbit_camera::PanOrbitCamera;

pub mod ray;

pub use ray::{cursor_to_ndc, ray_sphere_intersect};

use crate::camera::{DockReset, MainCamera};
use crate::scene::{Body, BodyRadius};

/// Frozen-motion flag; rendering continues while set.
#[derive(Resource, Default)]
pub struct Paused(pub bool);

/// Cursor position in normalized device coordinates, Y up.
#[derive(Resource, Default)]
pub struct CursorNdc(pub Vec2);

/// Persistent WASD offset applied on top of the idle focus-follow.
#[derive(Resource, Default)]
pub struct FocusNudge(pub Vec3);

/// Body currently under the cursor, if any. The sun is not selectable.
#[derive(Resource, Default)]
pub struct HoveredBody(pub Option<(Entity, Body)>);

/// Logical viewport extent, refreshed on every resize.
#[derive(Resource)]
pub struct ViewportSize(pub Vec2);

impl Default for ViewportSize {
    fn default() -> Self {
        Self(Vec2::new(1280.0, 720.0))
    }
}

/// Orbit-focus translation per keypress.
const NUDGE_STEP: f32 = 8.0;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Paused>()
            .init_resource::<CursorNdc>()
            .init_resource::<FocusNudge>()
            .init_resource::<HoveredBody>()
            .init_resource::<ViewportSize>()
            .add_systems(Startup, init_viewport_size)
            .add_systems(
                Update,
                (handle_resize, track_cursor, hover_pick, handle_keys),
            );
    }
}

fn init_viewport_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportSize>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    viewport.0 = Vec2::new(window.width(), window.height());
}

/// Track every viewport resize, not only the one at startup. The projection
/// aspect follows automatically; the NDC math reads this resource.
fn handle_resize(
    mut resize_events: MessageReader<WindowResized>,
    mut viewport: ResMut<ViewportSize>,
) {
    for event in resize_events.read() {
        viewport.0 = Vec2::new(event.width, event.height);
        debug!("viewport resized to {}x{}", event.width, event.height);
    }
}

fn track_cursor(
    mut cursor_events: MessageReader<CursorMoved>,
    viewport: Res<ViewportSize>,
    mut cursor: ResMut<CursorNdc>,
) {
    if let Some(event) = cursor_events.read().last() {
        cursor.0 = cursor_to_ndc(event.position, viewport.0);
    }
}

/// Cast a ray through the cursor and test it against every pickable body.
/// Zero intersections just means no hover.
fn hover_pick(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    bodies: Query<(Entity, &Body, &GlobalTransform, &BodyRadius)>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut hovered: ResMut<HoveredBody>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        hovered.0 = None;
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    let mut closest: Option<(Entity, Body, f32)> = None;
    for (entity, body, transform, radius) in bodies.iter() {
        if *body == Body::Sun {
            continue;
        }
        if let Some(t) =
            ray_sphere_intersect(ray.origin, *ray.direction, transform.translation(), radius.0)
            && closest.is_none_or(|(_, _, best)| t < best)
        {
            closest = Some((entity, *body, t));
        }
    }

    hovered.0 = closest.map(|(entity, body, _)| (entity, body));

    if mouse.just_pressed(MouseButton::Left)
        && let Some((_, body)) = hovered.0
    {
        info!("selected body: {:?}", body);
    }
}

/// Space toggles pause, R resets the dock, WASD nudges the orbit focus by a
/// fixed step per keypress while controls are enabled.
fn handle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut paused: ResMut<Paused>,
    mut nudge: ResMut<FocusNudge>,
    mut resets: MessageWriter<DockReset>,
    cameras: Query<(&Transform, &PanOrbitCamera), With<MainCamera>>,
) {
    if keys.just_pressed(KeyCode::Space) {
        paused.0 = !paused.0;
        info!("motion {}", if paused.0 { "paused" } else { "resumed" });
    }
    if keys.just_pressed(KeyCode::KeyR) {
        resets.write(DockReset);
    }

    let Ok((transform, pan_orbit)) = cameras.single() else {
        return;
    };
    if !pan_orbit.enabled {
        return;
    }

    let right = Vec3::from(transform.right());
    let up = Vec3::from(transform.up());
    let mut delta = Vec3::ZERO;
    if keys.just_pressed(KeyCode::KeyW) {
        delta += up;
    }
    if keys.just_pressed(KeyCode::KeyS) {
        delta -= up;
    }
    if keys.just_pressed(KeyCode::KeyA) {
        delta -= right;
    }
    if keys.just_pressed(KeyCode::KeyD) {
        delta += right;
    }
    if delta != Vec3::ZERO {
        nudge.0 += delta * NUDGE_STEP;
    }
}
