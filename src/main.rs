use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_panorbit_camera::PanOrbitCameraPlugin;

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod camera;
mod field;
mod input;
mod materials;
mod motion;
mod overlay;
mod scene;
mod session;
mod ui;

use camera::CameraRigPlugin;
use input::InputPlugin;
use materials::StarfieldMaterialPlugin;
use motion::MotionPlugin;
use overlay::OverlayPlugin;
use scene::ScenePlugin;
use session::SessionPlugin;
use ui::PortalUiPlugin;

/// Key light roughly from the sun's direction; the tinted fill and the
/// violet point light reproduce the landing page's palette.
fn setup_lights(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        brightness: 220.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            ..default()
        },
        Transform::from_xyz(-800.0, 2000.0, 400.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Key Light"),
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.475, 0.51, 0.965),
            illuminance: 4_000.0,
            ..default()
        },
        Transform::from_xyz(-200.0, 500.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Fill Light"),
    ));

    commands.spawn((
        PointLight {
            color: Color::srgb(0.522, 0.4, 0.8),
            intensity: 2_000_000.0,
            range: 3_000.0,
            ..default()
        },
        Transform::from_xyz(-200.0, 500.0, 200.0),
        Name::new("Accent Light"),
    ));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Starportal".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(StarfieldMaterialPlugin);

    app.add_plugins(ScenePlugin);
    app.add_plugins(InputPlugin);
    app.add_plugins(CameraRigPlugin);
    app.add_plugins(MotionPlugin);
    app.add_plugins(SessionPlugin);
    app.add_plugins(OverlayPlugin);
    app.add_plugins(PortalUiPlugin);

    app.add_systems(Startup, setup_lights);

    app.run();
}
