//! Body spawning: meshes, materials, hierarchy and the particle fields.

use bevy::prelude::*;
use rand::thread_rng;
use std::f32::consts::PI;

use crate::field::{random_sizes, sphere_surface_positions, sphere_volume_positions};
use crate::materials::{StarfieldMaterial, pick_star_color, sprite_mesh};
use crate::motion::OrbitPath;
use crate::scene::{
    Body, BodyRadius, EarthMoonGroup, EruptionField, SceneTextures, SolarSystemRoot, StarField,
    TextureSlot,
};

pub const EARTH_RADIUS: f32 = 100.0;
pub const CLOUD_RADIUS: f32 = EARTH_RADIUS * 1.02;
pub const MOON_RADIUS: f32 = 27.0;
pub const MOON_ORBIT_RADIUS: f32 = 280.0;
pub const SUN_RADIUS: f32 = 160.0;
pub const SUN_POSITION: Vec3 = Vec3::new(-620.0, 140.0, -780.0);

const STAR_COUNT: usize = 2400;
const STAR_FIELD_RADIUS: f32 = 1400.0;
const STAR_SIZE_MIN: f32 = 0.6;
const STAR_SIZE_MAX: f32 = 3.2;

const ERUPTION_COUNT: usize = 600;
const ERUPTION_RADIUS: f32 = 190.0;
const ERUPTION_SPEED: f32 = 0.35;
const ERUPTION_SPRITE_SIZE: f32 = 2.4;

/// rad/s of wall-clock time.
const PLANET_ORBIT_RATE: f32 = 0.01;
const MOON_ORBIT_RATE: f32 = 0.05;
const MOON_ORBIT_PHASE: f32 = 1.2;

/// Initial presentation tilt of the globe.
const EARTH_TILT_YAW: f32 = -PI * 5.0 / 9.0;
const EARTH_TILT_ROLL: f32 = -PI / 6.0;

/// Build the scene graph. Re-invocation is a no-op while a root exists, so a
/// double mount can't duplicate bodies.
pub fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut star_materials: ResMut<Assets<StarfieldMaterial>>,
    mut textures: ResMut<SceneTextures>,
    asset_server: Res<AssetServer>,
    existing: Query<(), With<SolarSystemRoot>>,
) {
    if !existing.is_empty() {
        warn!("celestial scene already built; skipping rebuild");
        return;
    }

    let mut rng = thread_rng();

    let root = commands
        .spawn((
            SolarSystemRoot,
            Transform::IDENTITY,
            Visibility::default(),
            Name::new("Solar System"),
        ))
        .id();

    // Sun first, then the earth group; the plume rides on the sun.
    let sun_texture = asset_server.load("textures/sun.png");
    textures.slots.push(TextureSlot {
        label: "sun",
        handle: sun_texture.clone(),
        resolved: false,
        failed: false,
    });
    let sun = commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(SUN_RADIUS).mesh().ico(5).unwrap())),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.85, 0.45),
                base_color_texture: Some(sun_texture),
                emissive: LinearRgba::rgb(8.0, 5.0, 1.6),
                unlit: false,
                ..default()
            })),
            Transform::from_translation(SUN_POSITION),
            Body::Sun,
            BodyRadius(SUN_RADIUS),
            ChildOf(root),
            Name::new("Sun"),
        ))
        .id();

    let eruption_positions = sphere_volume_positions(&mut rng, ERUPTION_COUNT, ERUPTION_RADIUS);
    let eruption_sizes = vec![ERUPTION_SPRITE_SIZE; ERUPTION_COUNT];
    commands.spawn((
        Mesh3d(meshes.add(sprite_mesh(&eruption_positions, &eruption_sizes))),
        MeshMaterial3d(star_materials.add(StarfieldMaterial::new(Color::srgb(1.0, 0.5, 0.1)))),
        Transform::IDENTITY,
        EruptionField {
            radius: ERUPTION_RADIUS,
            speed: ERUPTION_SPEED,
            positions: eruption_positions,
        },
        ChildOf(sun),
        Name::new("Solar Eruptions"),
    ));

    let group = commands
        .spawn((
            EarthMoonGroup,
            Transform::IDENTITY,
            Visibility::default(),
            OrbitPath::around(SUN_POSITION, Vec3::ZERO, PLANET_ORBIT_RATE),
            ChildOf(root),
            Name::new("Earth-Moon Group"),
        ))
        .id();

    let earth_texture = asset_server.load("textures/earth.png");
    textures.slots.push(TextureSlot {
        label: "earth",
        handle: earth_texture.clone(),
        resolved: false,
        failed: false,
    });
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(EARTH_RADIUS).mesh().ico(5).unwrap())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.23, 0.13, 0.54),
            base_color_texture: Some(earth_texture),
            emissive: LinearRgba::rgb(0.013, 0.0, 0.022),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_rotation(
            Quat::from_rotation_y(EARTH_TILT_YAW) * Quat::from_rotation_z(EARTH_TILT_ROLL),
        ),
        Body::Earth,
        BodyRadius(EARTH_RADIUS),
        ChildOf(group),
        Name::new("Earth"),
    ));

    let cloud_texture = asset_server.load("textures/clouds.png");
    textures.slots.push(TextureSlot {
        label: "clouds",
        handle: cloud_texture.clone(),
        resolved: false,
        failed: false,
    });
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(CLOUD_RADIUS).mesh().ico(5).unwrap())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
            base_color_texture: Some(cloud_texture),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::IDENTITY,
        Body::Clouds,
        BodyRadius(CLOUD_RADIUS),
        ChildOf(group),
        Name::new("Clouds"),
    ));

    let moon_texture = asset_server.load("textures/moon.png");
    textures.slots.push(TextureSlot {
        label: "moon",
        handle: moon_texture.clone(),
        resolved: false,
        failed: false,
    });
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(MOON_RADIUS).mesh().ico(4).unwrap())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.8, 0.8, 0.82),
            base_color_texture: Some(moon_texture),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_xyz(MOON_ORBIT_RADIUS, 0.0, 0.0),
        OrbitPath::new(MOON_ORBIT_RADIUS, MOON_ORBIT_PHASE, 0.0, MOON_ORBIT_RATE),
        Body::Moon,
        BodyRadius(MOON_RADIUS),
        ChildOf(group),
        Name::new("Moon"),
    ));

    // Background starfield; positions are fixed for the life of the field,
    // only the material time moves.
    let star_positions = sphere_surface_positions(&mut rng, STAR_COUNT, STAR_FIELD_RADIUS);
    let star_sizes = random_sizes(&mut rng, STAR_COUNT, STAR_SIZE_MIN, STAR_SIZE_MAX);
    commands.spawn((
        Mesh3d(meshes.add(sprite_mesh(&star_positions, &star_sizes))),
        MeshMaterial3d(star_materials.add(StarfieldMaterial::new(pick_star_color(&mut rng)))),
        Transform::IDENTITY,
        StarField,
        Name::new("Starfield"),
    ));

    info!(
        "celestial scene built: {} stars, {} eruption particles",
        STAR_COUNT, ERUPTION_COUNT
    );
}
