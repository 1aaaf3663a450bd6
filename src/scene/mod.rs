//! Celestial scene graph
//!
//! Spawns the body hierarchy: sun (with its eruption plume) and the
//! earth/clouds/moon group under a single root. World transforms compose
//! through the Bevy hierarchy, so a body's world pose is always its local
//! transform chained through its ancestors.

use bevy::prelude::*;

pub mod bodies;

pub use bodies::{EARTH_RADIUS, spawn_scene};

/// Root of the whole celestial assembly.
#[derive(Component)]
pub struct SolarSystemRoot;

/// Group holding earth, clouds and moon; the dock transition and the
/// planetary orbit move this group as one.
#[derive(Component)]
pub struct EarthMoonGroup;

/// Identity of a celestial body entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Body {
    Sun,
    Earth,
    Clouds,
    Moon,
}

/// Bounding-sphere radius used for ray picking.
#[derive(Component, Clone, Copy)]
pub struct BodyRadius(pub f32);

/// Marker for the background starfield entity.
#[derive(Component)]
pub struct StarField;

/// Solar eruption particle state. Positions are local to the emitter (the
/// sun); the render mesh mirrors them every frame.
#[derive(Component)]
pub struct EruptionField {
    pub radius: f32,
    pub speed: f32,
    pub positions: Vec<Vec3>,
}

/// Tracks pending body textures so load failures get logged once and the
/// scene keeps rendering on base colors.
#[derive(Resource, Default)]
pub struct SceneTextures {
    pub slots: Vec<TextureSlot>,
}

pub struct TextureSlot {
    pub label: &'static str,
    pub handle: Handle<Image>,
    pub resolved: bool,
    pub failed: bool,
}

impl SceneTextures {
    /// True once the earth base texture has finished loading or failing;
    /// gates overlay attachment.
    pub fn earth_resolved(&self) -> bool {
        self.slots
            .iter()
            .any(|s| s.label == "earth" && s.resolved)
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTextures>()
            .add_systems(Startup, spawn_scene)
            .add_systems(Update, monitor_textures);
    }
}

/// Poll pending texture loads; warn once per failure and keep going.
fn monitor_textures(asset_server: Res<AssetServer>, mut textures: ResMut<SceneTextures>) {
    for slot in textures.slots.iter_mut().filter(|s| !s.resolved) {
        let Some(state) = asset_server.get_load_state(slot.handle.id()) else {
            continue;
        };
        if state.is_loaded() {
            slot.resolved = true;
        } else if state.is_failed() {
            slot.resolved = true;
            slot.failed = true;
            warn!(
                "texture '{}' failed to load; rendering continues untextured",
                slot.label
            );
        }
    }
}
