//! Globe overlays: route arcs and city markers
//!
//! Feed data is typed and bundled with the binary; attachment waits for an
//! explicit readiness condition (earth spawned, base texture resolved)
//! instead of a startup delay. Markers parent to the earth so they ride its
//! spin; arcs are re-drawn through the earth's world transform every frame.

use bevy::prelude::*;

pub mod feeds;

pub use feeds::{CityMarker, MarkerFeed, RouteArc, RouteFeed, latlng_to_local, sample_arc};

use crate::scene::{Body, EARTH_RADIUS, SceneTextures};

const ROUTES_JSON: &str = include_str!("../../data/routes.json");
const MARKERS_JSON: &str = include_str!("../../data/markers.json");

const ARC_SEGMENTS: usize = 24;
const DEFAULT_ARC_ALTITUDE: f32 = 0.25;
const MARKER_BASE_RADIUS: f32 = 2.2;

const ARC_OK_COLOR: Color = Color::srgb(0.612, 1.0, 0.0);
const ARC_DOWN_COLOR: Color = Color::srgb(1.0, 0.251, 0.0);
const MARKER_COLOR: Color = Color::srgb(1.0, 0.796, 0.129);

/// Parsed feeds plus the attachment flag.
#[derive(Resource, Default)]
pub struct OverlayFeeds {
    pub routes: Vec<RouteArc>,
    pub markers: Vec<CityMarker>,
    pub attached: bool,
}

/// Marker entity tag. The label is not consumed yet, but a tooltip would
/// read it from here.
#[allow(dead_code)]
#[derive(Component)]
pub struct OverlayMarker {
    pub city: String,
}

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlayFeeds>()
            .add_systems(Startup, load_feeds)
            .add_systems(Update, (attach_when_ready, draw_route_arcs));
    }
}

/// Deserialize the bundled feeds; a malformed feed logs and yields an empty
/// overlay rather than failing the scene.
fn load_feeds(mut overlay: ResMut<OverlayFeeds>) {
    match serde_json::from_str::<RouteFeed>(ROUTES_JSON) {
        Ok(feed) => {
            overlay.routes = feed.routes;
            overlay.routes.sort_by_key(|route| route.order);
        }
        Err(err) => warn!("route feed unreadable, overlay arcs disabled: {err}"),
    }
    match serde_json::from_str::<MarkerFeed>(MARKERS_JSON) {
        Ok(feed) => overlay.markers = feed.markers,
        Err(err) => warn!("marker feed unreadable, overlay markers disabled: {err}"),
    }
}

/// Attach markers once the globe is actually ready; late texture loads just
/// mean a late (not missed) attachment.
fn attach_when_ready(
    mut overlay: ResMut<OverlayFeeds>,
    textures: Res<SceneTextures>,
    earths: Query<(Entity, &Body)>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if overlay.attached || !textures.earth_resolved() {
        return;
    }
    let Some((earth, _)) = earths.iter().find(|(_, body)| **body == Body::Earth) else {
        return;
    };

    let material = materials.add(StandardMaterial {
        base_color: MARKER_COLOR,
        unlit: true,
        ..default()
    });
    let mesh = meshes.add(Sphere::new(MARKER_BASE_RADIUS).mesh().ico(3).unwrap());
    for marker in &overlay.markers {
        let scale = marker.size.unwrap_or(1.0);
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(latlng_to_local(
                marker.lat,
                marker.lng,
                EARTH_RADIUS + 1.0,
            ))
            .with_scale(Vec3::splat(scale)),
            OverlayMarker {
                city: marker.city.clone(),
            },
            ChildOf(earth),
            Name::new(format!("Marker: {}", marker.city)),
        ));
    }

    overlay.attached = true;
    info!(
        "globe overlays attached: {} routes, {} markers",
        overlay.routes.len(),
        overlay.markers.len()
    );
}

/// Gizmo polylines for the route arcs, following the earth's world
/// transform so they rotate with the globe.
fn draw_route_arcs(
    overlay: Res<OverlayFeeds>,
    earths: Query<(&Body, &GlobalTransform)>,
    mut gizmos: Gizmos,
) {
    if !overlay.attached {
        return;
    }
    let Some((_, earth_transform)) = earths.iter().find(|(body, _)| **body == Body::Earth)
    else {
        return;
    };

    for route in &overlay.routes {
        let color = match route.status {
            Some(false) => ARC_DOWN_COLOR,
            _ => ARC_OK_COLOR,
        };
        let start = latlng_to_local(route.start_lat, route.start_lng, EARTH_RADIUS);
        let end = latlng_to_local(route.end_lat, route.end_lng, EARTH_RADIUS);
        let altitude = route.arc_alt.unwrap_or(DEFAULT_ARC_ALTITUDE);
        let points = sample_arc(start, end, EARTH_RADIUS, altitude, ARC_SEGMENTS);

        for pair in points.windows(2) {
            gizmos.line(
                earth_transform.transform_point(pair[0]),
                earth_transform.transform_point(pair[1]),
                color,
            );
        }
    }
}
