//! Typed overlay feed records and the geometry helpers behind them.

use bevy::prelude::*;
use serde::Deserialize;
use std::f32::consts::PI;

/// One great-circle route drawn above the globe.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteArc {
    pub order: u32,
    pub start_lat: f32,
    pub start_lng: f32,
    pub end_lat: f32,
    pub end_lng: f32,
    /// Peak altitude as a fraction of the globe radius.
    #[serde(default)]
    pub arc_alt: Option<f32>,
    /// Route health; colors the arc.
    #[serde(default)]
    pub status: Option<bool>,
}

/// One labeled surface marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMarker {
    pub city: String,
    pub lat: f32,
    pub lng: f32,
    #[serde(default)]
    pub size: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RouteFeed {
    pub routes: Vec<RouteArc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkerFeed {
    pub markers: Vec<CityMarker>,
}

/// Geographic coordinates to a point on a sphere of the given radius, in the
/// globe's local frame.
pub fn latlng_to_local(lat_deg: f32, lng_deg: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lng_deg + 180.0).to_radians();
    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Sample a lifted arc between two surface points: normalized-lerp along the
/// chord, scaled back to the sphere and raised by `altitude · sin(πt)`.
pub fn sample_arc(
    start: Vec3,
    end: Vec3,
    radius: f32,
    altitude: f32,
    segments: usize,
) -> Vec<Vec3> {
    let a = start.normalize();
    let b = end.normalize();
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let dir = a.lerp(b, t).normalize_or(a);
        let lift = 1.0 + altitude * (PI * t).sin();
        points.push(dir * radius * lift);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_lands_on_sphere() {
        let radius = 100.0;
        for (lat, lng) in [(0.0, 0.0), (51.5, -0.13), (-33.9, 151.2), (90.0, 0.0)] {
            let p = latlng_to_local(lat, lng, radius);
            assert!((p.length() - radius).abs() < 1e-3, "({lat},{lng}) -> {p:?}");
        }
    }

    #[test]
    fn test_latlng_poles_and_equator() {
        let north = latlng_to_local(90.0, 0.0, 1.0);
        assert!((north - Vec3::Y).length() < 1e-6);

        let equator = latlng_to_local(0.0, 30.0, 1.0);
        assert!(equator.y.abs() < 1e-6);
    }

    #[test]
    fn test_sample_arc_pins_endpoints() {
        let radius = 100.0;
        let start = latlng_to_local(51.5, -0.13, radius);
        let end = latlng_to_local(40.7, -74.0, radius);
        let points = sample_arc(start, end, radius, 0.3, 24);

        assert_eq!(points.len(), 25);
        assert!((points[0] - start).length() < 1e-3);
        assert!((points[24] - end).length() < 1e-3);
    }

    #[test]
    fn test_sample_arc_lifts_midpoint() {
        let radius = 100.0;
        let start = latlng_to_local(10.0, 10.0, radius);
        let end = latlng_to_local(-10.0, 60.0, radius);
        let points = sample_arc(start, end, radius, 0.5, 16);

        let mid = points[8];
        assert!(mid.length() > radius * 1.3);
    }

    #[test]
    fn test_route_feed_parses_optional_fields() {
        let feed: RouteFeed = serde_json::from_str(
            r#"{"routes": [
                {"order": 1, "startLat": 1.0, "startLng": 2.0, "endLat": 3.0, "endLng": 4.0,
                 "arcAlt": 0.25, "status": true},
                {"order": 2, "startLat": 5.0, "startLng": 6.0, "endLat": 7.0, "endLng": 8.0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(feed.routes.len(), 2);
        assert_eq!(feed.routes[0].arc_alt, Some(0.25));
        assert_eq!(feed.routes[0].status, Some(true));
        assert_eq!(feed.routes[1].arc_alt, None);
        assert_eq!(feed.routes[1].status, None);
    }

    #[test]
    fn test_malformed_feed_is_an_error() {
        assert!(serde_json::from_str::<RouteFeed>("{\"routes\": [{}]}").is_err());
        assert!(serde_json::from_str::<MarkerFeed>("not json").is_err());
    }
}
