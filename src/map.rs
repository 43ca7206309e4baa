//! Outbound map surface.
//!
//! The core only notifies the surface; it never reads anything back.
//! [`GeoJsonSurface`] records the resulting map so the CLI and HTTP server
//! can hand it to a real renderer as a GeoJSON FeatureCollection.

use crate::geo::GeoPoint;
use serde::Serialize;
use serde_json::{json, Value};

/// Initial camera target: Santa Cruz de la Sierra.
pub const INITIAL_CAMERA: GeoPoint = GeoPoint::new(-17.7833, -63.1821);
pub const INITIAL_ZOOM: f32 = 8.0;
/// Zoom used when focusing a freshly added marker.
pub const MARKER_ZOOM: f32 = 8.5;
/// Zoom applied after drawing a polygon.
pub const POLYGON_ZOOM: f32 = 6.8;

/// Stroke and fill for a drawn polygon. Colours are ARGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolygonStyle {
    pub stroke_argb: u32,
    pub fill_argb: u32,
    pub stroke_width: f32,
}

impl Default for PolygonStyle {
    /// Opaque red outline, translucent red fill.
    fn default() -> Self {
        Self {
            stroke_argb: 0xFFFF_0000,
            fill_argb: 0x55FF_0000,
            stroke_width: 5.0,
        }
    }
}

impl PolygonStyle {
    /// `#RRGGBB` plus opacity in `0.0..=1.0`, for GeoJSON style properties.
    fn css(argb: u32) -> (String, f64) {
        let alpha = (argb >> 24) & 0xFF;
        (format!("#{:06X}", argb & 0x00FF_FFFF), alpha as f64 / 255.0)
    }
}

/// Rendering collaborator. Markers are keyed by province.
pub trait MapSurface: Send {
    fn place_marker(&mut self, key: &str, point: GeoPoint, title: &str);
    fn remove_marker(&mut self, key: &str);
    fn draw_polygon(&mut self, ring: &[GeoPoint], style: &PolygonStyle);
    fn remove_polygon(&mut self);
    fn move_camera(&mut self, target: GeoPoint, zoom: f32);
    fn zoom_to(&mut self, zoom: f32);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: String,
    pub point: GeoPoint,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub target: GeoPoint,
    pub zoom: f32,
}

/// In-memory surface that remembers what is on the map.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonSurface {
    markers: Vec<Marker>,
    polygon: Option<(Vec<GeoPoint>, PolygonStyle)>,
    camera: Option<Camera>,
}

impl GeoJsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn polygon(&self) -> Option<&[GeoPoint]> {
        self.polygon.as_ref().map(|(ring, _)| ring.as_slice())
    }

    pub fn camera(&self) -> Option<Camera> {
        self.camera
    }

    /// Markers as Point features, then the polygon (if any) as a Polygon feature.
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": m.point.to_position() },
                    "properties": { "province": m.key, "title": m.title },
                })
            })
            .collect();

        if let Some((ring, style)) = &self.polygon {
            let mut closed: Vec<[f64; 2]> = ring.iter().map(|p| p.to_position()).collect();
            if let Some(first) = closed.first().copied() {
                closed.push(first);
            }
            let (stroke, stroke_opacity) = PolygonStyle::css(style.stroke_argb);
            let (fill, fill_opacity) = PolygonStyle::css(style.fill_argb);
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [closed] },
                "properties": {
                    "stroke": stroke,
                    "stroke-opacity": stroke_opacity,
                    "stroke-width": style.stroke_width,
                    "fill": fill,
                    "fill-opacity": fill_opacity,
                },
            }));
        }

        let mut collection = json!({ "type": "FeatureCollection", "features": features });
        if let Some(camera) = self.camera {
            collection["camera"] = json!({
                "center": camera.target.to_position(),
                "zoom": camera.zoom,
            });
        }
        collection
    }
}

impl MapSurface for GeoJsonSurface {
    fn place_marker(&mut self, key: &str, point: GeoPoint, title: &str) {
        self.markers.retain(|m| m.key != key);
        self.markers.push(Marker {
            key: key.to_string(),
            point,
            title: title.to_string(),
        });
    }

    fn remove_marker(&mut self, key: &str) {
        self.markers.retain(|m| m.key != key);
    }

    fn draw_polygon(&mut self, ring: &[GeoPoint], style: &PolygonStyle) {
        self.polygon = Some((ring.to_vec(), *style));
    }

    fn remove_polygon(&mut self) {
        self.polygon = None;
    }

    fn move_camera(&mut self, target: GeoPoint, zoom: f32) {
        self.camera = Some(Camera { target, zoom });
    }

    fn zoom_to(&mut self, zoom: f32) {
        let target = self.camera.map_or(INITIAL_CAMERA, |c| c.target);
        self.camera = Some(Camera { target, zoom });
    }
}
