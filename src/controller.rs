//! Inbound actions from the UI, wired to the session and the map surface.

use crate::geo::GeoPoint;
use crate::map::{MapSurface, PolygonStyle, INITIAL_CAMERA, INITIAL_ZOOM, MARKER_ZOOM, POLYGON_ZOOM};
use crate::session::{Selection, SelectionError, SelectionSession};
use serde::Serialize;

/// What a successful action did. Failures come back as [`SelectionError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    Added {
        #[serde(flatten)]
        selection: Selection,
        /// No provinces left; the caller may disable further additions.
        all_added: bool,
    },
    PolygonDrawn { vertices: Vec<GeoPoint> },
    ResetConfirmed { available: usize },
}

impl Notice {
    /// Short advisory text for a toast or status line.
    pub fn message(&self) -> String {
        match self {
            Self::Added { selection, all_added } => {
                let mut msg = format!("Added {} ({})", selection.capital, selection.province);
                if *all_added {
                    msg.push_str(". All available provinces have been added");
                }
                msg
            }
            Self::PolygonDrawn { vertices } => format!("Polygon drawn with {} vertices", vertices.len()),
            Self::ResetConfirmed { .. } => "Cleared. Provinces restored".to_string(),
        }
    }
}

/// One user's map: a selection session plus the surface it draws on.
pub struct MapController<S: MapSurface> {
    session: SelectionSession,
    surface: S,
    style: PolygonStyle,
    has_polygon: bool,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(session: SelectionSession, surface: S) -> Self {
        Self {
            session,
            surface,
            style: PolygonStyle::default(),
            has_polygon: false,
        }
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Point the camera at the region once the map is up.
    pub fn on_map_ready(&mut self) {
        self.surface.move_camera(INITIAL_CAMERA, INITIAL_ZOOM);
    }

    pub fn add_selected(&mut self, province: &str) -> Result<Notice, SelectionError> {
        let selection = self.session.add(province)?;
        let title = format!("{} ({})", selection.capital, selection.province);
        self.surface.place_marker(&selection.province, selection.point, &title);
        self.surface.move_camera(selection.point, MARKER_ZOOM);
        let all_added = selection.all_added();
        Ok(Notice::Added { selection, all_added })
    }

    /// Replace the current polygon with one through every selected point.
    pub fn generate_polygon(&mut self) -> Result<Notice, SelectionError> {
        let polygon = self.session.polygon()?;
        if self.has_polygon {
            self.surface.remove_polygon();
        }
        self.surface.draw_polygon(polygon.vertices(), &self.style);
        self.has_polygon = true;
        self.surface.zoom_to(POLYGON_ZOOM);
        Ok(Notice::PolygonDrawn {
            vertices: polygon.vertices().to_vec(),
        })
    }

    /// Remove polygon and markers, then restore every province.
    pub fn reset_all(&mut self) -> Notice {
        if self.has_polygon {
            self.surface.remove_polygon();
            self.has_polygon = false;
        }
        for province in self.session.selected() {
            self.surface.remove_marker(province);
        }
        self.session.reset();
        Notice::ResetConfirmed {
            available: self.session.available().len(),
        }
    }
}
