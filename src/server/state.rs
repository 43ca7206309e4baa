use crate::controller::MapController;
use crate::map::GeoJsonSurface;
use std::sync::{Mutex, MutexGuard};

use super::handlers::ApiError;

/// One shared map. The mutex serialises every session mutation.
pub struct AppState {
    pub controller: Mutex<MapController<GeoJsonSurface>>,
}

impl AppState {
    pub fn new(controller: MapController<GeoJsonSurface>) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    pub(super) fn lock(&self) -> Result<MutexGuard<'_, MapController<GeoJsonSurface>>, ApiError> {
        self.controller.lock().map_err(|_| ApiError::internal("session state poisoned"))
    }
}
