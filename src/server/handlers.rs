use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::ProvinceInfo;
use crate::controller::Notice;
use crate::geo::GeoPoint;
use crate::session::SelectionError;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    kind: &'static str,
    code: u16,
}

pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "internal",
            message: msg.into(),
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(e: SelectionError) -> Self {
        let status = match e {
            SelectionError::UnknownProvince(_) => StatusCode::NOT_FOUND,
            SelectionError::DuplicateSelection(_) | SelectionError::SelectionExhausted => {
                StatusCode::CONFLICT
            }
            SelectionError::CapitalNotFound(_)
            | SelectionError::LocationUnresolvable { .. }
            | SelectionError::InsufficientPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.message,
            kind: self.kind,
            code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

fn log_request(route: &str, outcome: &str, start: Instant) {
    log::info!(
        "{} -> {} ({:.1}ms)",
        route,
        outcome,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

// ─── GET /api/catalog ────────────────────────────────────────────

pub async fn catalog(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProvinceInfo>>, ApiError> {
    let start = Instant::now();
    let entries = state.lock()?.session().catalog().entries();
    log_request("GET /api/catalog", &format!("{} provinces", entries.len()), start);
    Ok(Json(entries))
}

// ─── GET /api/selection ──────────────────────────────────────────

#[derive(Serialize)]
pub struct SelectionView {
    pub selected: Vec<String>,
    pub points: Vec<GeoPoint>,
    pub available: Vec<String>,
    pub exhausted: bool,
}

pub async fn selection(State(state): State<Arc<AppState>>) -> Result<Json<SelectionView>, ApiError> {
    let start = Instant::now();
    let view = {
        let controller = state.lock()?;
        let session = controller.session();
        SelectionView {
            selected: session.selected().to_vec(),
            points: session.points().to_vec(),
            available: session.available().to_vec(),
            exhausted: session.is_exhausted(),
        }
    };
    log_request(
        "GET /api/selection",
        &format!("{} selected, {} available", view.selected.len(), view.available.len()),
        start,
    );
    Ok(Json(view))
}

// ─── POST /api/selection ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddRequest {
    pub province: String,
}

/// Log label for an add; the name is user input, so it is escaped.
fn add_route(province: &str) -> String {
    format!("POST /api/selection province={:?}", province)
}

pub async fn add_province(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRequest>,
) -> Result<Json<Notice>, ApiError> {
    let start = Instant::now();
    let route = add_route(&req.province);

    // geocoding blocks; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let mut controller = state.lock()?;
        controller.add_selected(&req.province).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))?;

    match &result {
        Ok(notice) => log_request(&route, &notice.message(), start),
        Err(e) => log_request(&route, &e.message, start),
    }
    result.map(Json)
}

// ─── DELETE /api/selection ───────────────────────────────────────

pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<Notice>, ApiError> {
    let start = Instant::now();
    let notice = state.lock()?.reset_all();
    log_request("DELETE /api/selection", &notice.message(), start);
    Ok(Json(notice))
}

// ─── POST /api/polygon ───────────────────────────────────────────

pub async fn generate_polygon(State(state): State<Arc<AppState>>) -> Result<Json<Notice>, ApiError> {
    let start = Instant::now();
    let result = state.lock()?.generate_polygon();
    match &result {
        Ok(notice) => log_request("POST /api/polygon", &notice.message(), start),
        Err(e) => log_request("POST /api/polygon", &e.to_string(), start),
    }
    Ok(Json(result?))
}

// ─── GET /api/map ────────────────────────────────────────────────

pub async fn map(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();
    let geojson = state.lock()?.surface().to_geojson();
    let features = geojson["features"].as_array().map_or(0, Vec::len);
    log_request("GET /api/map", &format!("{} features", features), start);
    Ok(Json(geojson))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let e = ApiError::from(SelectionError::UnknownProvince("X".into()));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        let e = ApiError::from(SelectionError::SelectionExhausted);
        assert_eq!(e.status, StatusCode::CONFLICT);
        assert_eq!(e.kind, "selection_exhausted");
        let e = ApiError::from(SelectionError::InsufficientPoints { have: 2 });
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_add_route_escapes_control_characters() {
        let route = add_route("Warnes\n2026-10-19 INFO forged line\r");
        assert!(!route.contains('\n'));
        assert!(!route.contains('\r'));
        assert!(route.contains("\\n"));
        assert_eq!(add_route("Sara"), "POST /api/selection province=\"Sara\"");
    }
}
