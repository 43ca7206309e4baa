//! HTTP surface for a map front-end.

mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::controller::MapController;
use crate::map::GeoJsonSurface;

pub use state::AppState;

pub fn build_router(controller: MapController<GeoJsonSurface>) -> Router {
    let state = Arc::new(AppState::new(controller));

    Router::new()
        .route("/api/catalog", get(handlers::catalog))
        .route(
            "/api/selection",
            get(handlers::selection)
                .post(handlers::add_province)
                .delete(handlers::reset),
        )
        .route("/api/polygon", post(handlers::generate_polygon))
        .route("/api/map", get(handlers::map))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(
    host: &str,
    port: u16,
    controller: MapController<GeoJsonSurface>,
) -> std::io::Result<()> {
    let app = build_router(controller);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("province polygon server listening on http://{}", addr);

    axum::serve(listener, app).await
}
