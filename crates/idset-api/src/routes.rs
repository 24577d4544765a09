//! API route definitions.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{datasets, health};
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Create the main API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/datasets", dataset_routes())
}

fn dataset_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(datasets::list_datasets))
        .route("/refresh", post(datasets::refresh_datasets))
        .route("/{id}", get(datasets::execute_dataset))
}
