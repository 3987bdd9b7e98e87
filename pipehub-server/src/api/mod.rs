//! API Module
//!
//! HTTP API layer for the registry.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod pipe;
pub mod version;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::storage::ArchiveStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub store: ArchiveStore,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let files = ServeDir::new(state.store.root());

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Pipe endpoints
        .route(
            "/pipes",
            get(pipe::list_pipes).post(pipe::register_version),
        )
        .route(
            "/pipes/{id}",
            get(pipe::get_pipe)
                .put(pipe::update_pipe)
                .delete(pipe::delete_pipe),
        )
        // The {id} segment is read as the pipe name by the download and
        // version-listing handlers; one param name keeps the routes from
        // conflicting in the router.
        .route("/pipes/{id}/download", get(pipe::download_latest))
        .route("/pipes/{id}/download/{version}", get(pipe::download_version))
        .route("/pipes/{id}/versions", get(pipe::list_pipe_versions))
        .route(
            "/pipes/{id}/versions/latest",
            get(pipe::latest_pipe_version),
        )
        // Version endpoints
        .route(
            "/versions",
            get(version::list_versions).post(version::create_version),
        )
        .route(
            "/versions/{id}",
            get(version::get_version)
                .put(version::update_version)
                .delete(version::delete_version),
        )
        .route(
            "/versions/{id}/env-schema/{version}",
            get(version::env_schema),
        )
        // Stored archives, served statically
        .nest_service("/files", files)
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
