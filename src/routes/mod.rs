//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/upload` - Username + image upload
//! - `/api/users` - Uploaded records, newest first
//! - `/api/health` - Health checks
//! - `/uploads/*` - Stored images
//! - `/` - Upload form

pub mod health;
pub mod origin;
pub mod static_files;
pub mod upload;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let api_router = Router::new()
        .merge(upload::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(health::router(state.clone()));

    let app = Router::new()
        .merge(api_router)
        .merge(static_files::router(state.files.root()));

    // Any origin, method and header
    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
