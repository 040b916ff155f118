//! Static File Serving
//!
//! - `/` serves the upload form, embedded in the binary
//! - `/uploads/*` serves stored images straight from the file store

use std::path::Path;

use axum::{response::Html, routing::get, Router};
use tower_http::services::ServeDir;

use crate::routes::origin::UPLOADS_PREFIX;

const UPLOAD_FORM_HTML: &str = include_str!("../../assets/index.html");

/// Create router for the form page and uploaded files
pub fn router(uploads_dir: &Path) -> Router {
    Router::new()
        .route("/", get(serve_form))
        .nest_service(UPLOADS_PREFIX, ServeDir::new(uploads_dir))
}

async fn serve_form() -> Html<&'static str> {
    Html(UPLOAD_FORM_HTML)
}
