// User Images - store a username together with an uploaded image

pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use db::{MemoryUserStore, PgUserStore, UserStore};
pub use models::{AppState, UploadResponse, UserListing, UserRecord};
pub use storage::FileStore;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
