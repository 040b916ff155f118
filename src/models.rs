use std::sync::Arc;

use crate::config::Config;
use crate::db::UserStore;
use crate::storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub files: FileStore,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, config: Config) -> Self {
        let files = FileStore::new(config.storage.uploads_dir.clone());
        Self { store, files, config }
    }
}

// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: uuid::Uuid,
    pub username: String,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// API Request/Response types

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub user: UserRecord,
    pub image_url: String,
}

/// One row of `GET /api/users`: the record fields plus its public URL.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListing {
    #[serde(flatten)]
    pub user: UserRecord,
    pub image_url: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
