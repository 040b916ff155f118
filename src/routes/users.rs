use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::models::{AppState, UserListing};
use crate::routes::origin::RequestOrigin;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(list_users))
        .with_state(state)
}

/// GET /api/users - every record, newest first, with its image URL
async fn list_users(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> AppResult<Json<Vec<UserListing>>> {
    let users = state.store.list_users().await?;
    debug!(count = users.len(), "Listing users");

    let listings = users
        .into_iter()
        .map(|user| {
            let image_url = user
                .image
                .as_deref()
                .filter(|image| !image.is_empty())
                .map(|image| origin.image_url(image));
            UserListing { user, image_url }
        })
        .collect();

    Ok(Json(listings))
}
