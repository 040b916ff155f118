//! `POST /api/upload`
//!
//! Multipart form with a `username` text field and an `image` file field.
//! The image is streamed to the file store while the body is parsed, then
//! the form is validated and a record is written. The file always lands on
//! disk before its record exists.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::models::{AppState, UploadResponse};
use crate::routes::origin::RequestOrigin;
use crate::storage::{storage_filename, FileStore};
use crate::types::{AppError, AppResult};

pub const USERNAME_FIELD: &str = "username";
pub const IMAGE_FIELD: &str = "image";

/// Room for multipart boundaries, part headers and the username field on
/// top of the file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.storage.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/api/upload", post(upload_user_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[derive(Debug, Default)]
struct UploadForm {
    username: Option<String>,
    image: Option<StagedImage>,
}

/// An image already written to the file store but not yet referenced by a record.
#[derive(Debug)]
struct StagedImage {
    filename: String,
    original_name: String,
    size: u64,
}

async fn upload_user_image(
    State(state): State<AppState>,
    origin: RequestOrigin,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut form = UploadForm::default();

    if let Err(err) = read_upload_form(
        &state.files,
        state.config.storage.max_upload_bytes,
        &mut multipart,
        &mut form,
    )
    .await
    {
        if let Some(staged) = form.image.take() {
            discard(&state.files, &staged).await;
        }
        drain(&mut multipart).await;
        warn!(error = %err, "Rejected upload");
        return Err(err);
    }

    let username = match form.username.filter(|name| !name.is_empty()) {
        Some(username) => username,
        None => {
            if let Some(staged) = &form.image {
                state.files.remove(&staged.filename).await?;
            }
            warn!("Rejected upload without username");
            return Err(AppError::MissingUsername);
        }
    };

    let Some(image) = form.image else {
        warn!(username = %username, "Rejected upload without image");
        return Err(AppError::MissingImage);
    };

    let user = state.store.create_user(&username, &image.filename).await?;
    let image_url = origin.image_url(&image.filename);

    info!(
        user_id = %user.id,
        username = %user.username,
        original = %image.original_name,
        stored = %image.filename,
        bytes = image.size,
        "Stored user image"
    );

    Ok(Json(UploadResponse { user, image_url }))
}

/// Walk the multipart stream, keeping the username and streaming the image to disk.
///
/// `form.image` is set as soon as a file is created so the caller can clean it
/// up if anything later in the stream fails.
async fn read_upload_form(
    files: &FileStore,
    max_bytes: u64,
    multipart: &mut Multipart,
    form: &mut UploadForm,
) -> AppResult<()> {
    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        // An empty file input arrives as `filename=""`; it carries no file
        if field.file_name().is_some_and(str::is_empty) {
            while field.chunk().await?.is_some() {}
            continue;
        }

        // Parts without a filename are plain text fields
        let Some(original_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await?;
            if name == USERNAME_FIELD {
                form.username = Some(value);
            }
            continue;
        };

        if name != IMAGE_FIELD || form.image.is_some() {
            return Err(AppError::UnexpectedField);
        }
        if !is_image(field.content_type()) {
            return Err(AppError::UnsupportedMediaType);
        }

        let filename = storage_filename(&original_name, Utc::now(), &mut rand::thread_rng());
        form.image = Some(StagedImage {
            filename: filename.clone(),
            original_name,
            size: 0,
        });

        let mut file = files.create(&filename).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            written += chunk.len() as u64;
            if written > max_bytes {
                return Err(AppError::FileTooLarge);
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if let Some(staged) = form.image.as_mut() {
            staged.size = written;
        }
    }

    Ok(())
}

fn is_image(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|media_type| media_type.type_() == mime::IMAGE)
}

async fn discard(files: &FileStore, staged: &StagedImage) {
    if let Err(e) = files.remove(&staged.filename).await {
        warn!(filename = %staged.filename, error = %e, "Failed to remove rejected upload");
    }
}

/// Read whatever is left of a rejected body so the client sees the error
/// response instead of a reset connection.
async fn drain(multipart: &mut Multipart) {
    while let Ok(Some(mut field)) = multipart.next_field().await {
        while let Ok(Some(_)) = field.chunk().await {}
    }
}
