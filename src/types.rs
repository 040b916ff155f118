// Error types shared by the HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("username is required")]
    MissingUsername,

    #[error("image is required")]
    MissingImage,

    #[error("Only image files are allowed!")]
    UnsupportedMediaType,

    #[error("File too large")]
    FileTooLarge,

    #[error("Unexpected field")]
    UnexpectedField,

    #[error("{0}")]
    Multipart(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("File store error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        // The body limit layer surfaces as 413 through the multipart stream
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::FileTooLarge
        } else {
            AppError::Multipart(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
