//! Handler-level error taxonomy.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::common::response::ApiError;
use crate::workers::transcoder::TranscodeError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", .0.body_text())]
    Upload(#[from] MultipartError),

    #[error("{}", .0.body_text())]
    NotMultipart(#[from] MultipartRejection),

    #[error("{0}")]
    Transcode(#[from] TranscodeError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upload(e) => e.status(),
            AppError::NotMultipart(e) => e.status(),
            AppError::Transcode(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("Request failed: {}", message);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), message);
        }

        ApiError(message, status).into_response()
    }
}
