use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::fortune::FortuneError;

/// Message returned for every generation failure. Provider output is never echoed.
pub const GENERATION_FAILED_MESSAGE: &str = "占いの生成に失敗しました。";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider failure, malformed response, or schema violation.
    #[error("Generation failed: {0}")]
    GenerationFailed(FortuneError),
}

impl From<FortuneError> for AppError {
    fn from(err: FortuneError) -> Self {
        match err {
            FortuneError::InvalidInput(msg) => AppError::InvalidInput(msg),
            other => AppError::GenerationFailed(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::GenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::GenerationFailed(e) => {
                tracing::error!(kind = e.kind(), "Fortune generation failed: {e}");
                GENERATION_FAILED_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
