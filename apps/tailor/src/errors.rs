use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::GatewayError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation configuration error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Gateway(e) => {
                tracing::error!("Generation configuration error: {e}");
                (StatusCode::BAD_REQUEST, "GENERATION_CONFIG_ERROR", e.to_string())
            }
            AppError::Store(StoreError::InvalidJobId(id)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Invalid job identifier: '{id}'"),
            ),
            AppError::Store(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_ERROR",
                    e.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
