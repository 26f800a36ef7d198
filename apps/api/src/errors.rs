use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::provider::ProviderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Provider(err) => {
                tracing::error!("Provider error: {err}");
                match err {
                    ProviderError::Auth(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "PROVIDER_AUTH_ERROR",
                        "Provider authentication failed".to_string(),
                    ),
                    ProviderError::Unavailable(_) => (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_UNAVAILABLE",
                        "The model provider is unavailable".to_string(),
                    ),
                    ProviderError::SchemaConformance(_) | ProviderError::EmptyContent => (
                        StatusCode::BAD_GATEWAY,
                        "SCHEMA_CONFORMANCE",
                        "The model provider returned output that does not match the declared schema"
                            .to_string(),
                    ),
                    ProviderError::Api { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "PROVIDER_ERROR",
                        "The model provider rejected the request".to_string(),
                    ),
                }
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
