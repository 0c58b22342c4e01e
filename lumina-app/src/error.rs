use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lumina_common::LuminaError;
use serde_json::json;

/// What the HTTP layer can say about a failed request. Provider failures
/// never reach this type: handlers fold them into degraded payloads, so
/// anything here is either bad input or a genuine server fault.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<LuminaError> for ApiError {
    fn from(err: LuminaError) -> Self {
        match err {
            LuminaError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(anyhow::anyhow!(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(err) => {
                tracing::error!(target: "app", error = %err, "request.internal_error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = Json(json!({ "status": "error", "error": message }));
        (code, body).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Validation(format!("Invalid multipart payload: {}", err))
    }
}
