use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Domain(e) if e.is_unknown_type() => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::ThresholdNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        debug!(status = %status, error = %self, "Request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
