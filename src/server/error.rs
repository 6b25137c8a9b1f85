use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Handler error mapped to a JSON HTTP response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// Request body missing, not JSON, or missing required fields.
    #[error("invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidBody(rejection) => rejection.status(),
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
