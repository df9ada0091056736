use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bacheca_core::ErrorResponse;

use crate::store::StoreError;

/// Errore di una singola richiesta: status HTTP + payload `{ "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Logs the storage failure and turns it into a 500 for this request only.
    pub fn storage(operation: &'static str, err: StoreError) -> Self {
        tracing::error!(operation, error = %err, "storage failure");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}
