use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Extension, Path};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use bacheca_core::{
    EditRequest, EditResponse, HealthResponse, ListMessagesResponse, StatusResponse,
    SubmitRequest, SubmitResponse,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::metrics::{self, MessageOp};
use crate::views::render_index;
use crate::AppState;

/// Handler per GET /
pub async fn index(Extension(state): Extension<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let messages = state
        .store
        .list_messages()
        .await
        .map_err(|e| ApiError::storage("list", e))?;
    Ok(Html(render_index(&messages)))
}

/// Handler per GET /api/messages
pub async fn list_messages(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
    let messages = state
        .store
        .list_messages()
        .await
        .map_err(|e| ApiError::storage("list", e))?;
    Ok(Json(ListMessagesResponse { messages }))
}

/// Handler per POST /submit
pub async fn submit(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<SubmitRequest>, FormRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    // a body that is not a form counts as a missing field
    let req = form.map(|Form(req)| req).unwrap_or_default();
    let text = req.text().ok_or_else(|| ApiError::bad_request("Message required"))?;

    let id = state
        .store
        .insert_message(text)
        .await
        .map_err(|e| ApiError::storage("insert", e))?;
    state.metrics.record_message(MessageOp::Created);
    tracing::debug!(id, "message created");

    Ok(Json(SubmitResponse { message: text.to_string(), id }))
}

// Un id non numerico risponde con lo stesso payload JSON degli altri errori
fn message_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))
}

/// Handler per POST /delete/:id
pub async fn delete(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = message_id(id)?;
    let affected = state
        .store
        .delete_message(id)
        .await
        .map_err(|e| ApiError::storage("delete", e))?;
    if affected == 0 {
        tracing::debug!(id, "delete matched no message");
    } else {
        state.metrics.record_message(MessageOp::Deleted);
    }
    Ok(Json(StatusResponse::deleted()))
}

/// Handler per POST /edit/:id
pub async fn edit(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    form: Result<Form<EditRequest>, FormRejection>,
) -> Result<Json<EditResponse>, ApiError> {
    let id = message_id(id)?;
    let req = form.map(|Form(req)| req).unwrap_or_default();
    let text = req.text().ok_or_else(|| ApiError::bad_request("New message required"))?;

    let affected = state
        .store
        .update_message(id, text)
        .await
        .map_err(|e| ApiError::storage("update", e))?;
    if affected == 0 {
        tracing::debug!(id, "edit matched no message");
    } else {
        state.metrics.record_message(MessageOp::Updated);
    }
    Ok(Json(EditResponse::updated(text)))
}

/// Handler per GET /health: probe fresco, indipendente da quello di avvio.
pub async fn health(
    Extension(state): Extension<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    health_with_store(&state).await
}

pub async fn health_with_store(state: &AppState) -> (StatusCode, Json<HealthResponse>) {
    match state.store.probe().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            tracing::warn!(error = %e, "health probe failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(HealthResponse::unhealthy(e.to_string())))
        }
    }
}

/// Handler per GET /metrics
pub async fn metrics(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, metrics::CONTENT_TYPE)],
        state.metrics.render(),
    )
}
