use axum::{middleware, routing::{get, post}, Router, Extension};
use std::sync::Arc;

use crate::controllers;
use crate::middleware::log_requests;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(controllers::index))
        .route("/api/messages", get(controllers::list_messages))
        .route("/submit", post(controllers::submit))
        .route("/delete/:id", post(controllers::delete))
        .route("/edit/:id", post(controllers::edit))
        .route("/health", get(controllers::health))
        .route("/metrics", get(controllers::metrics))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .layer(Extension(state))
}
