use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;

/// Logga ogni richiesta (metodo, URL, indirizzo del client) e lo status della
/// risposta, e aggiorna i contatori HTTP.
pub async fn log_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(%method, %uri, %peer, "request");
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = response.status();
    tracing::info!(%method, %uri, status = status.as_u16(), elapsed_ms, "response");
    state
        .metrics
        .record_request(method.as_str(), &route, status.as_u16(), elapsed_ms);

    response
}
