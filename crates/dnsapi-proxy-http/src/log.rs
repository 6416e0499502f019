//! Request logging middleware

use crate::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::time::Instant;

/// Headers whose values never reach the log
const REDACTED_HEADERS: [&str; 2] = ["authorization", "x-api-key"];

/// Log one line per exchange; with `debug` also the request headers
pub(crate) async fn log_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    if state.debug {
        tracing::debug!(
            peer = %peer,
            headers = ?redacted(request.headers()),
            "{} {}",
            method,
            uri
        );
    }

    let response = next.run(request).await;

    tracing::info!(
        peer = %peer,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "{} {}",
        method,
        uri
    );

    response
}

fn redacted(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if REDACTED_HEADERS.contains(&name.as_str()) {
                "<REDACTED>".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), value)
        })
        .collect()
}
