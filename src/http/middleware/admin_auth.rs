use crate::domain::payment::PaymentError;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const INTERNAL_API_KEY_HEADER: &str = "X-Internal-Api-Key";

/// Guards operator routes. An empty configured key locks them entirely.
pub async fn require_internal_api_key(
    State(expected): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(INTERNAL_API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if expected.is_empty() || provided != expected {
        tracing::warn!(path = %request.uri().path(), "rejected internal api call");
        return PaymentError::Unauthorized.into_response();
    }

    next.run(request).await
}
