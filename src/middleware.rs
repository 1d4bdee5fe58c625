//! Request ID middleware for correlating logs with requests.
//!
//! Every request runs inside a `request` span carrying a request ID, so probe
//! failures logged by `/health/db` can be traced back to the orchestrator call
//! that triggered them. An `x-request-id` set by an upstream load balancer is
//! reused; otherwise a UUID v4 is generated. The ID is echoed back in the
//! response header.

use std::time::Instant;

use axum::{
    extract::Request,
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID in both directions
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream request ID accepted verbatim
const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse a well-formed upstream request ID or mint a new one.
fn request_id_for(request: &Request) -> HeaderValue {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|value| {
            let len = value.as_bytes().len();
            len > 0 && len <= MAX_REQUEST_ID_LEN && value.to_str().is_ok()
        })
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Middleware that assigns a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = request_id_for(&request);
    let span = tracing::info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or_default(),
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
        response
    }
    .instrument(span)
    .await
}
