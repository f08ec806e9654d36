//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code, and latency.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Paths polled by the overlay every second; logged at debug only.
const QUIET_PATHS: [&str; 2] = ["/stats", "/stats/"];

/// Logs method, path, status and latency for each request.
///
/// Game pushes arrive several times a second, so successful POSTs are logged
/// at debug as well.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let quiet = QUIET_PATHS.contains(&path.as_str()) || method == axum::http::Method::POST;

    let start = Instant::now();
    let response = next.run(request).await;
    let latency = start.elapsed();
    let status = response.status().as_u16();

    if status >= 500 {
        warn!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency.as_millis(),
            "Request failed (5xx)"
        );
    } else if quiet {
        debug!(
            method = %method,
            path = %path,
            status = status,
            latency_us = latency.as_micros(),
            "Request completed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency.as_millis(),
            "Request completed"
        );
    }

    response
}
