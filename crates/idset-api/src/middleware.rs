//! HTTP middleware for the API server.

use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Response header carrying the unsliced row count of a table.
pub const X_TOTAL_COUNT: &str = "x-total-count";

/// Response header carrying the CRC32 (IEEE) of the response body, in decimal.
pub const X_BODY_HASH: &str = "x-cabinets-hash";

/// Create CORS middleware layer.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([
            HeaderName::from_static(X_TOTAL_COUNT),
            HeaderName::from_static(X_BODY_HASH),
        ])
        .allow_origin(Any)
}
