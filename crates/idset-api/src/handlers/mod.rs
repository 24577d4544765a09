//! Request handlers organized by resource.

pub mod datasets;
pub mod health;

use axum::http::StatusCode;
use idset_core::Error;

/// Map a service error onto the response status the API reports for it.
pub(crate) fn error_response(err: Error) -> (StatusCode, String) {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_unconfigured() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string())
}
