//! Shared HTTP response helpers

use axum::{
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Methods advertised in the `allow` header
pub const ALLOWED_METHODS: &str = "OPTIONS, GET, PURGE, HEAD";

/// Header set attached to every successful response
pub fn standard_headers(content_type: &'static str) -> [(HeaderName, &'static str); 4] {
    [
        (header::CONTENT_TYPE, content_type),
        (header::CACHE_CONTROL, "max-age=3600"),
        (header::ALLOW, ALLOWED_METHODS),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    ]
}

/// `302 Found` with an empty body
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `307 Temporary Redirect` with an empty body
pub fn temporary_redirect(location: &str) -> Response {
    (
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
