//! Caching gateway
//!
//! Sits in front of the router: serves `robots.txt`, answers HEAD, OPTIONS
//! and PURGE itself, and replays cached GET responses keyed by URL and
//! client family.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

use crate::{
    cache::CachedResponse,
    classify::ClientFamily,
    error::format_error,
    server::app::AppState,
    utils::http::{ALLOWED_METHODS, HTML_CONTENT_TYPE, TEXT_CONTENT_TYPE, standard_headers},
};

/// Cache key for a request: host, path and query, plus the family suffix
pub fn cache_key(request: &Request, family: ClientFamily) -> String {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("{}{}{}", host, path_and_query, family.cache_suffix())
}

/// Method dispatch and response caching around the router
pub async fn cache_gateway(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let family = ClientFamily::from_user_agent(user_agent);
    let key = cache_key(&request, family);

    if request.uri().path() == "/robots.txt" {
        return (
            StatusCode::OK,
            standard_headers(TEXT_CONTENT_TYPE),
            state.settings.server.robots_txt.clone(),
        )
            .into_response();
    }

    match request.method().as_str() {
        "GET" => {
            if let Some(hit) = state.cache.get(&key).await {
                debug!("Cache hit for {}", key);
                return hit.into_response();
            }
            debug!("Cache miss for {}", key);

            let response = next.run(request).await;
            if response.status() != StatusCode::OK {
                return response;
            }

            let buffered = match CachedResponse::from_response(response).await {
                Ok(buffered) => buffered,
                Err(e) => {
                    error!("Failed to buffer response for {}: {}", key, format_error(&e));
                    return (StatusCode::INTERNAL_SERVER_ERROR, format_error(&e)).into_response();
                }
            };

            if buffered.len() <= state.settings.cache.max_entry_bytes {
                let cache = state.cache.clone();
                let entry = buffered.clone();
                state.tasks.spawn(async move {
                    cache.put(key, entry).await;
                });
            } else {
                debug!("Not caching {} byte response for {}", buffered.len(), key);
            }

            buffered.into_response()
        }
        "PURGE" => {
            let removed = state.cache.delete(&key).await;
            info!("Purged {} (present: {})", key, removed);
            StatusCode::OK.into_response()
        }
        "HEAD" => (StatusCode::OK, standard_headers(HTML_CONTENT_TYPE)).into_response(),
        "OPTIONS" => (StatusCode::NO_CONTENT, [(header::ALLOW, ALLOWED_METHODS)]).into_response(),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
