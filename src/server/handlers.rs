//! HTTP request handlers
//!
//! Status embeds, the oEmbed document, profile redirects and the catch-all.

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use regex::Regex;
use tracing::{debug, error};

use crate::{
    classify::{is_bot, is_direct_media_request},
    error::{format_error, format_error_for_logging},
    server::app::AppState,
    status::{StatusOutcome, StatusRequest},
    types::{Flags, OEmbedResponse, StatusParams},
    utils::http::{
        HTML_CONTENT_TYPE, JSON_CONTENT_TYPE, found, standard_headers, temporary_redirect,
    },
};

static HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-z0-9_]{1,15}").expect("static regex"));

const OEMBED_DEFAULT_TEXT: &str = "Twitter";
const OEMBED_DEFAULT_AUTHOR: &str = "dangeredwolf";
const OEMBED_DEFAULT_STATUS: &str = "1547514042146865153";

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host())
}

/// Status embed
///
/// GET /{handle}/status/{id}[/photo|video/{media_number}]
pub async fn status(
    State(state): State<AppState>,
    Path(params): Path<StatusParams>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    status_request(state, params, &headers, &uri, Flags::default()).await
}

/// Status embed that always prefers the media asset
///
/// GET /dl/... and /dir/...
pub async fn direct_status(
    State(state): State<AppState>,
    Path(params): Path<StatusParams>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    status_request(state, params, &headers, &uri, Flags::direct()).await
}

async fn status_request(
    state: AppState,
    params: StatusParams,
    headers: &HeaderMap,
    uri: &Uri,
    mut flags: Flags,
) -> Response {
    let links = &state.settings.links;
    let user_agent = user_agent(headers);
    let bot = is_bot(user_agent);
    // Path captures arrive percent-decoded
    let canonical = format!(
        "{}/{}/status/{}",
        links.twitter_root,
        urlencoding::encode(&params.handle),
        urlencoding::encode(&params.id)
    );

    if is_direct_media_request(
        uri.path(),
        request_host(headers, uri),
        &links.direct_media_domains,
    ) {
        debug!("Direct media request for {}", uri.path());
        flags.direct = true;
    }

    if !bot && !flags.direct {
        debug!("Matched human UA, redirecting to {}", canonical);
        return found(&canonical);
    }

    let request = StatusRequest {
        id: params.status_id(),
        media_number: params.media_number(),
        user_agent: user_agent.to_string(),
        flags,
    };

    match state.lookup.lookup_status(&request).await {
        Ok(StatusOutcome::Response(response)) => response,
        // A person on a direct link whose status has no such media
        Ok(StatusOutcome::Html(_)) if !bot => found(&canonical),
        Ok(StatusOutcome::Html(page)) => {
            (StatusCode::OK, standard_headers(HTML_CONTENT_TYPE), page).into_response()
        }
        Err(e) => {
            error!(
                details = %format_error_for_logging(&e),
                "Status lookup for {:?} failed",
                request.id
            );
            (StatusCode::BAD_GATEWAY, format_error(&e)).into_response()
        }
    }
}

/// Decode a query value a second time, keeping it as-is when that fails.
fn decode_query_value(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn query_or<'a>(query: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    query
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// oEmbed provider document
///
/// GET /owoembed?text=..&author=..&status=..
pub async fn oembed(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let links = &state.settings.links;
    let text = query_or(&query, "text", OEMBED_DEFAULT_TEXT);
    let author = query_or(&query, "author", OEMBED_DEFAULT_AUTHOR);
    let status = query_or(&query, "status", OEMBED_DEFAULT_STATUS);

    let doc = OEmbedResponse::link(
        decode_query_value(text),
        format!(
            "{}/{}/status/{}",
            links.twitter_root,
            urlencoding::encode(author),
            urlencoding::encode(status)
        ),
        links.provider_name.as_str(),
        links.redirect_url.as_str(),
        links.default_author_text.as_str(),
    );

    (
        StatusCode::OK,
        standard_headers(JSON_CONTENT_TYPE),
        Json(doc),
    )
        .into_response()
}

/// Whether the leftmost handle-shaped run covers the whole string
pub fn is_valid_handle(handle: &str) -> bool {
    HANDLE
        .find(handle)
        .is_some_and(|m| m.as_str() == handle)
}

/// Profile redirect
///
/// GET /{handle} and /{handle}/
pub async fn profile(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    uri: Uri,
) -> Response {
    let links = &state.settings.links;
    if is_valid_handle(&handle) {
        found(&format!("{}{}", links.twitter_root, uri.path()))
    } else {
        debug!("Rejecting malformed handle {:?}", handle);
        found(&links.redirect_url)
    }
}

/// Everything no other route matched
pub async fn catch_all(State(state): State<AppState>) -> Response {
    temporary_redirect(&state.settings.links.redirect_url)
}
