//! HTTP adapter for the upstream status service
//!
//! Fetches `GET {base_url}/status/{id}` and turns the JSON document into
//! either a redirect to the selected media or a rendered status page.

use std::time::Duration;

use async_trait::async_trait;
use axum::response::IntoResponse;
use reqwest::Client;
use tracing::debug;

use super::{StatusLookup, StatusOutcome, StatusRequest};
use crate::{
    Result,
    config::settings::{LinkSettings, UpstreamSettings},
    render::render_status_page,
    types::Status,
    utils::http::found,
};

/// Status lookup backed by a JSON status API
#[derive(Debug, Clone)]
pub struct UpstreamStatusLookup {
    client: Client,
    base_url: String,
    links: LinkSettings,
}

impl UpstreamStatusLookup {
    pub fn new(upstream: &UpstreamSettings, links: LinkSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&upstream.user_agent)
            .connect_timeout(Duration::from_secs(upstream.connect_timeout))
            .timeout(Duration::from_secs(upstream.request_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            links,
        })
    }

    async fn fetch(&self, id: &str) -> Result<std::result::Result<Status, reqwest::Response>> {
        let url = format!("{}/status/{}", self.base_url, id);
        debug!("Fetching status from {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(Err(response));
        }
        Ok(Ok(response.json::<Status>().await?))
    }
}

#[async_trait]
impl StatusLookup for UpstreamStatusLookup {
    async fn lookup_status(&self, request: &StatusRequest) -> Result<StatusOutcome> {
        let Some(id) = request.id.as_deref() else {
            return Ok(StatusOutcome::Response(found(&self.links.redirect_url)));
        };

        let status = match self.fetch(id).await? {
            Ok(status) => status,
            Err(response) => {
                let code = response.status();
                debug!("Upstream answered {} for status {}", code, id);
                let body = response.bytes().await?;
                return Ok(StatusOutcome::Response((code, body).into_response()));
            }
        };

        if request.flags.direct
            && let Some(media) = status.media_at(request.media_number)
        {
            debug!("Redirecting to media {} of status {}", request.media_number, id);
            return Ok(StatusOutcome::Response(found(&media.url)));
        }

        Ok(StatusOutcome::Html(render_status_page(
            &status,
            request.media_number,
            &request.user_agent,
            &self.links,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Flags;
    use axum::http::{StatusCode, header};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lookup(server: &MockServer) -> UpstreamStatusLookup {
        let upstream = UpstreamSettings {
            base_url: server.uri(),
            ..UpstreamSettings::default()
        };
        UpstreamStatusLookup::new(&upstream, LinkSettings::default()).unwrap()
    }

    fn request(id: Option<&str>, flags: Flags) -> StatusRequest {
        StatusRequest {
            id: id.map(str::to_string),
            media_number: 1,
            user_agent: "Twitterbot/1.0".to_string(),
            flags,
        }
    }

    fn status_json() -> serde_json::Value {
        json!({
            "id": "1234567890",
            "text": "look at this",
            "author": {"name": "Alice", "screen_name": "alice"},
            "media": [{"type": "photo", "url": "https://pbs.example/a.jpg"}]
        })
    }

    #[tokio::test]
    async fn test_renders_page_for_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/1234567890"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_json()))
            .mount(&server)
            .await;

        let outcome = lookup(&server)
            .lookup_status(&request(Some("1234567890"), Flags::default()))
            .await
            .unwrap();

        match outcome {
            StatusOutcome::Html(page) => {
                assert!(page.contains(r#"content="Alice (@alice)""#));
                assert!(page.contains("https://pbs.example/a.jpg"));
            }
            StatusOutcome::Response(r) => panic!("expected page, got {}", r.status()),
        }
    }

    #[tokio::test]
    async fn test_direct_request_redirects_to_media() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/1234567890"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_json()))
            .mount(&server)
            .await;

        let outcome = lookup(&server)
            .lookup_status(&request(Some("1234567890"), Flags::direct()))
            .await
            .unwrap();

        match outcome {
            StatusOutcome::Response(response) => {
                assert_eq!(response.status(), StatusCode::FOUND);
                assert_eq!(response.headers()[header::LOCATION], "https://pbs.example/a.jpg");
            }
            StatusOutcome::Html(_) => panic!("expected redirect"),
        }
    }

    #[tokio::test]
    async fn test_direct_request_without_media_renders_page() {
        let server = MockServer::start().await;
        let mut body = status_json();
        body["media"] = json!([]);
        Mock::given(method("GET"))
            .and(path("/status/1234567890"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let outcome = lookup(&server)
            .lookup_status(&request(Some("1234567890"), Flags::direct()))
            .await
            .unwrap();

        assert!(matches!(outcome, StatusOutcome::Html(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/404404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such status"))
            .mount(&server)
            .await;

        let outcome = lookup(&server)
            .lookup_status(&request(Some("404404"), Flags::default()))
            .await
            .unwrap();

        match outcome {
            StatusOutcome::Response(response) => {
                assert_eq!(response.status(), StatusCode::NOT_FOUND);
                let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
                assert_eq!(&body[..], b"no such status");
            }
            StatusOutcome::Html(_) => panic!("expected passthrough"),
        }
    }

    #[tokio::test]
    async fn test_missing_id_redirects_to_landing_page() {
        let server = MockServer::start().await;

        let outcome = lookup(&server)
            .lookup_status(&request(None, Flags::default()))
            .await
            .unwrap();

        match outcome {
            StatusOutcome::Response(response) => {
                assert_eq!(response.status(), StatusCode::FOUND);
                assert_eq!(
                    response.headers()[header::LOCATION],
                    LinkSettings::default().redirect_url.as_str()
                );
            }
            StatusOutcome::Html(_) => panic!("expected redirect"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/1234567890"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = lookup(&server)
            .lookup_status(&request(Some("1234567890"), Flags::default()))
            .await;

        assert!(matches!(result, Err(crate::Error::Http(_))));
    }
}
