//! Common test utilities and helpers
//!
//! In-memory fakes of the gateway's ports and request builders.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use embed_gateway::{
    AppState, Settings, StatusLookup, StatusOutcome, StatusRequest,
    cache::{MemoryCache, ResponseCache},
    config::settings::LinkSettings,
    create_app,
    render::{RenderConfig, render_status_page},
    types::{Author, Status},
    utils::http::found,
};

pub const BOT_UA: &str = "facebookexternalhit/1.1";
pub const HUMAN_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
pub const TELEGRAM_UA: &str = "TelegramBot (like TwitterBot)";
pub const DISCORD_UA: &str = "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)";

/// What the fake lookup answers with
#[derive(Debug, Clone)]
pub enum FakeMode {
    /// HTML page naming the id, bar width and call number
    Page,
    /// Redirect to the given media URL when `flags.direct` is set, page otherwise
    Media(String),
    /// The real crawler page for a text-only status by `alice`
    Rendered,
    /// Lookup failure
    Fail,
}

/// Status lookup that records every call
pub struct FakeLookup {
    mode: FakeMode,
    calls: AtomicUsize,
    requests: Mutex<Vec<StatusRequest>>,
}

impl FakeLookup {
    pub fn new(mode: FakeMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<StatusRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StatusLookup for FakeLookup {
    async fn lookup_status(&self, request: &StatusRequest) -> embed_gateway::Result<StatusOutcome> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());

        let page = || {
            StatusOutcome::Html(format!(
                "<html>status {} width {} call {}</html>",
                request.id.as_deref().unwrap_or("none"),
                RenderConfig::for_user_agent(&request.user_agent).bar_width,
                call
            ))
        };

        match &self.mode {
            FakeMode::Page => Ok(page()),
            FakeMode::Media(url) if request.flags.direct => Ok(StatusOutcome::Response(found(url))),
            FakeMode::Media(_) => Ok(page()),
            FakeMode::Rendered => {
                let status = Status {
                    id: request.id.clone().unwrap_or_default(),
                    text: "hello".to_string(),
                    author: Author {
                        name: "Alice".to_string(),
                        screen_name: "alice".to_string(),
                    },
                    card: None,
                    media: Vec::new(),
                };
                Ok(StatusOutcome::Html(render_status_page(
                    &status,
                    request.media_number,
                    &request.user_agent,
                    &LinkSettings::default(),
                )))
            }
            FakeMode::Fail => Err(embed_gateway::Error::upstream(503, "status service down")),
        }
    }
}

/// App wired to a fresh memory cache and the given lookup
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub lookup: Arc<FakeLookup>,
}

impl TestApp {
    pub fn new(mode: FakeMode) -> Self {
        Self::with_settings(Settings::default(), mode)
    }

    pub fn with_settings(settings: Settings, mode: FakeMode) -> Self {
        let lookup = FakeLookup::new(mode);
        let cache: Arc<dyn ResponseCache> = Arc::new(MemoryCache::from_settings(&settings.cache));
        let state = AppState::with_ports(settings, cache, lookup.clone());
        Self {
            router: create_app(state.clone()),
            state,
            lookup,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, user_agent: &str) -> Response<Body> {
        self.send(request("GET", uri, user_agent)).await
    }

    /// Wait until background cache writes have finished
    pub async fn settle(&self) {
        let tasks = self.state.tasks.clone();
        TestUtils::wait_for_condition(
            || {
                let tasks = tasks.clone();
                async move { tasks.is_empty() }
            },
            std::time::Duration::from_secs(5),
        )
        .await
        .unwrap();
    }
}

pub fn request(method: &str, uri: &str, user_agent: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "fx.example")
        .header(header::USER_AGENT, user_agent)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Test utilities
pub struct TestUtils;

impl TestUtils {
    /// Wait for async condition
    pub async fn wait_for_condition<F, Fut>(
        condition: F,
        timeout: std::time::Duration,
    ) -> anyhow::Result<()>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        use tokio::time::{sleep, timeout as tokio_timeout};

        tokio_timeout(timeout, async {
            loop {
                if condition().await {
                    return Ok(());
                }
                sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .map_err(|_| anyhow::anyhow!("Wait condition timeout"))?
    }
}
