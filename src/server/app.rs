//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{
    cache::{MemoryCache, NoopCache, ResponseCache},
    config::Settings,
    status::{StatusLookup, UpstreamStatusLookup},
};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{gateway, handlers};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,
    /// Store for replayable GET responses
    pub cache: Arc<dyn ResponseCache>,
    /// Source of status embeds
    pub lookup: Arc<dyn StatusLookup>,
    /// Background cache writes still in flight
    pub tasks: TaskTracker,
}

impl AppState {
    /// Build the state with the cache and upstream lookup described by `settings`
    pub fn new(settings: Settings) -> crate::Result<Self> {
        let cache: Arc<dyn ResponseCache> = if settings.cache.enabled {
            Arc::new(MemoryCache::from_settings(&settings.cache))
        } else {
            Arc::new(NoopCache)
        };
        let lookup = Arc::new(UpstreamStatusLookup::new(
            &settings.upstream,
            settings.links.clone(),
        )?);

        Ok(Self::with_ports(settings, cache, lookup))
    }

    /// Build the state around caller-supplied ports
    pub fn with_ports(
        settings: Settings,
        cache: Arc<dyn ResponseCache>,
        lookup: Arc<dyn StatusLookup>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            cache,
            lookup,
            tasks: TaskTracker::new(),
        }
    }
}

/// Create the main Axum application with routes and middleware
pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new();

    for prefix in ["/dl", "/dir"] {
        for segment in ["status", "statuses"] {
            router = router
                .route(
                    &format!("{prefix}/{{handle}}/{segment}/{{id}}"),
                    get(handlers::direct_status),
                )
                .route(
                    &format!("{prefix}/{{handle}}/{segment}/{{id}}/photo/{{media_number}}"),
                    get(handlers::direct_status),
                )
                .route(
                    &format!("{prefix}/{{handle}}/{segment}/{{id}}/video/{{media_number}}"),
                    get(handlers::direct_status),
                );
        }
    }

    for segment in ["status", "statuses"] {
        router = router
            .route(&format!("/{{handle}}/{segment}/{{id}}"), get(handlers::status))
            .route(
                &format!("/{{handle}}/{segment}/{{id}}/photo/{{media_number}}"),
                get(handlers::status),
            )
            .route(
                &format!("/{{handle}}/{segment}/{{id}}/video/{{media_number}}"),
                get(handlers::status),
            );
    }

    router
        .route("/owoembed", get(handlers::oembed))
        .route("/{handle}", get(handlers::profile))
        .route("/{handle}/", get(handlers::profile))
        .fallback(handlers::catch_all)
        // The gateway answers OPTIONS itself, so CORS sits inside it
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    gateway::cache_gateway,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
