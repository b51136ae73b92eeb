//! Response cache port
//!
//! The gateway stores fully buffered responses keyed by request URL plus
//! client family. [`MemoryCache`] keeps them in a moka cache bounded by
//! entry count and time-to-live; [`NoopCache`] never stores anything.

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use moka::future::Cache;

use crate::config::settings::CacheSettings;

/// A buffered HTTP response that can be replayed any number of times
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    /// Buffer the whole body of a response
    pub async fn from_response(response: Response) -> crate::Result<Self> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| crate::Error::cache("buffer", &e.to_string()))?;
        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Storage for replayable responses
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedResponse>;

    async fn put(&self, key: String, response: CachedResponse);

    /// Remove an entry, returning whether one was present
    async fn delete(&self, key: &str) -> bool;
}

/// In-process cache with capacity and TTL eviction
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, CachedResponse>,
}

impl MemoryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.max_entries, Duration::from_secs(settings.ttl_secs))
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<CachedResponse> {
        self.inner.get(key).await
    }

    async fn put(&self, key: String, response: CachedResponse) {
        self.inner.insert(key, response).await;
    }

    async fn delete(&self, key: &str) -> bool {
        self.inner.remove(key).await.is_some()
    }
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl ResponseCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<CachedResponse> {
        None
    }

    async fn put(&self, _key: String, _response: CachedResponse) {}

    async fn delete(&self, _key: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    fn cached(body: &'static str) -> CachedResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/html".parse().unwrap());
        CachedResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_memory_cache_put_get_delete() {
        let cache = MemoryCache::new(16, Duration::from_secs(60));
        assert!(cache.get("k").await.is_none());

        cache.put("k".to_string(), cached("hello")).await;
        let hit = cache.get("k").await.unwrap();
        assert_eq!(hit.body, Bytes::from_static(b"hello"));
        assert_eq!(hit.headers[header::CONTENT_TYPE], "text/html");

        assert!(cache.delete("k").await);
        assert!(!cache.delete("k").await);
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_expires_entries() {
        let cache = MemoryCache::new(16, Duration::from_millis(50));
        cache.put("k".to_string(), cached("hello")).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        cache.put("k".to_string(), cached("hello")).await;
        assert!(cache.get("k").await.is_none());
        assert!(!cache.delete("k").await);
    }

    #[tokio::test]
    async fn test_buffer_round_trip() {
        let response = (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "body").into_response();
        let buffered = CachedResponse::from_response(response).await.unwrap();
        assert_eq!(buffered.status, StatusCode::OK);
        assert_eq!(buffered.body, Bytes::from_static(b"body"));
        assert_eq!(buffered.len(), 4);

        let replayed = buffered.into_response();
        assert_eq!(replayed.headers()[header::CONTENT_TYPE], "text/plain");
    }
}
