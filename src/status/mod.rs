//! Status lookup port
//!
//! The gateway asks a [`StatusLookup`] for the embed of a status. The
//! lookup either hands back an HTML document for the gateway to wrap, or a
//! complete response (redirect, upstream error) to pass through untouched.

pub mod upstream;

use async_trait::async_trait;
use axum::response::Response;

use crate::types::Flags;

pub use upstream::UpstreamStatusLookup;

/// Everything a lookup needs to know about the incoming request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    /// Numeric status id, absent when the path carried no digits
    pub id: Option<String>,
    /// 1-based media position
    pub media_number: u32,
    pub user_agent: String,
    pub flags: Flags,
}

/// Result of a status lookup
#[derive(Debug)]
pub enum StatusOutcome {
    /// Page body to serve with the standard header set
    Html(String),
    /// Prebuilt response to return verbatim
    Response(Response),
}

#[async_trait]
pub trait StatusLookup: Send + Sync {
    async fn lookup_status(&self, request: &StatusRequest) -> crate::Result<StatusOutcome>;
}
