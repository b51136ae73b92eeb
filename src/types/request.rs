//! Request-scoped types
//!
//! Route captures for status paths and the per-request handling flags.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static STATUS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2,20}").expect("static regex"));

/// Per-request handling options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Serve the media asset even to non-crawler clients
    pub direct: bool,
}

impl Flags {
    pub fn direct() -> Self {
        Self { direct: true }
    }
}

/// Path captures of a status route
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusParams {
    pub handle: String,
    pub id: String,
    #[serde(default)]
    pub media_number: Option<String>,
}

impl StatusParams {
    /// The first run of 2 to 20 digits in the id segment.
    ///
    /// Segments like `1234.mp4` yield `1234`.
    pub fn status_id(&self) -> Option<String> {
        STATUS_ID.find(&self.id).map(|m| m.as_str().to_string())
    }

    /// 1-based media position, defaulting to 1 when absent or not a positive integer.
    pub fn media_number(&self) -> u32 {
        self.media_number
            .as_deref()
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1)
    }
}
