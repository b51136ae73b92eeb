//! Request classification
//!
//! Heuristics that decide who is asking: a link-preview crawler or a person,
//! which chat client family the crawler belongs to, and whether the request
//! asks for the raw media asset instead of the landing page.

use regex::Regex;
use std::sync::LazyLock;

static BOT_UA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bot|facebook").expect("static regex"));

static DIRECT_MEDIA_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status(es)?/\d+\.(mp4|png|jpg)").expect("static regex"));

/// Coarse client bucket used to vary rendering and the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientFamily {
    Telegram,
    Discord,
    Other,
}

impl ClientFamily {
    /// Most specific match first; matching is case-sensitive.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("Telegram") {
            ClientFamily::Telegram
        } else if user_agent.contains("Discord") {
            ClientFamily::Discord
        } else {
            ClientFamily::Other
        }
    }

    /// Suffix appended to the request URL to form the cache key
    pub fn cache_suffix(self) -> &'static str {
        match self {
            ClientFamily::Telegram => "&telegram",
            ClientFamily::Discord => "&discord",
            ClientFamily::Other => "",
        }
    }
}

/// Whether the user agent looks like a crawler.
///
/// A permissive substring test; false positives are acceptable.
pub fn is_bot(user_agent: &str) -> bool {
    BOT_UA.is_match(user_agent)
}

/// Whether the request asks for raw media, either by file extension on the
/// status path or by arriving on one of the direct-media hostnames.
pub fn is_direct_media_request(path: &str, host: Option<&str>, direct_domains: &[String]) -> bool {
    if DIRECT_MEDIA_PATH.is_match(path) {
        return true;
    }
    host.map(strip_port)
        .is_some_and(|host| direct_domains.iter().any(|d| d.eq_ignore_ascii_case(host)))
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host.split_once(']').map_or(host, |(name, _)| &host[..=name.len()]);
    }
    host.split_once(':').map_or(host, |(name, _)| name)
}
