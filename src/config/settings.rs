//! Gateway configuration settings
//!
//! Settings are loaded from a TOML file, overridden by environment
//! variables and finally by command-line flags.

use serde::{Deserialize, Serialize};

// Helper functions for serde defaults
fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "::".to_string()
}

fn default_port() -> u16 {
    4416
}

fn default_robots_txt() -> String {
    "User-agent: *\nAllow: /\n".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entry_bytes() -> usize {
    1024 * 1024
}

fn default_twitter_root() -> String {
    "https://twitter.com".to_string()
}

fn default_redirect_url() -> String {
    "https://github.com/dangeredwolf/FixTweet".to_string()
}

fn default_public_url() -> String {
    "http://localhost:4416".to_string()
}

fn default_provider_name() -> String {
    "FixTweet".to_string()
}

fn default_author_text() -> String {
    "Twitter".to_string()
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    crate::utils::version::product_token()
}

/// Main configuration settings for the gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheSettings,
    /// Redirect targets and branding
    #[serde(default)]
    pub links: LinkSettings,
    /// Upstream status service
    #[serde(default)]
    pub upstream: UpstreamSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Body served at `/robots.txt`
    #[serde(default = "default_robots_txt")]
    pub robots_txt: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Enable the response cache
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of cached responses
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Time-to-live of a cached response in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Largest response body that will be buffered and cached
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: usize,
}

/// Redirect targets, direct-media hosts and oEmbed branding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSettings {
    /// Origin of the original site, used for canonical redirects
    #[serde(default = "default_twitter_root")]
    pub twitter_root: String,
    /// Generic landing page for malformed or unmatched requests
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    /// Public origin of this gateway, used for oEmbed discovery links
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Hostnames that always serve direct media
    #[serde(default)]
    pub direct_media_domains: Vec<String>,
    /// oEmbed `provider_name`
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    /// oEmbed `title`
    #[serde(default = "default_author_text")]
    pub default_author_text: String,
}

/// Upstream status service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Base URL of the status service
    #[serde(default = "default_upstream_url")]
    pub base_url: String,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// User agent sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            robots_txt: default_robots_txt(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            twitter_root: default_twitter_root(),
            redirect_url: default_redirect_url(),
            public_url: default_public_url(),
            direct_media_domains: Vec::new(),
            provider_name: default_provider_name(),
            default_author_text: default_author_text(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables on top of the defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut settings = Self::default();

        if let Ok(host) = std::env::var("EMBED_SERVER_HOST") {
            settings.server.host = host;
        }

        if let Ok(port) = std::env::var("EMBED_SERVER_PORT") {
            settings.server.port = port
                .parse()
                .map_err(|e| crate::Error::config("port", &format!("Invalid port: {}", e)))?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            settings.logging.level = level;
        }

        if let Ok(verbose) = std::env::var("VERBOSE") {
            settings.logging.verbose = verbose.parse().unwrap_or(false);
        }

        if let Ok(ttl) = std::env::var("CACHE_TTL") {
            settings.cache.ttl_secs = ttl
                .parse()
                .map_err(|e| crate::Error::config("CACHE_TTL", &format!("Invalid TTL: {}", e)))?;
        }

        if let Ok(url) = std::env::var("UPSTREAM_URL") {
            settings.upstream.base_url = url;
        }
        if let Ok(root) = std::env::var("TWITTER_ROOT") {
            settings.links.twitter_root = root;
        }
        if let Ok(url) = std::env::var("REDIRECT_URL") {
            settings.links.redirect_url = url;
        }
        if let Ok(url) = std::env::var("PUBLIC_URL") {
            settings.links.public_url = url;
        }
        if let Ok(domains) = std::env::var("DIRECT_MEDIA_DOMAINS") {
            settings.links.direct_media_domains = domains
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(settings)
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Merge settings with environment variable overrides
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        let env_settings = Self::from_env()?;
        let defaults = Self::default();

        // Merge only non-default values from environment
        if env_settings.server.host != defaults.server.host {
            self.server.host = env_settings.server.host;
        }
        if env_settings.server.port != defaults.server.port {
            self.server.port = env_settings.server.port;
        }
        if env_settings.logging.level != defaults.logging.level {
            self.logging.level = env_settings.logging.level;
        }
        if env_settings.cache.ttl_secs != defaults.cache.ttl_secs {
            self.cache.ttl_secs = env_settings.cache.ttl_secs;
        }
        if env_settings.upstream.base_url != defaults.upstream.base_url {
            self.upstream.base_url = env_settings.upstream.base_url;
        }
        if env_settings.links.twitter_root != defaults.links.twitter_root {
            self.links.twitter_root = env_settings.links.twitter_root;
        }
        if env_settings.links.redirect_url != defaults.links.redirect_url {
            self.links.redirect_url = env_settings.links.redirect_url;
        }
        if env_settings.links.public_url != defaults.links.public_url {
            self.links.public_url = env_settings.links.public_url;
        }
        if !env_settings.links.direct_media_domains.is_empty() {
            self.links.direct_media_domains = env_settings.links.direct_media_domains;
        }

        Ok(self)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::config(
                "port",
                "Invalid server port: cannot be 0",
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(crate::Error::config(
                "ttl_secs",
                "Invalid cache TTL: cannot be 0",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        for (name, value) in [
            ("twitter_root", &self.links.twitter_root),
            ("redirect_url", &self.links.redirect_url),
            ("public_url", &self.links.public_url),
            ("upstream_url", &self.upstream.base_url),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(crate::Error::config(
                    name,
                    &format!("Invalid URL '{}': {}", value, e),
                ));
            }
        }

        Ok(())
    }
}
