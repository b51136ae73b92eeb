//! Locating and layering the gateway configuration
//!
//! A TOML file (named explicitly, through `EMBED_GATEWAY_CONFIG`, or found in
//! the platform config directory) is laid over the built-in defaults, then the
//! `EMBED_*` / link environment variables are applied and the result is
//! validated. Command-line flags are the caller's last word.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{Result, config::Settings};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "EMBED_GATEWAY_CONFIG";

const CONFIG_DIR_NAME: &str = "embed-gateway";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug)]
pub struct ConfigLoader {
    defaults: Settings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Config file to use when none was named on the command line.
    ///
    /// `EMBED_GATEWAY_CONFIG` wins when it points at an existing file,
    /// otherwise `<config dir>/embed-gateway/config.toml` if present.
    pub fn get_config_path() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(config_path);
            if path.exists() {
                debug!("Using config file from {}: {:?}", CONFIG_ENV, path);
                return Some(path);
            }
            warn!("{} points to non-existent file: {:?}", CONFIG_ENV, path);
        }

        let default_path = dirs::config_dir()?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME);
        if default_path.exists() {
            debug!("Using default config file: {:?}", default_path);
            return Some(default_path);
        }

        debug!("No config file found");
        None
    }

    /// An explicit path if given, else the discovered one
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(Self::get_config_path)
    }

    /// Defaults, then the file (if it exists), then the environment.
    ///
    /// A named file that is missing is not an error; the gateway starts on
    /// defaults. A file that fails to parse or validate is.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let settings = match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {:?}", path);
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("Configuration file not found: {:?}, using defaults", path);
                self.defaults.clone()
            }
            None => self.defaults.clone(),
        };

        let settings = settings.merge_with_env()?;
        settings.validate()?;

        info!(
            "Configuration loaded: upstream {}, cache {}",
            settings.upstream.base_url,
            if settings.cache.enabled { "on" } else { "off" }
        );
        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
