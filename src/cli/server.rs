//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP gateway.

use crate::{
    Settings,
    cli::init_logging,
    config::ConfigLoader,
    server::{AppState, create_app},
    utils::version,
};
use anyhow::Result;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Arguments for server mode
#[derive(Debug)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Log filter precedence: `--verbose` > `RUST_LOG` > configured level
pub fn build_env_filter(verbose: bool, configured_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(configured_level)
    }
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    // Configuration is loaded before logging so logging.level can apply.
    // Precedence: CLI > environment > config file > defaults
    let config_loader = ConfigLoader::new();

    let config_path = ConfigLoader::resolve_path(args.config.as_deref().map(std::path::Path::new));

    let mut settings = config_loader
        .load(config_path.as_deref())
        .unwrap_or_else(|e| {
            // Can't use tracing here since it's not initialized yet
            eprintln!(
                "Warning: Failed to load configuration: {}. Using defaults.",
                e
            );
            Settings::default()
        });

    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.logging.verbose = args.verbose;

    init_logging(
        build_env_filter(args.verbose, &settings.logging.level),
        std::io::stdout,
    );

    tracing::info!("Starting embed gateway {}", version::get_detailed_version());

    let state = AppState::new(settings.clone())?;
    let tasks = state.tasks.clone();
    let app = create_app(state);

    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;
    tracing::info!(
        "Embed gateway v{} listening on {}, upstream {}",
        version::get_version(),
        addr,
        settings.upstream.base_url
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.close();
    if !tasks.is_empty() {
        tracing::info!("Waiting for {} pending cache writes", tasks.len());
    }
    tasks.wait().await;
    tracing::info!("Embed gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
}

/// Parse host string and pick the address to bind
///
/// `::` falls back to `0.0.0.0` when IPv6 is unavailable.
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);
        tracing::debug!("Parsed address: {}", addr);
        return Ok(addr);
    }

    match host {
        "::" => {
            let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
            tracing::debug!("Using IPv6 any address: {}", addr);

            match tokio::net::TcpListener::bind(addr).await {
                Ok(_) => {
                    tracing::info!("Successfully bound to IPv6 address {}", addr);
                    Ok(addr)
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                        port,
                        e
                    );
                    let fallback_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
                    tracing::info!("Using IPv4 fallback address: {}", fallback_addr);
                    Ok(fallback_addr)
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid host address: {}. Use an IP address, '::' for IPv6 or '0.0.0.0' for IPv4",
                host
            );
        }
    }
}
