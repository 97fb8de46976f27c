//! qradio-server - Quran radio proxy
//!
//! Relays the Itqan CMS developers API and recitation audio to the embedded
//! browser radio client.

use anyhow::{Context, Result};
use clap::Parser;
use qradio_common::config::{load_toml_config, resolve_config_path, ServerConfig};
use qradio_server::cli::Args;
use qradio_server::{build_router, server, AppState, UpstreamClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so the file can set the log level
    let config_path = resolve_config_path(args.config.as_deref());
    let toml = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => None,
    };
    let toml_loaded = toml.is_some();
    let config = ServerConfig::resolve(args.overrides(), toml)
        .context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "qradio_server={level},qradio_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any network work
    info!(
        "Starting Quran Radio (qradio-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) if toml_loaded => info!("Config file: {}", path.display()),
        Some(path) => info!("Config file {} not found, using defaults", path.display()),
        None => info!("No config file found, using defaults"),
    }
    info!("Upstream API: {}", config.upstream_base_url);

    let upstream = UpstreamClient::new(&config.upstream_base_url, config.request_timeout)
        .context("Failed to create upstream client")?;
    let app = build_router(AppState::new(upstream));

    let listener =
        server::bind_with_fallback(config.bind_address, config.port, config.fallback_port)
            .await?;
    let port = listener
        .local_addr()
        .context("Failed to read listener address")?
        .port();

    info!("Quran Radio running at http://localhost:{}", port);
    info!("Health check: http://localhost:{}/health", port);

    server::serve(listener, app).await?;

    Ok(())
}
