//! viralsynth-console - browser console for the ViralSynth backend
//!
//! Serves the trending-audio and pattern dashboards, the generation form and
//! the ingestion trigger. The backend base URL is resolved once here and
//! injected into everything that talks to the backend.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use viralsynth_common::config::{
    default_config_path, load_toml_config, load_toml_config_or_default, resolve_api_base,
    DEFAULT_BIND_ADDR,
};
use viralsynth_console::client::BackendClient;
use viralsynth_console::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(version, about = "ViralSynth browser console")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "VIRALSYNTH_CONSOLE_PORT")]
    port: u16,

    /// Address to bind (overrides `bind_addr` in the config file)
    #[arg(short, long)]
    bind: Option<String>,

    /// Backend base URL (overrides VIRALSYNTH_API_BASE_URL and the config file)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Path to console.toml (default: <config_dir>/viralsynth/console.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend request timeout in seconds (at least 1)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Log level comes from the config file, so peek at it before tracing exists
    let log_level = args
        .config
        .clone()
        .or_else(default_config_path)
        .and_then(|path| load_toml_config(&path).ok())
        .map(|config| config.logging.level)
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ViralSynth Console (viralsynth-console) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml_config = load_toml_config_or_default(args.config.as_deref());

    let api_base = resolve_api_base(args.api_base_url.as_deref(), &toml_config)
        .context("Failed to resolve backend base URL")?;

    let client = BackendClient::with_timeout(api_base, Duration::from_secs(args.timeout_secs))
        .context("Failed to create backend HTTP client")?;
    info!(
        "Backend: {} (request timeout {}s)",
        client.base(),
        args.timeout_secs
    );

    let state = AppState::new(client);
    let app = build_router(state);

    let bind_addr = args
        .bind
        .or(toml_config.bind_addr)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let addr = format!("{}:{}", bind_addr, args.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("viralsynth-console listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
