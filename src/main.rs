use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tdedge::api::{create_router, AppState};
use tdedge::config::AppConfig;
use tdedge::error::{Result, TdError};
use tdedge::roster::RosterIndex;
use tdedge::services::{RefreshPipeline, SnapshotCache};
use tdedge::{OddsApiClient, ProjectionsClient};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tdedge", about = "Anytime-TD adjusted odds service")]
struct Cli {
    /// Configuration directory (default.toml + environment overrides)
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override the configured listening port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config_dir)?;
    init_logging(&config.logging.level);

    config
        .validate()
        .map_err(|errors| TdError::Internal(errors.join("; ")))?;

    let roster = Arc::new(RosterIndex::load(config.engine.roster_path.as_deref())?);
    let projections = Arc::new(ProjectionsClient::new(&config.projections.url)?);
    let odds = Arc::new(OddsApiClient::new(
        &config.odds.base_url,
        &config.odds.api_key,
    )?);

    let config = Arc::new(config);
    let pipeline = Arc::new(RefreshPipeline::new(
        projections,
        odds,
        Arc::clone(&roster),
        &config,
    ));
    let cache = Arc::new(SnapshotCache::new(Duration::from_secs(
        config.cache.ttl_secs,
    )));

    let state = AppState::new(Arc::clone(&config), cache, pipeline, roster);
    let app = create_router(state);

    let port = cli.port.unwrap_or(config.server.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TdError::Internal(format!("server error: {}", e)))?;

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,tdedge={}", level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
