//! docker-api-aws: welcome and health check service.
//!
//! This is the application entry point. It loads configuration from an
//! optional TOML file and the environment, initializes tracing, creates the
//! lazily-connecting PostgreSQL pool, sets up the Axum router and starts the
//! HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docker_api_aws::config::{
    AppConfig, LogFormat, DEFAULT_LOG_FILTER, SERVICE_NAME, SERVICE_VERSION,
};
use docker_api_aws::db::PgProbePool;
use docker_api_aws::http::start_server;
use docker_api_aws::{create_router, AppState};

/// docker-api-aws: welcome and health check service
#[derive(Parser, Debug)]
#[command(name = "docker-api-aws", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "docker_api_aws=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration (file, then environment overrides)
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        config_file = args.config.as_deref().unwrap_or("<none>"),
        "Loaded configuration"
    );
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        max_connections = config.database.max_connections,
        "PostgreSQL pool configured"
    );

    let pool = PgProbePool::connect_lazy(&config.database);

    let http_config = config.http.clone();
    let state = AppState::new(config, Arc::new(pool.clone()));
    let app = create_router(state);

    tracing::info!(
        service = SERVICE_NAME,
        version = SERVICE_VERSION,
        host = %http_config.host,
        port = http_config.port,
        "Health checks available at /health and /health/db"
    );

    let result = start_server(app, &http_config).await;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(result?)
}
