//! Interactive dataset server entrypoint.

use anyhow::Context;
use clap::Parser;
use idset_api::{AppState, ServerConfig, create_router, logging};
use idset_db::{Database, PgDataSource, PgDatasetStore};
use idset_engine::{DatasetService, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "idset-server")]
#[command(author, version, about = "Interactive dataset HTTP server", long_about = None)]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, env = "IDSET_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_logging(config.log_json);

    let db = Database::connect(
        &config.database_url,
        config.max_connections,
        config.acquire_timeout(),
    )
    .await
    .context("connecting to database")?;

    if config.run_migrations {
        db.migrate().await.context("running migrations")?;
    }

    let service = Arc::new(DatasetService::new(
        Arc::new(PgDatasetStore::new(db.pool().clone())),
        Arc::new(PgDataSource::new(db.pool().clone())),
        ServiceConfig {
            sweep_interval: config.sweep_interval(),
        },
    ));
    let loaded = service.init().await.context("loading dataset definitions")?;
    info!(datasets = loaded, "Dataset registry loaded");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = service.start(shutdown_rx);

    let app = create_router(Arc::new(AppState::new(
        service.clone(),
        config.link_prefix.clone(),
    )));
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("serving HTTP")?;

    if let Err(e) = sweeper.await {
        warn!(error = %e, "Cache sweeper task failed");
    }
    info!("Server stopped");
    Ok(())
}

/// Resolve on ctrl-c and tell background tasks to stop.
async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
    let _ = shutdown.send(true);
}
