// src/main.rs

use arcanum_recon::auth::SessionResolver;
use arcanum_recon::config::{Cli, Command, ProbeConfig, ScanArgs, ServeArgs, ServerConfig};
use arcanum_recon::http::{AppState, build_router};
use arcanum_recon::logging::initialize_logging;
use arcanum_recon::store::{HistoryStore, SqliteHistoryStore};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Scan(args) => scan_once(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    initialize_logging(true)?;
    let config = ServerConfig::from_args(&args).wrap_err("invalid configuration")?;

    if config.auth.is_empty() {
        warn!("No API tokens configured; every scan request will be rejected.");
    }

    let scanner = config.probe.build_scanner()?;
    info!(
        routes = scanner.catalogue().sensitive_routes.len(),
        subdomains = scanner.catalogue().subdomains.len(),
        slugs = scanner.catalogue().slug_suffixes.len(),
        timeout_secs = config.probe.timeout.as_secs(),
        "Scanner configured."
    );
    let store: Arc<dyn HistoryStore> = Arc::new(
        SqliteHistoryStore::connect(&config.database_url, config.db_connections)
            .await
            .wrap_err("failed to open history store")?,
    );
    let auth: Arc<dyn SessionResolver> = Arc::new(config.auth.clone());
    let state = AppState::new(scanner, store, auth, config.history_limit);
    let app = build_router(state, config.body_limit);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind))?;
    info!(address = %config.bind, "Scanner service listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server failed")?;

    info!("Scanner service stopped.");
    Ok(())
}

async fn scan_once(args: ScanArgs) -> Result<()> {
    initialize_logging(false)?;
    let probe = ProbeConfig::from_args(&args.probe)?;
    let scanner = probe.build_scanner()?;

    let report = scanner.scan(&args.target).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal.");
    }
}
