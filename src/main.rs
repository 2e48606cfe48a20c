// Inspection Reporter - Daemon
// Weekly scheduler + liveness endpoint around the classification pipeline.

use anyhow::{Context, Result};
use axum::{response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde_json::json;
use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use inspection_reporter::{
    next_weekly_run, run_report, CompanyDirectory, Config, TelegramClient, VERSION,
};

/// Everything a report run needs, shared between scheduler and health server
struct Daemon {
    config: Config,
    directory: CompanyDirectory,
    client: TelegramClient,
    /// Serializes report runs: at most one in flight, triggers arriving
    /// while a run is in progress are dropped
    run_lock: Mutex<()>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Inspection Reporter v{}", VERSION);

    let config = Config::from_env().context("Configuration error")?;

    let directory = match &config.companies_file {
        Some(path) => CompanyDirectory::from_file(path)?,
        None => CompanyDirectory::with_defaults(),
    };
    tracing::info!("Company directory loaded: {} entries", directory.entry_count());

    let client = TelegramClient::new(&config.bot_token)?;

    let daemon = Arc::new(Daemon {
        config,
        directory,
        client,
        run_lock: Mutex::new(()),
    });

    // Manual run at startup, then keep serving
    if env::args().any(|arg| arg == "--run-now") {
        let daemon = Arc::clone(&daemon);
        tokio::spawn(async move {
            trigger_run(&daemon).await;
        });
    }

    // Weekly scheduler
    {
        let daemon = Arc::clone(&daemon);
        tokio::spawn(async move {
            scheduler_loop(daemon).await;
        });
    }

    serve_health(daemon).await
}

/// Sleep until the next weekly trigger, run, repeat
async fn scheduler_loop(daemon: Arc<Daemon>) {
    loop {
        let next = next_weekly_run(Utc::now());
        tracing::info!("Next scheduled report: {}", next);

        let wait = (next - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        tokio::time::sleep(wait).await;

        tracing::info!("Scheduler triggered: running weekly report");
        trigger_run(&daemon).await;
    }
}

/// Run a report unless one is already in flight
async fn trigger_run(daemon: &Daemon) {
    match daemon.run_lock.try_lock() {
        Ok(_guard) => {
            if let Err(err) = run_report(&daemon.config, &daemon.directory, &daemon.client).await {
                tracing::error!("Report run failed: {:#}", err);
            }
        }
        Err(_) => {
            tracing::warn!("Report run already in progress, dropping trigger");
        }
    }
}

// ============================================================================
// Liveness endpoint
// ============================================================================

/// GET /health - liveness check
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET / - service descriptor
async fn service_info() -> impl IntoResponse {
    Json(json!({
        "service": "Inspection Reporter",
        "status": "running",
        "version": VERSION,
        "next_run": next_weekly_run(Utc::now()).to_rfc3339(),
    }))
}

async fn serve_health(daemon: Arc<Daemon>) -> Result<()> {
    let app = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", daemon.config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Health endpoint listening on http://{}", addr);
    axum::serve(listener, app)
        .await
        .context("Health server failed")
}
