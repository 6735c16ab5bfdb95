//! # eodsad: competition server daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`eodsa.toml` plus `EODSA_*` environment overrides)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repositories, credentials and gateways behind the port traits
//! - Bootstrap the configured admin account
//! - Build the axum router and serve it until SIGINT or SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod backend;
mod config;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eodsa_adapter_http_axum::state::AppState;
use eodsa_adapter_storage_sqlite_sqlx::Config as DatabaseConfig;
use eodsa_app::services::JudgeService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;

    // Ports
    let ports = backend::ports(&db, &config)?;

    match config.admin_credentials() {
        Some((email, password)) => {
            let admin = JudgeService::new(&ports)
                .ensure_admin(email, password)
                .await
                .context("failed to bootstrap admin account")?;
            tracing::info!(judge_id = %admin.id, "admin account ready");
        }
        None => tracing::warn!("no admin credentials configured, admin routes need an existing admin"),
    }

    // HTTP
    let state = AppState::new(&ports).with_trusted_proxy(config.server.trust_forwarded_for);
    let app = eodsa_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "eodsad listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("eodsad stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
