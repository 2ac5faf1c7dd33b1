//! Demo binary: host a small axum application.
//!
//! Signal handling lives here, in the caller, not in the library.

use std::path::Path;

use axum::routing::get;
use axum::{Json, Router};

use http_host::{config, observability, ListenConfig, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    // Optional TOML config path as the first argument.
    let listen = match std::env::args().nth(1) {
        Some(path) => config::load_config(Path::new(&path))?,
        None => ListenConfig::default(),
    };

    tracing::info!(
        host = %listen.host,
        port = listen.port,
        "Configuration loaded"
    );

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health));

    let server = Server::new(app);
    server.start_with(listen);

    // Bind is asynchronous; fail fast here if the port is taken.
    let addr = server.listener().bound_addr().await?;
    tracing::info!(address = %addr, "Listening for connections");

    shutdown_signal().await;

    server.stop().wait().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "http-host",
        "status": "running",
    }))
}

async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
