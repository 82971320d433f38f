//! Studio Scheduling HTTP Server Binary
//!
//! This is the main entry point for the scheduling REST API server.
//! It initializes the repository, sets up the HTTP router, and starts serving
//! requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin studio-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: Storage backend selection (default: local)
//! - `STUDIO_CONFIG`: Path to a TOML configuration file (optional)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use studio_core::db::{AppConfig, RepositoryFactory};
use studio_core::http::{create_router, AppState};
use studio_core::services::LogNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Studio Scheduling HTTP Server");

    // Load configuration and create the repository; the port is passed
    // explicitly everywhere, never held in ambient state.
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let repository = RepositoryFactory::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    info!("Repository initialized successfully");

    // Create application state
    let state = AppState::new(repository, Arc::new(LogNotifier), config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
