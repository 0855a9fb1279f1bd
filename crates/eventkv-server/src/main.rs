//! eventkv-server - REST API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use eventkv_core::{Config, SqliteEventStore};
use eventkv_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("eventkv_server=debug".parse().unwrap()),
        )
        .init();

    // Load configuration: optional file, then environment overrides
    let config = match std::env::var("EVENTKV_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    }
    .apply_env_overrides()?;

    // Open the store and build application state
    let store = SqliteEventStore::open(&config.database)?;
    info!(path = %config.database.path.display(), "Event store opened");

    let state = AppState::new(Arc::new(store));
    let app = create_server(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Starting eventkv-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
