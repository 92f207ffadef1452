//! Demonstration web API: a global fault boundary converts any unhandled
//! fault into a fixed, sanitized error response while full detail goes to
//! the operator log.

use tokio::signal;
use tracing::info;

use error_boundary_demo::config::Config;
use error_boundary_demo::startup::build_app;
use error_boundary_demo::telemetry::setup_telemetry;

/// Build version (injected at compile time).
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;
    setup_telemetry(&config);

    info!(
        version = VERSION,
        address = %config.http_address,
        environment = ?config.environment,
        pid = std::process::id(),
        "Starting error-boundary-demo"
    );

    let (app, addr) = build_app(&config)?;

    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
