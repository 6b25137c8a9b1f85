//! AFM lookup HTTP service.

use afm_check::registry::RegistryClient;
use afm_check::server::{self, AppState, ServerConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let registry = config.registry();
    if !registry.has_credentials() {
        tracing::warn!("registry credentials are not set; lookups will be rejected by the registry");
    }
    tracing::info!(endpoint = %registry.endpoint, timeout = ?registry.timeout, "registry configured");

    let client = RegistryClient::new(registry)?;
    let app = server::router(AppState::new(client));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
