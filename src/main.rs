use anyhow::{Context, Result};
use exercisedb_api::config::Config;
use exercisedb_api::context::AppContext;
use exercisedb_api::server;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exercisedb_api=info".parse()?),
        )
        .init();

    info!("Starting exercise catalog API");

    let config = Config::from_env()?;
    info!("Serving data from {}", config.data_dir.display());

    let context = Arc::new(AppContext::from_dir(config.data_dir.clone()));

    if config.preload_translations {
        // The catalog is retried lazily on the first request if this fails
        if let Err(e) = context.preload().await {
            error!("Preload failed: {}", e);
        }
    }

    let app = server::router(Arc::clone(&context), config.public_base_url.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
