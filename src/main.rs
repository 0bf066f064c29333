use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use xrista_site::config::Config;
use xrista_site::i18n::LocaleCatalog;
use xrista_site::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xrista_site=info".parse()?),
        )
        .init();

    info!("Starting site server");

    // Load configuration from environment
    let config = Config::from_env()?;
    if !config.overrides.is_empty() {
        info!("Site configuration overrides active: {:?}", config.overrides);
    }

    // The default language must load; everything else can fall back to it
    let catalog = LocaleCatalog::from_config(&config).context("Failed to load locale data")?;

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    let app = router(AppState::new(config, catalog));

    info!("Listening on {}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
