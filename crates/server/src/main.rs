use anyhow::Context;
use oms_core::config::{Config, HttpConfig};
use server::{create_app, AppState};
use std::sync::Arc;
use std::time::Duration;
use tooling::SharedRegistry;
use tracing::{info, warn};

fn build_http_client(http: &HttpConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to create HTTP client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set default log level if not already set
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting OMS tool server");

    let config = Config::load_from_env().context("Failed to load configuration")?;
    if config.vtex.app_key.is_empty() || config.vtex.app_token.is_empty() {
        warn!("No default VTEX credentials configured; requests must send them as headers");
    }

    let client = build_http_client(&config.http)?;
    let registry = vtex_tools::build_registry_with_client(client)
        .context("Failed to assemble tool registry")?;
    info!(tools = registry.tool_count(), "Tool registry ready");

    let state = AppState::new(
        Arc::new(SharedRegistry::new(registry)),
        config.execution_context(),
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind_addr))?;

    info!("Server running on http://{}", config.server.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
