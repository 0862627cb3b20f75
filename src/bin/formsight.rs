//! formsight server binary.
//!
//! Loads configuration from the environment (plus a local `.env` file
//! when present), installs tracing, and serves the HTTP API.

use anyhow::Context;
use formsight::server::{run, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("formsight=info")),
        )
        .init();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    run(config).await.context("server error")
}
