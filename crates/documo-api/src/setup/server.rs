//! HTTP server startup.

use anyhow::{Context, Result};
use axum::Router;

use documo_core::Config;

pub async fn start_server(config: &Config, router: Router) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(addr = %addr, "Documo API listening");

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
