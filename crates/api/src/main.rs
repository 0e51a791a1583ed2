use std::sync::Arc;

use anyhow::Context;

use lineguard_api::app::{build_app, services::build_services};
use lineguard_infra::config::PipelineConfig;

const BIND_ADDR_VAR: &str = "LINEGUARD_BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lineguard_observability::init();

    let config = PipelineConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;
    let services = build_services(&config)
        .inspect_err(|e| tracing::error!(error = %e, "failed to wire services"))?;

    let app = build_app(Arc::new(services));

    let addr = std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, region = %config.region, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
