use anyhow::Result;
use sitekit_renderer::{serve, RendererConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let backend_url = std::env::var("SITEKIT_BACKEND_URL")
        .unwrap_or_else(|_| "http://localhost:3001".to_string());
    let bind: SocketAddr = std::env::var("SITEKIT_BIND")
        .unwrap_or_else(|_| "0.0.0.0:4000".to_string())
        .parse()?;

    serve(RendererConfig::new(backend_url, bind)).await?;
    Ok(())
}
