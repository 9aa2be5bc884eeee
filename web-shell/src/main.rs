use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use web_shell::{ServerConfig, ROUTES};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().context("reading server configuration")?;
    for route in &ROUTES {
        tracing::debug!(path = route.path, view = %route.view, "route");
    }

    let listener = web_shell::bind(&config).await?;
    web_shell::run(listener, config).await?;
    Ok(())
}
