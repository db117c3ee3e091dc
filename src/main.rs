mod accounts;
mod ads;
mod adsets;
mod campaigns;
mod catalog;
mod config;
mod constants;
mod facebook;
mod insights;
mod models;
mod orchestrator;
mod protocol;
mod server;
#[cfg(test)]
mod testing;
mod tools;

use std::error::Error;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meta_ads_mcp=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    info!(api_version = %config.api_version, base_url = %config.base_url, "configuration loaded");
    if config.access_token.is_none() {
        info!("META_ACCESS_TOKEN not set, tools will require an access_token argument");
    }

    let api = facebook::FacebookAPI::new(&config)?;
    let tools = tools::MetaAdsTools::new(Arc::new(api));

    server::McpServer::new(tools).run_stdio().await?;

    Ok(())
}
