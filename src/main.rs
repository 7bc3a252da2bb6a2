use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use routewise::api::AppState;
use routewise::config::AppConfig;
use routewise::web;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("routewise=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("Failed to load provider configuration")?;
    let state = Arc::new(
        AppState::from_config(&config).context("Failed to initialize provider clients")?,
    );

    web::run(state, config.port).await
}
