use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mart_cli::App;
use mart_core::MartConfig;
use mart_core::keystore::KeyStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("memory-mart.toml"), PathBuf::from);

    let config = MartConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    // Screens own stdout; logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        "Memory Mart starting"
    );

    let keystore = KeyStore::from_config(&config.storage);
    let app = App::new(config, keystore).context("failed to set up the content API client")?;
    mart_cli::run(app).await
}
