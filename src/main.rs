use anyhow::Result;
use catalog::config::CatalogConfig;
use catalog::server::ServerBuilder;
use catalog::{storage, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv_path = dotenv::dotenv().ok();

    let config = CatalogConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.database.backend,
        "Starting catalog server"
    );

    let store = storage::open_store(&config.database).await?;

    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .serve()
        .await
}
