use anyhow::Result;
use shopfront::config::{LoggingConfig, ShopConfig, StorageConfig};
use shopfront::server::ServerBuilder;
use shopfront::storage::Repositories;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "shopfront.yaml";

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn repositories(storage: &StorageConfig) -> Result<Repositories> {
    match storage {
        StorageConfig::InMemory => Ok(Repositories::in_memory()),
        #[cfg(feature = "postgres")]
        StorageConfig::Postgres {
            url,
            max_connections,
        } => {
            use shopfront::storage::postgres;

            let pool = postgres::connect(url, *max_connections).await?;
            postgres::ensure_schema(&pool).await?;
            tracing::info!(max_connections, "connected to PostgreSQL");
            Ok(Repositories::postgres(pool))
        }
        #[cfg(not(feature = "postgres"))]
        StorageConfig::Postgres { .. } => Err(anyhow::anyhow!(
            "the postgres backend requires building with the `postgres` feature"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::var("SHOP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config_found = path.exists();
    let config = ShopConfig::load(Some(&path))?;

    init_tracing(&config.logging);
    if config_found {
        tracing::info!(path = %path.display(), "loaded configuration");
    } else {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
    }

    let repositories = repositories(&config.storage).await?;

    ServerBuilder::new()
        .with_repositories(repositories)
        .with_identity_provider(config.identity.provider())
        .with_page_limits(config.pagination)
        .serve(&config.server.bind)
        .await
}
