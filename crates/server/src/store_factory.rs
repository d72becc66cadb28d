use std::sync::Arc;

use veridoc_store::{DocumentStore, NotificationStore};
use veridoc_store_memory::MemoryStore;

use crate::config::StoreConfig;
use crate::error::ServerError;

/// Build the document and notification stores named by the configuration.
///
/// The memory backend shares one [`MemoryStore`] behind both traits. The
/// postgres backend runs its migrations before returning.
pub async fn build_stores(
    config: &StoreConfig,
) -> Result<(Arc<dyn DocumentStore>, Arc<dyn NotificationStore>), ServerError> {
    match config.backend.as_str() {
        "memory" => {
            let store = Arc::new(MemoryStore::new());
            Ok((store.clone(), store))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let store = Arc::new(build_postgres(config).await?);
            Ok((store.clone(), store))
        }
        other => Err(ServerError::Config(format!(
            "unknown store backend: {other}"
        ))),
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres(
    config: &StoreConfig,
) -> Result<veridoc_store_postgres::PostgresStore, ServerError> {
    use veridoc_store_postgres::{PostgresConfig, PostgresStore};

    let mut pg = PostgresConfig::default();
    pg.url = config
        .url
        .clone()
        .ok_or_else(|| ServerError::Config("store.url is required for postgres".into()))?;
    if let Some(pool_size) = config.pool_size {
        pg.pool_size = pool_size;
    }
    if let Some(schema) = &config.schema {
        pg.schema = schema.clone();
    }
    if let Some(prefix) = &config.table_prefix {
        pg.table_prefix = prefix.clone();
    }
    pg.ssl_mode = config.ssl_mode.clone();
    pg.ssl_root_cert = config.ssl_root_cert.clone();
    PostgresStore::new(pg)
        .await
        .map_err(|e| ServerError::Config(format!("failed to connect to postgres: {e}")))
}
