//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryProductStore;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoProductStore;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::core::error::StorageError;
use crate::core::store::ProductStore;
use std::sync::Arc;

/// Open the store selected by the configuration
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory product store");
            Ok(Arc::new(InMemoryProductStore::new()))
        }
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => Ok(Arc::new(MongoProductStore::connect(config).await?)),
        #[cfg(not(feature = "mongodb_backend"))]
        StorageBackend::Mongodb => Err(StorageError::Unavailable {
            backend: "mongodb (built without the mongodb_backend feature)".to_string(),
        }),
    }
}
