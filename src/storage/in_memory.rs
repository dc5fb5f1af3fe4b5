//! In-memory implementation of ProductStore for testing and development

use crate::core::error::StorageError;
use crate::core::product::Product;
use crate::core::query::{ProductPage, ProductQuery};
use crate::core::store::{ProductStore, StoreResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "memory";

/// In-memory product store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// The natural order of the collection is insertion order.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<IndexMap<Uuid, Product>>>,
}

impl InMemoryProductStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products
    pub fn len(&self) -> StoreResult<usize> {
        let products = self.products.read().map_err(lock_error)?;
        Ok(products.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("Failed to acquire lock: {}", e),
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, product: Product) -> StoreResult<Product> {
        let mut products = self.products.write().map_err(lock_error)?;

        if products.contains_key(&product.id) {
            return Err(StorageError::IntegrityError {
                message: format!("duplicate product id {}", product.id),
            });
        }
        products.insert(product.id, product.clone());

        Ok(product)
    }

    async fn get(&self, id: &Uuid) -> StoreResult<Option<Product>> {
        let products = self.products.read().map_err(lock_error)?;

        Ok(products.get(id).cloned())
    }

    async fn find(&self, query: &ProductQuery) -> StoreResult<ProductPage> {
        let products = self.products.read().map_err(lock_error)?;

        let mut matching: Vec<&Product> = products
            .values()
            .filter(|product| query.filter.matches(product))
            .collect();
        // Stable sort keeps insertion order among ties
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.window.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.window.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ProductPage { items, total })
    }

    async fn replace(&self, product: Product) -> StoreResult<Option<Product>> {
        let mut products = self.products.write().map_err(lock_error)?;

        match products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &Uuid) -> StoreResult<bool> {
        let mut products = self.products.write().map_err(lock_error)?;

        Ok(products.shift_remove(id).is_some())
    }
}
