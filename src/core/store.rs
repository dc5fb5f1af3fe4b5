//! Storage trait for products
//!
//! Implementations persist whole [`Product`] documents keyed by id and
//! evaluate a [`ProductQuery`] natively. Business rules such as pricing and
//! validation live in the service layer, not here.

use crate::core::error::StorageError;
use crate::core::product::Product;
use crate::core::query::{ProductPage, ProductQuery};
use async_trait::async_trait;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StorageError>;

/// Document store for the product collection
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Short backend name used in logs and errors
    fn backend(&self) -> &'static str;

    /// Persist a new product
    async fn insert(&self, product: Product) -> StoreResult<Product>;

    /// Get a product by id
    async fn get(&self, id: &Uuid) -> StoreResult<Option<Product>>;

    /// Return one page of the products matching the query, plus the total
    /// number of matches
    async fn find(&self, query: &ProductQuery) -> StoreResult<ProductPage>;

    /// Replace a stored product, returning `None` when the id is unknown
    async fn replace(&self, product: Product) -> StoreResult<Option<Product>>;

    /// Delete a product, returning `false` when the id is unknown
    async fn delete(&self, id: &Uuid) -> StoreResult<bool>;

    /// Verify the backend is reachable
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
