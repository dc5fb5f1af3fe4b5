//! Product service: validate, look up, mutate or read, in a single pass
//!
//! The service owns the write-time pricing rule. `updated_price` is derived
//! here before every insert or replace, so a store only ever persists
//! consistent documents.

use crate::config::PaginationConfig;
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::product::{NewProduct, Product, ProductPatch};
use crate::core::query::{ListParams, PaginatedResponse};
use crate::core::store::ProductStore;
use std::sync::Arc;
use uuid::Uuid;

/// CRUD operations over a [`ProductStore`]
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    pagination: PaginationConfig,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Parse a path id; anything that is not a UUID cannot name a product
    pub fn parse_id(raw: &str) -> CatalogResult<Uuid> {
        Uuid::parse_str(raw.trim()).map_err(|_| CatalogError::MalformedId {
            id: raw.to_string(),
        })
    }

    /// Create a product from a validated payload
    pub async fn create(&self, draft: NewProduct) -> CatalogResult<Product> {
        let product = Product::create(draft);
        let product = self.store.insert(product).await?;

        tracing::info!(
            product_id = %product.id,
            price = %product.price,
            updated_price = %product.updated_price,
            "Product created"
        );
        Ok(product)
    }

    /// Get a product by its raw path id
    pub async fn get(&self, raw_id: &str) -> CatalogResult<Product> {
        let id = Self::parse_id(raw_id)?;
        self.store
            .get(&id)
            .await?
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    /// Filter, sort and paginate the catalog
    pub async fn list(&self, params: &ListParams) -> CatalogResult<PaginatedResponse<Product>> {
        let query = params.build_query(&self.pagination)?;
        let page = self.store.find(&query).await?;

        tracing::debug!(
            total = page.total,
            returned = page.items.len(),
            page = query.window.page,
            limit = query.window.limit,
            "Listed products"
        );
        Ok(PaginatedResponse::new(page.items, query.window, page.total))
    }

    /// Merge a validated partial update into a stored product
    ///
    /// Concurrent updates of the same product are last-write-wins.
    pub async fn update(&self, raw_id: &str, patch: ProductPatch) -> CatalogResult<Product> {
        let mut product = self.get(raw_id).await?;
        let id = product.id;
        product.apply(patch);

        let product = self
            .store
            .replace(product)
            .await?
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;

        tracing::info!(
            product_id = %product.id,
            updated_price = %product.updated_price,
            "Product updated"
        );
        Ok(product)
    }

    /// Hard-delete a product, returning its id
    pub async fn delete(&self, raw_id: &str) -> CatalogResult<Uuid> {
        let id = Self::parse_id(raw_id)?;
        if !self.store.delete(&id).await? {
            return Err(CatalogError::NotFound { id: id.to_string() });
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(id)
    }
}
