//! # catalog
//!
//! A product catalog REST API: create, browse, edit and delete products,
//! with a discount pricing rule applied on every write and filtering,
//! sorting and pagination on read.
//!
//! ## Features
//!
//! - **Derived sale price**: `updatedPrice` is recomputed from `price` and
//!   `discount` before every write, never trusted from the client
//! - **Declarative validation**: per-field filters and validators, every
//!   failing field reported at once
//! - **List queries**: full-text search, name/creator/price filters,
//!   single-field sort and page/limit pagination
//! - **Pluggable storage**: in-memory store, MongoDB behind `mongodb_backend`
//! - **Typed client**: `ProductClient` and `ProductForm` behind `client`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_config(CatalogConfig::load()?)
//!         .with_store(InMemoryProductStore::new())
//!         .serve()
//!         .await
//! }
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{CatalogError, CatalogResult, FieldValidationError, StorageError, ValidationError},
        pricing::{compute_updated_price, discount_amount, round_price},
        product::{NewProduct, Product, ProductPatch},
        query::{ListParams, PaginatedResponse, PaginationMeta, ProductPage, ProductQuery},
        service::ProductService,
        store::ProductStore,
        validation::{Operation, ValidatableEntity, Validated},
    };

    // === Storage ===
    pub use crate::storage::InMemoryProductStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoProductStore;

    // === Config ===
    pub use crate::config::{CatalogConfig, PaginationConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === Client ===
    #[cfg(feature = "client")]
    pub use crate::client::{ClientError, ProductClient, ProductForm};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
