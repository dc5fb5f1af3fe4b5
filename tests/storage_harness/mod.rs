//! Shared test harness for product store backends
//!
//! Provides product fixtures, a router factory and two test-suite macros:
//! `product_store_tests!` (the `ProductStore` contract) and
//! `rest_integration_tests!` (the HTTP API over a given store).
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! product_store_tests!(InMemoryProductStore::new());
//! rest_integration_tests!(InMemoryProductStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod product_store_tests;
#[macro_use]
pub mod rest_tests;

use axum::Router;
use catalog::config::PaginationConfig;
use catalog::core::product::{NewProduct, Product};
use catalog::core::query::{ListParams, ProductQuery};
use catalog::core::store::ProductStore;
use catalog::server::ServerBuilder;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid draft with the given name, price and creator
pub fn draft(name: &str, price: i64, creator: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: Decimal::from(price),
        discount: Decimal::ZERO,
        image: "http://x/y.png".to_string(),
        creator: creator.to_string(),
        description: format!("{} description", name),
        stock: 1,
    }
}

/// A new product ready to be inserted
pub fn product(name: &str, price: i64, creator: &str) -> Product {
    Product::create(draft(name, price, creator))
}

/// A valid create payload as a client would send it
pub fn payload(name: &str, price: f64) -> Value {
    json!({
        "name": name,
        "price": price,
        "image": "https://cdn.example.com/item.png"
    })
}

/// Resolve list parameters with the default pagination settings
pub fn query(params: ListParams) -> ProductQuery {
    params
        .build_query(&PaginationConfig::default())
        .expect("list parameters should be valid")
}

// ---------------------------------------------------------------------------
// Router factory
// ---------------------------------------------------------------------------

/// Build the full application router over a store
pub fn build_test_router(store: Arc<dyn ProductStore>) -> Router {
    ServerBuilder::new()
        .with_shared_store(store)
        .build()
        .expect("router should build")
}
