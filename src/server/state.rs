//! Application state shared across handlers

use crate::core::service::ProductService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(products: ProductService) -> Self {
        Self { products }
    }
}
