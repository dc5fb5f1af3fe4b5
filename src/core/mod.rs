//! Core module containing the product model and the rules applied to it

pub mod error;
pub mod pricing;
pub mod product;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{CatalogError, CatalogResult};
pub use pricing::compute_updated_price;
pub use product::{NewProduct, Product, ProductPatch};
pub use query::{ListParams, PaginatedResponse, PaginationMeta, ProductPage, ProductQuery};
pub use service::ProductService;
pub use store::ProductStore;
