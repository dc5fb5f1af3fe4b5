//! Typed HTTP client and form model for the product API
//!
//! Enabled with the `client` feature.
//!
//! ```rust,ignore
//! use catalog::client::{ProductClient, ProductForm};
//!
//! let client = ProductClient::new("http://localhost:5000")?;
//!
//! let mut form = ProductForm::default();
//! form.name = "Widget".into();
//! form.price = "100".into();
//! form.discount = "25".into();
//! form.image = "http://x/y.png".into();
//! assert_eq!(form.preview_price().unwrap().to_string(), "75.00");
//!
//! let created = client.create(&form).await?;
//! let page = client.search("widget").await?;
//! ```

use crate::core::pricing::{MAX_DISCOUNT, MAX_PRICE, compute_updated_price, normalize_amount};
use crate::core::product::Product;
use crate::core::query::{ListParams, PaginatedResponse};
use crate::server::handlers::{DataResponse, DeleteResponse};
use reqwest::{Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Message used when an error response carries no `message`
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Errors returned by [`ProductClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or the response not read
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// Form
// =============================================================================

/// Raw product form inputs, as typed by a user
///
/// Number inputs are kept as strings; the server coerces them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub discount: String,
    pub image: String,
    pub creator: String,
    pub description: String,
    pub stock: String,
}

impl ProductForm {
    /// Prefill the form for editing an existing product
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            discount: product.discount.to_string(),
            image: product.image.clone(),
            creator: product.creator.clone(),
            description: product.description.clone(),
            stock: product.stock.to_string(),
        }
    }

    /// Sale price the server will store for the current inputs
    ///
    /// Price and discount are normalised to cents first, exactly as the
    /// server does before repricing. `None` while the inputs would be
    /// rejected: a price that is not in `(0, 1_000_000]` or a discount that
    /// is neither blank nor in `[0, 100]`.
    pub fn preview_price(&self) -> Option<Decimal> {
        let price = normalize_amount(&self.price)
            .filter(|p| *p > Decimal::ZERO && *p <= MAX_PRICE)?;
        let discount = match self.discount.trim() {
            "" => None,
            raw => Some(
                normalize_amount(raw).filter(|d| (Decimal::ZERO..=MAX_DISCOUNT).contains(d))?,
            ),
        };
        Some(compute_updated_price(price, discount))
    }

    /// Request body for create or update
    ///
    /// Blank inputs are left out, so an update keeps the stored value.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        for (field, value) in [
            ("name", &self.name),
            ("price", &self.price),
            ("discount", &self.discount),
            ("image", &self.image),
            ("creator", &self.creator),
            ("description", &self.description),
            ("stock", &self.stock),
        ] {
            if !value.trim().is_empty() {
                payload.insert(field.to_string(), Value::String(value.clone()));
            }
        }
        Value::Object(payload)
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for `/api/products`
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Client with the default 10 second timeout
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/api/products/{}", self.base_url, id)
    }

    /// List products with filters, sort and pagination
    pub async fn list(&self, params: &ListParams) -> ClientResult<PaginatedResponse<Product>> {
        let response = self.http.get(self.products_url()).query(params).send().await?;
        handle(response).await
    }

    /// Full-text search, first page with default size
    pub async fn search(&self, term: &str) -> ClientResult<PaginatedResponse<Product>> {
        self.list(&ListParams::search(term)).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Product> {
        let response = self.http.get(self.product_url(id)).send().await?;
        let body: DataResponse<Product> = handle(response).await?;
        Ok(body.data)
    }

    pub async fn create(&self, form: &ProductForm) -> ClientResult<Product> {
        let response = self
            .http
            .post(self.products_url())
            .json(&form.to_payload())
            .send()
            .await?;
        let body: DataResponse<Product> = handle(response).await?;
        Ok(body.data)
    }

    pub async fn update(&self, id: &str, form: &ProductForm) -> ClientResult<Product> {
        let response = self
            .http
            .put(self.product_url(id))
            .json(&form.to_payload())
            .send()
            .await?;
        let body: DataResponse<Product> = handle(response).await?;
        Ok(body.data)
    }

    /// Delete a product, returning the deleted id
    pub async fn delete(&self, id: &str) -> ClientResult<Uuid> {
        let response = self.http.delete(self.product_url(id)).send().await?;
        let body: DeleteResponse = handle(response).await?;
        Ok(body.data.id)
    }
}

/// Decode a success body, or turn an error body into [`ClientError::Api`]
async fn handle<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

    tracing::debug!(status = status.as_u16(), %message, "Product API request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
