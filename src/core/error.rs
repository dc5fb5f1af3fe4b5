//! Typed error handling for the catalog service
//!
//! Every failure a request can hit is one variant of [`CatalogError`], and
//! every variant is rendered by the same [`IntoResponse`] implementation into
//! the `{ "success": false, "message": ... }` envelope.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: field-scoped payload or query errors (400)
//! - [`RequestError`]: malformed JSON bodies or query strings (400)
//! - [`StorageError`]: document store failures (500, body sanitised)
//! - [`ConfigError`]: configuration loading problems (startup only)
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! async fn fetch(service: &ProductService, raw_id: &str) -> CatalogResult<Product> {
//!     service.get(raw_id).await
//! }
//!
//! match fetch(&service, "not-a-uuid").await {
//!     Err(CatalogError::MalformedId { id }) => println!("{} is not a product id", id),
//!     Err(e) => eprintln!("{}", e),
//!     Ok(product) => println!("{}", product.name),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Message sent to clients in place of store error details
pub const SANITIZED_SERVER_ERROR: &str = "Server Error";

/// The main error type for the catalog service
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Payload or query parameters failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product exists with this id
    #[error("Product not found")]
    NotFound { id: String },

    /// The id is not syntactically a product id; reported as not-found
    #[error("Invalid product id: {id}")]
    MalformedId { id: String },

    /// Malformed request (body or query string could not be parsed)
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Document store failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No route matched the request
    #[error("Route not found")]
    RouteNotFound,

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-scoped validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldValidationError>>,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::MalformedId { .. } => StatusCode::NOT_FOUND,
            CatalogError::Request(_) => StatusCode::BAD_REQUEST,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::RouteNotFound => StatusCode::NOT_FOUND,
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "VALIDATION_ERROR",
            CatalogError::NotFound { .. } => "PRODUCT_NOT_FOUND",
            CatalogError::MalformedId { .. } => "INVALID_PRODUCT_ID",
            CatalogError::Request(e) => e.error_code(),
            CatalogError::Storage(_) => "STORAGE_ERROR",
            CatalogError::RouteNotFound => "ROUTE_NOT_FOUND",
            CatalogError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Message safe to show to API clients
    ///
    /// Storage and configuration details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            CatalogError::Storage(_) | CatalogError::Config(_) => {
                SANITIZED_SERVER_ERROR.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        let errors = match self {
            CatalogError::Validation(e) => Some(e.field_errors().to_vec()),
            _ => None,
        };

        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            message: self.public_message(),
            errors,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("Validation failed: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

impl ValidationError {
    /// Shortcut for a single failing field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldErrors(vec![FieldValidationError::new(field, message)])
    }

    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::FieldErrors(errors) => errors,
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request body is not valid JSON (or not a JSON object)
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Query string could not be parsed
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the document store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// A stored document could not be mapped to a product
    #[error("Data integrity error: {message}")]
    IntegrityError { message: String },

    /// Backend not available
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A setting has an unusable value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error while reading configuration
    #[error("IO error reading configuration: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_deref()
        .map(|f| format!(" '{}'", f))
        .unwrap_or_default()
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
