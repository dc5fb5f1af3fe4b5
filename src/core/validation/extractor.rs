//! Axum extractor for validated entities
//!
//! This module provides the `Validated<T>` extractor that validates and
//! filters request payloads before they reach handlers.

use super::config::EntityValidationConfig;
use crate::core::error::{CatalogError, RequestError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::Method,
};
use serde_json::Value;

/// Write operation a payload is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    /// Derive the operation from the HTTP method
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::PUT | Method::PATCH => Operation::Update,
            _ => Operation::Create,
        }
    }
}

/// Trait for entities that support validation
pub trait ValidatableEntity {
    /// Get the validation configuration for a specific operation
    fn validation_config(operation: Operation) -> EntityValidationConfig;

    /// Validate and filter a raw payload for `operation`
    fn validate(operation: Operation, payload: Value) -> Result<Value, ValidationError> {
        Self::validation_config(operation)
            .validate_and_filter(payload)
            .map_err(ValidationError::FieldErrors)
    }
}

/// Axum extractor that validates and filters entity data
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_product(
///     payload: Validated<Product>,
/// ) -> CatalogResult<Json<Value>> {
///     // payload is already validated and filtered
/// }
/// ```
pub struct Validated<T>(pub Value, pub std::marker::PhantomData<T>);

impl<T> Validated<T> {
    /// Create a new validated payload
    pub fn new(payload: Value) -> Self {
        Self(payload, std::marker::PhantomData)
    }

    /// Get the inner payload
    pub fn into_inner(self) -> Value {
        self.0
    }
}

// Allow dereferencing to Value
impl<T> std::ops::Deref for Validated<T> {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method());

        let Json(payload): Json<Value> = Json::from_request(req, state)
            .await
            .map_err(|e| RequestError::InvalidBody {
                message: e.body_text(),
            })?;

        let validated = T::validate(operation, payload)?;
        Ok(Validated::new(validated))
    }
}
