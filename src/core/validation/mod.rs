//! Validation and filtering system
//!
//! This module provides a declarative approach to validating and filtering
//! product payloads before they reach the service layer.

pub mod config;
pub mod extractor;
pub mod filters;
pub mod product;
pub mod validators;

pub use config::EntityValidationConfig;
pub use extractor::{Operation, ValidatableEntity, Validated};
