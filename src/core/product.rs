//! Product entity and its write payloads

use crate::core::pricing::compute_updated_price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Creator recorded when the client does not name one
pub const DEFAULT_CREATOR: &str = "Unknown";

/// A catalog product as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    /// Sale price derived from `price` and `discount`
    #[serde(with = "rust_decimal::serde::float")]
    pub updated_price: Decimal,
    pub image: String,
    pub creator: String,
    pub description: String,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from a validated create payload
    ///
    /// Assigns the id and both timestamps and derives `updated_price`.
    pub fn create(draft: NewProduct) -> Self {
        let now = Utc::now();
        let mut product = Self {
            id: Uuid::new_v4(),
            name: draft.name,
            price: draft.price,
            discount: draft.discount,
            updated_price: draft.price,
            image: draft.image,
            creator: draft.creator,
            description: draft.description,
            stock: draft.stock,
            created_at: now,
            updated_at: now,
        };
        product.reprice();
        product
    }

    /// Merge a validated partial update into this product
    ///
    /// Re-derives `updated_price` and bumps `updated_at`. `id` and
    /// `created_at` are never touched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(discount) = patch.discount {
            self.discount = discount;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(creator) = patch.creator {
            self.creator = creator;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }

        self.reprice();
        self.touch();
    }

    /// Recompute the derived sale price
    pub fn reprice(&mut self) {
        self.updated_price = compute_updated_price(self.price, Some(self.discount));
    }

    /// Update the `updated_at` timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the product is sold below its list price
    pub fn is_discounted(&self) -> bool {
        self.discount > Decimal::ZERO
    }
}

/// Validated payload of `POST /api/products`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    pub image: String,
    #[serde(default = "default_creator")]
    pub creator: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: u32,
}

/// Validated payload of `PUT /api/products/{id}`
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
    pub image: Option<String>,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub stock: Option<u32>,
}

fn default_creator() -> String {
    DEFAULT_CREATOR.to_string()
}
