//! Query parameters, filtering and pagination
//!
//! `GET /api/products` accepts:
//!
//! ```text
//! GET /api/products?search=lamp
//! GET /api/products?creator=Acme&minPrice=10&maxPrice=50
//! GET /api/products?name=wid&sortBy=price&sortOrder=asc&page=2&limit=5
//! ```
//!
//! [`ListParams::build_query`] turns these into a [`ProductQuery`]: a filter,
//! a single-field sort and a pagination window. Stores evaluate the query
//! natively; [`ProductFilter::matches`] and [`SortSpec::compare`] give the
//! reference semantics used by the in-memory store.

use crate::config::PaginationConfig;
use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::product::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use validator::Validate;

/// Query parameters for listing products
///
/// All parameters are optional; defaults are applied by [`build_query`](Self::build_query).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    /// Full-text search over name and description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Case-insensitive partial match on name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Exact match on creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Inclusive lower bound on price
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    /// Inclusive upper bound on price
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    /// Sort field, `createdAt` by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// `asc` or `desc` (default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,

    /// Page number (starts at 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    /// Number of items per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Build a query from request parameters with the default pagination settings
pub fn build_query(params: &ListParams) -> Result<ProductQuery, ValidationError> {
    params.build_query(&PaginationConfig::default())
}

impl ListParams {
    /// Search parameters for a single term, as sent by the search box
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, falling back to the default and capped at the maximum
    pub fn limit(&self, pagination: &PaginationConfig) -> u64 {
        self.limit
            .unwrap_or(pagination.default_limit)
            .clamp(1, pagination.max_limit.max(1))
    }

    /// Translate the parameters into a filter, a sort and a page window
    pub fn build_query(&self, pagination: &PaginationConfig) -> Result<ProductQuery, ValidationError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors_from(&e),
        };

        let min_price = price_bound("minPrice", self.min_price, &mut errors);
        let max_price = price_bound("maxPrice", self.max_price, &mut errors);
        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            errors.push(FieldValidationError::new(
                "minPrice",
                "must not be greater than maxPrice",
            ));
        }

        let field = match non_empty(&self.sort_by) {
            None => SortField::default(),
            Some(raw) => SortField::parse(&raw).unwrap_or_else(|| {
                errors.push(FieldValidationError::new(
                    "sortBy",
                    format!("must be one of: {}", SortField::ALL_NAMES.join(", ")),
                ));
                SortField::default()
            }),
        };
        let order = match non_empty(&self.sort_order) {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(&raw).unwrap_or_else(|| {
                errors.push(FieldValidationError::new("sortOrder", "must be 'asc' or 'desc'"));
                SortOrder::default()
            }),
        };

        if !errors.is_empty() {
            return Err(ValidationError::FieldErrors(errors));
        }

        Ok(ProductQuery {
            filter: ProductFilter {
                search: non_empty(&self.search),
                name: non_empty(&self.name),
                creator: non_empty(&self.creator),
                min_price,
                max_price,
            },
            sort: SortSpec { field, order },
            window: PageWindow {
                page: self.page(),
                limit: self.limit(pagination),
            },
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn price_bound(
    field: &str,
    value: Option<f64>,
    errors: &mut Vec<FieldValidationError>,
) -> Option<Decimal> {
    let value = value?;
    match Decimal::from_str(&value.to_string()) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.push(FieldValidationError::new(field, "is out of range"));
            None
        }
    }
}

fn field_errors_from(errors: &validator::ValidationErrors) -> Vec<FieldValidationError> {
    let mut result: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldValidationError::new(field.clone(), message)
            })
        })
        .collect();
    result.sort_by(|a, b| a.field.cmp(&b.field));
    result
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Query model
// =============================================================================

/// A fully resolved product list query
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: SortSpec,
    pub window: PageWindow,
}

/// Conjunction of the optional product filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub name: Option<String>,
    pub creator: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Lower-cased whitespace-separated search terms
    pub fn search_terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    /// Reference evaluation of the filter against one product
    ///
    /// Search matches when any term occurs in the name or the description,
    /// ignoring case.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(creator) = &self.creator
            && &product.creator != creator
        {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if let Some(name) = &self.name
            && !product.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }

        let terms = self.search_terms();
        if !terms.is_empty() {
            let name = product.name.to_lowercase();
            let description = product.description.to_lowercase();
            return terms
                .iter()
                .any(|t| name.contains(t.as_str()) || description.contains(t.as_str()));
        }

        true
    }
}

/// Fields products can be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Price,
    UpdatedPrice,
    Discount,
    Stock,
    Creator,
}

impl SortField {
    pub const ALL_NAMES: [&'static str; 8] = [
        "createdAt",
        "updatedAt",
        "name",
        "price",
        "updatedPrice",
        "discount",
        "stock",
        "creator",
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            "name" => Some(SortField::Name),
            "price" => Some(SortField::Price),
            "updatedPrice" => Some(SortField::UpdatedPrice),
            "discount" => Some(SortField::Discount),
            "stock" => Some(SortField::Stock),
            "creator" => Some(SortField::Creator),
            _ => None,
        }
    }

    /// Field name as serialized in JSON and in stored documents
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::UpdatedPrice => "updatedPrice",
            SortField::Discount => "discount",
            SortField::Stock => "stock",
            SortField::Creator => "creator",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Single-field sort
///
/// Ties keep the store's natural order, which callers must not rely on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Price => a.price.cmp(&b.price),
            SortField::UpdatedPrice => a.updated_price.cmp(&b.updated_price),
            SortField::Discount => a.discount.cmp(&b.discount),
            SortField::Stock => a.stock.cmp(&b.stock),
            SortField::Creator => a.creator.cmp(&b.creator),
        };

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page number (starts at 1)
    pub page: u64,
    /// Number of items per page (at least 1)
    pub limit: u64,
}

impl PageWindow {
    /// Number of items before this page, saturating at `u64::MAX`
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

// =============================================================================
// Results
// =============================================================================

/// One page of products plus the number of products matching the filter
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
}

/// Paginated response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,

    /// Number of items in `data`
    pub count: usize,

    /// Total number of items matching the filter
    pub total: u64,

    /// Pagination metadata
    pub pagination: PaginationMeta,

    /// The paginated data
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self {
            success: true,
            count: data.len(),
            total,
            pagination: PaginationMeta::new(window.page, window.limit, total),
            data,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: u64,

    /// Number of items per page
    pub limit: u64,

    /// Total number of pages
    pub pages: u64,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let pages = total.div_ceil(limit);

        Self {
            page,
            limit,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}
