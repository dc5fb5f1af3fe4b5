//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! catalog-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Products live in the `products` collection. The product id is stored as
//! its string form in `_id`, timestamps as BSON dates and money fields as
//! doubles, so the collection stays readable from the mongo shell and
//! sortable by the server. Money read back is normalised to two decimal
//! places.
//!
//! `search` uses a `$text` query, which needs the text index created by
//! [`MongoProductStore::ensure_indexes`].

use crate::config::DatabaseConfig;
use crate::core::error::StorageError;
use crate::core::pricing::round_price;
use crate::core::product::Product;
use crate::core::query::{ProductFilter, ProductPage, ProductQuery, SortOrder};
use crate::core::store::{ProductStore, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::time::Duration;
use uuid::Uuid;

const BACKEND: &str = "mongodb";

/// Name of the product collection
pub const PRODUCTS_COLLECTION: &str = "products";

/// Largest skip the server accepts (a signed 64-bit count)
const MAX_SKIP: u64 = i64::MAX as u64;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn query_error(e: mongodb::error::Error) -> StorageError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: e.to_string(),
    }
}

fn connection_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::ConnectionError {
        backend: BACKEND.to_string(),
        message: e.to_string(),
    }
}

fn corrupt(field: &str, detail: impl std::fmt::Display) -> StorageError {
    StorageError::IntegrityError {
        message: format!("invalid product document field '{}': {}", field, detail),
    }
}

fn money_to_bson(field: &str, value: Decimal) -> StoreResult<Bson> {
    value
        .to_f64()
        .map(Bson::Double)
        .ok_or_else(|| corrupt(field, "not representable as a double"))
}

fn money_field(doc: &Document, field: &str) -> StoreResult<Decimal> {
    let value = match doc.get(field) {
        Some(Bson::Double(f)) => Decimal::from_f64(*f),
        Some(Bson::Int32(n)) => Some(Decimal::from(*n)),
        Some(Bson::Int64(n)) => Some(Decimal::from(*n)),
        other => return Err(corrupt(field, format!("expected a number, got {:?}", other))),
    };
    value
        .map(round_price)
        .ok_or_else(|| corrupt(field, "number out of range"))
}

fn str_field(doc: &Document, field: &str) -> StoreResult<String> {
    doc.get_str(field)
        .map(str::to_string)
        .map_err(|e| corrupt(field, e))
}

fn date_field(doc: &Document, field: &str) -> StoreResult<DateTime<Utc>> {
    let millis = doc
        .get_datetime(field)
        .map_err(|e| corrupt(field, e))?
        .timestamp_millis();
    DateTime::from_timestamp_millis(millis).ok_or_else(|| corrupt(field, "date out of range"))
}

fn stock_field(doc: &Document) -> StoreResult<u32> {
    let stock = match doc.get("stock") {
        None | Some(Bson::Null) => return Ok(0),
        Some(Bson::Int32(n)) => u32::try_from(*n).ok(),
        Some(Bson::Int64(n)) => u32::try_from(*n).ok(),
        Some(Bson::Double(f)) if f.fract() == 0.0 && *f >= 0.0 => f.to_u32(),
        _ => None,
    };
    stock.ok_or_else(|| corrupt("stock", "expected a non-negative integer"))
}

fn bson_date(value: &DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(value.timestamp_millis()))
}

/// Convert a product into its stored document form
pub fn product_to_document(product: &Product) -> StoreResult<Document> {
    Ok(doc! {
        "_id": product.id.to_string(),
        "name": product.name.as_str(),
        "price": money_to_bson("price", product.price)?,
        "discount": money_to_bson("discount", product.discount)?,
        "updatedPrice": money_to_bson("updatedPrice", product.updated_price)?,
        "image": product.image.as_str(),
        "creator": product.creator.as_str(),
        "description": product.description.as_str(),
        "stock": i64::from(product.stock),
        "createdAt": bson_date(&product.created_at),
        "updatedAt": bson_date(&product.updated_at),
    })
}

/// Convert a stored document back into a product
pub fn document_to_product(doc: &Document) -> StoreResult<Product> {
    let raw_id = str_field(doc, "_id")?;
    let id = Uuid::parse_str(&raw_id).map_err(|e| corrupt("_id", e))?;

    Ok(Product {
        id,
        name: str_field(doc, "name")?,
        price: money_field(doc, "price")?,
        discount: money_field(doc, "discount")?,
        updated_price: money_field(doc, "updatedPrice")?,
        image: str_field(doc, "image")?,
        creator: str_field(doc, "creator")?,
        description: doc.get_str("description").unwrap_or_default().to_string(),
        stock: stock_field(doc)?,
        created_at: date_field(doc, "createdAt")?,
        updated_at: date_field(doc, "updatedAt")?,
    })
}

/// Translate a product filter into a MongoDB query document
pub fn filter_document(filter: &ProductFilter) -> StoreResult<Document> {
    let mut query = Document::new();

    if let Some(search) = &filter.search {
        query.insert("$text", doc! { "$search": search.as_str() });
    }
    if let Some(name) = &filter.name {
        query.insert(
            "name",
            doc! { "$regex": regex::escape(name), "$options": "i" },
        );
    }
    if let Some(creator) = &filter.creator {
        query.insert("creator", creator.as_str());
    }

    let mut price = Document::new();
    if let Some(min) = filter.min_price {
        price.insert("$gte", money_to_bson("minPrice", min)?);
    }
    if let Some(max) = filter.max_price {
        price.insert("$lte", money_to_bson("maxPrice", max)?);
    }
    if !price.is_empty() {
        query.insert("price", price);
    }

    Ok(query)
}

// ---------------------------------------------------------------------------
// MongoProductStore
// ---------------------------------------------------------------------------

/// Product store backed by a MongoDB collection.
///
/// # Example
///
/// ```rust,ignore
/// use catalog::config::DatabaseConfig;
/// use catalog::storage::MongoProductStore;
///
/// let config = DatabaseConfig {
///     uri: Some("mongodb://localhost:27017".to_string()),
///     ..Default::default()
/// };
/// let store = MongoProductStore::connect(&config).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoProductStore {
    database: Database,
}

impl MongoProductStore {
    /// Create a store over an existing database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect with the configured timeouts, verify the server answers and
    /// create the indexes the queries rely on.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| connection_error("no connection uri configured"))?;

        let mut options = ClientOptions::parse(uri).await.map_err(connection_error)?;
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options).map_err(connection_error)?;
        let store = Self::new(client.database(&config.name));

        store.ping().await?;
        store.ensure_indexes().await?;

        tracing::info!(database = %config.name, "Connected to MongoDB");
        Ok(store)
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(PRODUCTS_COLLECTION)
    }

    /// Create the indexes used by list queries.
    ///
    /// - `name, description: text`: the `search` parameter
    /// - `creator: 1`: exact creator filter
    /// - `price: 1`: price range filter and sort
    /// - `createdAt: -1`: default sort
    ///
    /// This method is idempotent and safe to call on every startup.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "name": "text", "description": "text" })
                .build(),
            IndexModel::builder().keys(doc! { "creator": 1 }).build(),
            IndexModel::builder().keys(doc! { "price": 1 }).build(),
            IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Product>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(query_error)?;

        doc.as_ref().map(document_to_product).transpose()
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    /// Insert the product and read it back, so the returned value carries
    /// the stored precision.
    async fn insert(&self, product: Product) -> StoreResult<Product> {
        let doc = product_to_document(&product)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(query_error)?;

        self.find_by_id(&product.id).await?.ok_or_else(|| {
            StorageError::IntegrityError {
                message: format!("product {} not found after insert", product.id),
            }
        })
    }

    async fn get(&self, id: &Uuid) -> StoreResult<Option<Product>> {
        self.find_by_id(id).await
    }

    async fn find(&self, query: &ProductQuery) -> StoreResult<ProductPage> {
        let filter = filter_document(&query.filter)?;

        let total = self
            .collection()
            .count_documents(filter.clone())
            .await
            .map_err(query_error)?;

        let sort_key = query.sort.field.as_str();
        let direction = match query.sort.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };

        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { sort_key: direction })
            .skip(query.window.offset().min(MAX_SKIP))
            .limit(i64::try_from(query.window.limit).unwrap_or(i64::MAX))
            .await
            .map_err(query_error)?;

        let docs: Vec<Document> = cursor.try_collect().await.map_err(query_error)?;
        let items = docs
            .iter()
            .map(document_to_product)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(ProductPage { items, total })
    }

    async fn replace(&self, product: Product) -> StoreResult<Option<Product>> {
        let doc = product_to_document(&product)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": product.id.to_string() }, doc)
            .await
            .map_err(query_error)?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        self.find_by_id(&product.id).await
    }

    async fn delete(&self, id: &Uuid) -> StoreResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(query_error)?;

        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;
        Ok(())
    }
}
