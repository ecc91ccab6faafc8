use chrono::{DateTime, Utc};
use common::{
    product::{NewProduct, PriceHistoryEntry, Product},
    search_params::SearchParams,
};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId, to_bson},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::{
    constants::{COLLECTION_PRODUCTS_NAME, COLLECTION_PRODUCTS_PRICE_INDEX},
    errors::StoreError,
};

/// Shape of a product as it sits in MongoDB.
///
/// Older documents may be missing fields, anything optional falls back to
/// its default and gets validated in the conversion into [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductDocument {
    #[serde(rename = "_id")]
    pub(crate) id: ObjectId,
    #[serde(default)]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) current_price: f64,
    #[serde(default)]
    pub(crate) reviews: String,
    #[serde(default)]
    pub(crate) total_purchases: String,
    #[serde(default)]
    pub(crate) price_history: Vec<PriceHistoryDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct PriceHistoryDocument {
    pub(crate) price: f64,
    pub(crate) date: bson::DateTime,
}

impl From<PriceHistoryEntry> for PriceHistoryDocument {
    fn from(entry: PriceHistoryEntry) -> Self {
        Self {
            price: entry.price,
            date: bson::DateTime::from_millis(entry.date.timestamp_millis()),
        }
    }
}

impl ProductDocument {
    pub(crate) fn from_new(id: ObjectId, product: NewProduct) -> Self {
        Self {
            id,
            url: product.url,
            title: product.title,
            description: product.description,
            current_price: product.current_price,
            reviews: product.reviews,
            total_purchases: product.total_purchases,
            price_history: product
                .price_history
                .into_iter()
                .map(PriceHistoryDocument::from)
                .collect(),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = StoreError;

    fn try_from(document: ProductDocument) -> Result<Self, Self::Error> {
        let id = document.id.to_hex();

        let mut price_history = Vec::with_capacity(document.price_history.len());

        for entry in document.price_history {
            let Some(date) = DateTime::<Utc>::from_timestamp_millis(entry.date.timestamp_millis())
            else {
                return Err(StoreError::InvalidDocument(
                    id,
                    format!("date {} is out of range", entry.date),
                ));
            };

            price_history.push(PriceHistoryEntry {
                price: entry.price,
                date,
            });
        }

        let Some(latest) = price_history.last() else {
            return Err(StoreError::InvalidDocument(id, "empty price history".into()));
        };

        let mut current_price = document.current_price;

        if current_price != latest.price {
            warn!(
                "Product {} has current price {} but latest history entry {}, using the history",
                id, current_price, latest.price
            );
            current_price = latest.price;
        }

        Ok(Product {
            id,
            url: document.url,
            title: document.title,
            description: document.description,
            current_price,
            reviews: document.reviews,
            total_purchases: document.total_purchases,
            price_history,
        })
    }
}

/// Title is a literal case-insensitive substring, the price range is
/// inclusive and each bound can be left out.
pub(crate) fn search_filter(params: &SearchParams) -> Document {
    let mut filter = doc! {};

    if let Some(title) = &params.title {
        filter.insert(
            "title",
            doc! {
                "$regex": regex::escape(title),
                "$options": "i"
            },
        );
    }

    let mut price_filter = doc! {};

    if let Some(min_price) = params.min_price {
        price_filter.insert("$gte", min_price);
    }

    if let Some(max_price) = params.max_price {
        price_filter.insert("$lte", max_price);
    }

    if !price_filter.is_empty() {
        filter.insert("currentPrice", price_filter);
    }

    trace!("Search filter: {:#?}", filter);

    filter
}

/// The filter runs against the stored `currentPrice`, which can lag the
/// history on drifted documents. Re-applies the bounds to the repaired price.
pub(crate) fn retain_in_price_range(params: &SearchParams, products: &mut Vec<Product>) {
    products.retain(|product| {
        let in_range = params.matches_price(product.current_price);

        if !in_range {
            debug!(
                "Dropping product {} from search, repaired price {} is out of range",
                product.id, product.current_price
            );
        }

        in_range
    });
}

pub(crate) struct ProductsCollection {
    // mongodb structs are already Arc, thread safe
    collection: Collection<ProductDocument>,
}

impl ProductsCollection {
    pub(crate) async fn new(db: &Database) -> Result<Self, StoreError> {
        Self::create_collection(db).await?;
        Self::create_indexes(db).await?;

        Ok(Self {
            collection: db.collection::<ProductDocument>(COLLECTION_PRODUCTS_NAME),
        })
    }

    async fn create_collection(db: &Database) -> Result<(), StoreError> {
        let existing = db.list_collection_names().await?;

        if existing.iter().any(|name| name == COLLECTION_PRODUCTS_NAME) {
            debug!("Collection {COLLECTION_PRODUCTS_NAME} already exists");
            return Ok(());
        }

        info!("Creating collection {COLLECTION_PRODUCTS_NAME}");

        db.create_collection(COLLECTION_PRODUCTS_NAME).await?;

        Ok(())
    }

    async fn create_indexes(db: &Database) -> Result<(), StoreError> {
        let price_index = IndexModel::builder()
            .keys(doc! {
                "currentPrice": 1,
            })
            .options(
                IndexOptions::builder()
                    .name(COLLECTION_PRODUCTS_PRICE_INDEX.to_string())
                    .build(),
            )
            .build();

        db.collection::<ProductDocument>(COLLECTION_PRODUCTS_NAME)
            .create_index(price_index)
            .await?;

        Ok(())
    }

    pub(crate) async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let document = ProductDocument::from_new(ObjectId::new(), product);

        self.collection.insert_one(&document).await?;

        debug!("Inserted product {}", document.id);

        Product::try_from(document)
    }

    // validates the document and writes a repaired currentPrice back, unless
    // the document changed since it was read
    async fn load_product(&self, document: ProductDocument) -> Result<Product, StoreError> {
        let id = document.id;
        let stored_price = document.current_price;
        let history_len = document.price_history.len() as i64;

        let product = Product::try_from(document)?;

        if product.current_price != stored_price {
            let result = self
                .collection
                .update_one(
                    doc! {
                        "_id": id,
                        "currentPrice": stored_price,
                        "priceHistory": { "$size": history_len },
                    },
                    doc! { "$set": { "currentPrice": product.current_price } },
                )
                .await?;

            debug!(
                "Repaired current price of product {} ({} modified)",
                id, result.modified_count
            );
        }

        Ok(product)
    }

    pub(crate) async fn find_product(&self, id: ObjectId) -> Result<Option<Product>, StoreError> {
        let Some(document) = self.collection.find_one(doc! { "_id": id }).await? else {
            return Ok(None);
        };

        self.load_product(document).await.map(Some)
    }

    pub(crate) async fn push_price(
        &self,
        id: ObjectId,
        entry: PriceHistoryEntry,
    ) -> Result<Option<Product>, StoreError> {
        let parsed_entry = to_bson(&PriceHistoryDocument::from(entry))?;

        self.collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$push": { "priceHistory": parsed_entry },
                    "$set": { "currentPrice": entry.price },
                },
            )
            .return_document(ReturnDocument::After)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    pub(crate) async fn find_products(&self, filter: Document) -> Result<Vec<Product>, StoreError> {
        let mut cursor = self.collection.find(filter).sort(doc! { "_id": 1 }).await?;

        let mut results: Vec<Product> = Vec::new();

        while cursor.advance().await? {
            let document = cursor.deserialize_current()?;

            results.push(self.load_product(document).await?);
        }

        Ok(results)
    }
}
