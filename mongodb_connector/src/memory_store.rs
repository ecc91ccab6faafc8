use async_trait::async_trait;
use common::{
    product::{NewProduct, PriceHistoryEntry, Product},
    search_params::SearchParams,
};
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{errors::StoreError, traits::ProductStore};

/// Keeps products in process memory, for tests and local runs without MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.with_id(ObjectId::new().to_hex());

        debug!("Inserted product {}", product.id);

        self.products.lock().await.push(product.clone());

        Ok(product)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.lock().await;

        Ok(products.iter().find(|product| product.id == id).cloned())
    }

    async fn update_price(
        &self,
        id: &str,
        entry: PriceHistoryEntry,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.lock().await;

        let Some(product) = products.iter_mut().find(|product| product.id == id) else {
            return Ok(None);
        };

        product.record_price(entry);

        Ok(Some(product.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.lock().await.clone())
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Product>, StoreError> {
        let products = self.products.lock().await;

        Ok(products
            .iter()
            .filter(|product| params.matches_title(&product.title))
            .filter(|product| params.matches_price(product.current_price))
            .cloned()
            .collect())
    }
}
