use async_trait::async_trait;
use common::{
    product::{NewProduct, PriceHistoryEntry, Product},
    search_params::SearchParams,
};

use crate::errors::StoreError;

#[async_trait]
pub trait ProductStore {
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// `None` for unknown ids, including strings that are not valid ids.
    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Appends to the price history and moves the current price in one
    /// atomic update, returns the updated product or `None` for unknown ids.
    async fn update_price(
        &self,
        id: &str,
        entry: PriceHistoryEntry,
    ) -> Result<Option<Product>, StoreError>;

    /// Every product, oldest first.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn search(&self, params: &SearchParams) -> Result<Vec<Product>, StoreError>;

    async fn shutdown(&self) {}
}
