use async_trait::async_trait;
use common::{
    product::{NewProduct, PriceHistoryEntry, Product},
    search_params::SearchParams,
};
use mongodb::{
    Client,
    bson::{doc, oid::ObjectId},
};
use tracing::{debug, info};

use crate::{
    collections::products::{ProductsCollection, retain_in_price_range, search_filter},
    errors::StoreError,
    traits::ProductStore,
};

#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub uri: String,
    pub database: String,
}

pub struct MongoDBConnector {
    client: Client,
    products: ProductsCollection,
}

impl MongoDBConnector {
    pub async fn new(options: ConnectionOptions) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&options.uri).await?;
        let db = client.database(&options.database);

        let products = ProductsCollection::new(&db).await?;

        info!("Connected to MongoDB database {}", options.database);

        Ok(Self { client, products })
    }
}

fn parse_id(id: &str) -> Option<ObjectId> {
    let Ok(object_id) = ObjectId::parse_str(id) else {
        debug!("Not a valid object id: {:?}", id);
        return None;
    };

    Some(object_id)
}

#[async_trait]
impl ProductStore for MongoDBConnector {
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.products.insert_product(product).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let Some(object_id) = parse_id(id) else {
            return Ok(None);
        };

        self.products.find_product(object_id).await
    }

    async fn update_price(
        &self,
        id: &str,
        entry: PriceHistoryEntry,
    ) -> Result<Option<Product>, StoreError> {
        let Some(object_id) = parse_id(id) else {
            return Ok(None);
        };

        self.products.push_price(object_id, entry).await
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        self.products.find_products(doc! {}).await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Product>, StoreError> {
        let mut products = self.products.find_products(search_filter(params)).await?;

        retain_in_price_range(params, &mut products);

        Ok(products)
    }

    async fn shutdown(&self) {
        info!("Closing MongoDB connection");

        self.client.clone().shutdown().await;
    }
}
