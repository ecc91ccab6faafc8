use async_trait::async_trait;
use common::product::ScrapedProduct;

use crate::errors::RetailerError;

#[async_trait]
pub trait Retailer {
    /// Fetches the page behind `url` and pulls the product fields out of it.
    async fn scrape_product(&self, url: &str) -> Result<ScrapedProduct, RetailerError>;

    fn get_retailer_name(&self) -> &'static str;
}
