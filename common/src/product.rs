use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields pulled out of a single product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub reviews: String,
    pub total_purchases: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub price: f64,
    pub date: DateTime<Utc>,
}

/// A product that has been scraped but not stored yet, so it has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub url: String,
    pub title: String,
    pub description: String,
    pub current_price: f64,
    pub reviews: String,
    pub total_purchases: String,
    pub price_history: Vec<PriceHistoryEntry>,
}

impl NewProduct {
    /// Seeds the price history with the scraped price, observed at `date`.
    pub fn from_scrape(url: impl Into<String>, scraped: ScrapedProduct, date: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            title: scraped.title,
            description: scraped.description,
            current_price: scraped.price,
            reviews: scraped.reviews,
            total_purchases: scraped.total_purchases,
            price_history: vec![PriceHistoryEntry {
                price: scraped.price,
                date,
            }],
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            url: self.url,
            title: self.title,
            description: self.description,
            current_price: self.current_price,
            reviews: self.reviews,
            total_purchases: self.total_purchases,
            price_history: self.price_history,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub current_price: f64,
    pub reviews: String,
    pub total_purchases: String,
    pub price_history: Vec<PriceHistoryEntry>,
}

impl Product {
    /// Appends an observation and moves the current price along with it.
    pub fn record_price(&mut self, entry: PriceHistoryEntry) {
        self.current_price = entry.price;
        self.price_history.push(entry);
    }

    pub fn latest_entry(&self) -> Option<&PriceHistoryEntry> {
        self.price_history.last()
    }
}
