mod selectors;

use async_trait::async_trait;
use common::{price::parse_localized_price, product::ScrapedProduct};
use crawler::{
    errors::CrawlerError,
    request::RequestBuilder,
    unprotected::{CrawlerOptions, UnprotectedCrawler},
};
use scraper::Html;
use tracing::{debug, error};

use crate::{errors::RetailerError, traits::Retailer, utils::html::select_first_text};

const RETAILER_NAME: &str = "Flipkart";

pub struct Flipkart {
    crawler: UnprotectedCrawler,
}

impl Flipkart {
    pub fn new(options: CrawlerOptions) -> Result<Self, CrawlerError> {
        Ok(Self {
            crawler: UnprotectedCrawler::new(options)?,
        })
    }
}

#[async_trait]
impl Retailer for Flipkart {
    async fn scrape_product(&self, url: &str) -> Result<ScrapedProduct, RetailerError> {
        let request = RequestBuilder::new()
            .set_url(url)
            .set_headers(&[
                ("accept".into(), "text/html,application/xhtml+xml".into()),
                ("accept-language".into(), "en-IN,en;q=0.9".into()),
            ])
            .build();

        let response = self.crawler.make_web_request(request).await?;

        parse_product_page(&response.body)
    }

    fn get_retailer_name(&self) -> &'static str {
        RETAILER_NAME
    }
}

/// Pulls the product fields out of a product page.
///
/// Text fields that are missing come back empty. The price is the only
/// field that has to be present and numeric.
pub fn parse_product_page(response: &str) -> Result<ScrapedProduct, RetailerError> {
    let html = Html::parse_document(response);

    let title = select_first_text(&html, &selectors::TITLE).unwrap_or_default();
    let description = select_first_text(&html, &selectors::DESCRIPTION).unwrap_or_default();
    let rating_summary = select_first_text(&html, &selectors::RATING_SUMMARY).unwrap_or_default();

    let Some(price_text) = select_first_text(&html, &selectors::PRICE) else {
        error!("Failed to find price element '{}'", selectors::PRICE_QUERY);
        return Err(RetailerError::HtmlMissingElement(
            selectors::PRICE_QUERY.into(),
        ));
    };

    let Some(price) = parse_localized_price(&price_text) else {
        error!("Failed to parse price {:?}", price_text);
        return Err(RetailerError::InvalidNumber(price_text));
    };

    let (total_purchases, reviews) = split_rating_summary(&rating_summary);

    let product = ScrapedProduct {
        title,
        description,
        price,
        reviews,
        total_purchases,
    };

    debug!("{:?}", product);

    Ok(product)
}

// "12,345 Ratings & 1,234 Reviews" -> ("12,345 Ratings", "1,234 Reviews")
// anything without the separator is used for both halves
fn split_rating_summary(summary: &str) -> (String, String) {
    match summary.split_once('&') {
        Some((ratings, reviews)) => (ratings.trim().into(), reviews.trim().into()),
        None => (summary.trim().into(), summary.trim().into()),
    }
}
