use crawler::errors::CrawlerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetailerError {
    #[error("Failed to make web request: {0}")]
    FetchFailed(#[from] CrawlerError),
    #[error("Failed to parse price into a number: {0}")]
    InvalidNumber(String),
    #[error("Missing element {0} from HTML")]
    HtmlMissingElement(String),
}
