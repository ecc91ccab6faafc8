use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("Unprotected crawler middleware error: {0}")]
    UnprotectedClientMiddlewareGeneralError(String),
    #[error("Unprotected crawler general error: {0}")]
    UnprotectedClientGeneralError(reqwest::Error),
    #[error("Unprotected crawler failed to build client: {0}")]
    UnprotectedClientBuildFailed(String),
    #[error("Unprotected crawler failed to create header")]
    UnprotectedClientInvalidHeader,
    #[error("Request to {0} timed out")]
    Timeout(String),
    #[error("Request to {0} returned status {1}")]
    UnexpectedStatus(String, u16),
}

impl From<reqwest::Error> for CrawlerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let url = err
                .url()
                .map(|url| url.to_string())
                .unwrap_or_default();

            return Self::Timeout(url);
        }

        Self::UnprotectedClientGeneralError(err)
    }
}

impl From<reqwest_middleware::Error> for CrawlerError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => Self::from(err),
            reqwest_middleware::Error::Middleware(err) => {
                Self::UnprotectedClientMiddlewareGeneralError(err.to_string())
            }
        }
    }
}

impl From<InvalidHeaderName> for CrawlerError {
    fn from(_err: InvalidHeaderName) -> Self {
        Self::UnprotectedClientInvalidHeader
    }
}

impl From<InvalidHeaderValue> for CrawlerError {
    fn from(_err: InvalidHeaderValue) -> Self {
        Self::UnprotectedClientInvalidHeader
    }
}
