use std::{str::FromStr, time::Duration};

use reqwest::{
    ClientBuilder as BaseClientBuilder,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use reqwest_middleware::{ClientBuilder as RetryableClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, info};

use crate::{errors::CrawlerError, request::Request, traits::CrawlerResponse};

const PAGE_TIMEOUT_SECONDS: u64 = 30;
const PAGE_MIN_SECS_BACKOFF: u64 = 1;
const PAGE_MAX_SECS_BACKOFF: u64 = 10;

// Flipkart serves a stripped page to obvious bots
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct CrawlerOptions {
    pub timeout: Duration,
    pub user_agent: String,
    /// Retries on transient failures, zero keeps the one-request-per-call behaviour
    pub max_retries: u32,
}

impl Default for CrawlerOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(PAGE_TIMEOUT_SECONDS),
            user_agent: USER_AGENT.into(),
            max_retries: 0,
        }
    }
}

#[derive(Clone)]
pub struct UnprotectedCrawler {
    // reqwest clients are already Arc internally, cloning is cheap
    client: ClientWithMiddleware,
}

impl UnprotectedCrawler {
    pub fn new(options: CrawlerOptions) -> Result<Self, CrawlerError> {
        Ok(Self {
            client: Self::create_client(&options)?,
        })
    }

    fn create_client(options: &CrawlerOptions) -> Result<ClientWithMiddleware, CrawlerError> {
        let base_client = BaseClientBuilder::new()
            .gzip(true)
            .http1_ignore_invalid_headers_in_responses(true)
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|err| CrawlerError::UnprotectedClientBuildFailed(err.to_string()))?;

        let mut builder = RetryableClientBuilder::new(base_client);

        if options.max_retries > 0 {
            let retry_strat = ExponentialBackoff::builder()
                .retry_bounds(
                    Duration::from_secs(PAGE_MIN_SECS_BACKOFF),
                    Duration::from_secs(PAGE_MAX_SECS_BACKOFF),
                )
                .build_with_max_retries(options.max_retries);

            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_strat));
        }

        Ok(builder.build())
    }

    pub async fn make_web_request(
        &self,
        request: Request,
    ) -> Result<CrawlerResponse, CrawlerError> {
        let mut request_builder = self.client.get(request.url.clone());

        if let Some(headers) = request.headers {
            let mut header_map = HeaderMap::new();

            for (key, value) in headers.iter() {
                header_map.append(HeaderName::from_str(key)?, HeaderValue::from_str(value)?);
            }

            request_builder = request_builder.headers(header_map);
        }

        info!("Sending request to {}", request.url);

        let response = request_builder.send().await?;

        debug!("{response:?}");

        let status = response.status();

        if !status.is_success() {
            return Err(CrawlerError::UnexpectedStatus(request.url, status.as_u16()));
        }

        let body = response.text().await?;

        Ok(CrawlerResponse { body })
    }
}
