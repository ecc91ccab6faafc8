use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use axum::http::{HeaderValue, header::InvalidHeaderValue};
use clap::Parser;
use crawler::unprotected::CrawlerOptions;
use mongodb_connector::connector::ConnectionOptions;

#[derive(Debug, Parser)]
#[command(name = "api", about = "Tracks Flipkart product prices over HTTP")]
pub(crate) struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub(crate) host: IpAddr,

    #[arg(long, env = "API_PORT", default_value_t = 5000)]
    pub(crate) port: u16,

    #[arg(long, env = "MONGO_DB_URI", default_value = "mongodb://localhost:27017")]
    pub(crate) mongo_uri: String,

    #[arg(long, env = "MONGO_DB_NAME", default_value = "flipkartProducts")]
    pub(crate) database: String,

    /// Keep products in memory instead of MongoDB, everything is lost on exit
    #[arg(long, env = "API_IN_MEMORY")]
    pub(crate) in_memory: bool,

    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub(crate) fetch_timeout_secs: u64,

    /// Retries on transient fetch failures
    #[arg(long, env = "FETCH_RETRIES", default_value_t = 0)]
    pub(crate) fetch_retries: u32,

    #[arg(long, env = "FETCH_USER_AGENT")]
    pub(crate) user_agent: Option<String>,

    /// Comma separated CORS origins, any origin when empty
    #[arg(
        long = "allowed-origin",
        env = "API_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    pub(crate) allowed_origins: Vec<String>,

    /// OTLP/HTTP metrics endpoint, metrics are dropped when unset
    #[arg(long, env = "OTLP_METRICS_ENDPOINT")]
    pub(crate) otlp_endpoint: Option<String>,
}

impl Config {
    pub(crate) fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub(crate) fn crawler_options(&self) -> CrawlerOptions {
        let defaults = CrawlerOptions::default();

        CrawlerOptions {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            max_retries: self.fetch_retries,
            ..defaults
        }
    }

    pub(crate) fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            uri: self.mongo_uri.clone(),
            database: self.database.clone(),
        }
    }

    pub(crate) fn allowed_origins(&self) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
        self.allowed_origins
            .iter()
            .filter(|origin| !origin.trim().is_empty())
            .map(|origin| origin.trim().parse::<HeaderValue>())
            .collect()
    }
}
