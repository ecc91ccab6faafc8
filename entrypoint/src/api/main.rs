mod config;
mod routes;
mod service_layers;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::http::header::InvalidHeaderValue;
use clap::Parser;
use crawler::errors::CrawlerError;
use metrics::MetricsError;
use mimalloc::MiMalloc;
use mongodb_connector::{
    connector::MongoDBConnector, errors::StoreError, memory_store::MemoryStore,
    traits::ProductStore,
};
use retailers::{retailers::flipkart::Flipkart, traits::Retailer};
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use utils::logger::configure_logger;

use crate::{config::Config, routes::build_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub(crate) struct ServerState {
    pub(crate) db: Arc<dyn ProductStore + Send + Sync>,
    pub(crate) retailer: Arc<dyn Retailer + Send + Sync>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("Failed to open product store: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to build crawler: {0}")]
    Crawler(#[from] CrawlerError),
    #[error("Failed to set up metrics: {0}")]
    Metrics(#[from] MetricsError),
    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(#[from] InvalidHeaderValue),
    #[error("Server failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    configure_logger();

    let config = Config::parse();

    if let Err(err) = run(config).await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    let metrics_handle = match &config.otlp_endpoint {
        Some(endpoint) => Some(metrics::install(endpoint)?),
        None => None,
    };

    let db: Arc<dyn ProductStore + Send + Sync> = if config.in_memory {
        warn!("Using in-memory store, products are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(MongoDBConnector::new(config.connection_options()).await?)
    };

    let state = Arc::new(ServerState {
        db: db.clone(),
        retailer: Arc::new(Flipkart::new(config.crawler_options())?),
    });

    let router = build_router(state, config.allowed_origins()?);

    let listener = TcpListener::bind(config.socket_addr()).await?;

    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.shutdown().await;

    if let Some(handle) = metrics_handle {
        handle.shutdown()?;
    }

    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
