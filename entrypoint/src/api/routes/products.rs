use std::sync::Arc;

use axum::{
    Json, debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use common::{
    deserialize_disallow_empty_string::disallow_empty_string,
    product::{NewProduct, PriceHistoryEntry, Product},
    search_params::SearchParams,
    utils::get_current_time,
};
use metrics::{Metrics, put_metric};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{ServerState, routes::error_message_erasure::ApiError};

#[derive(Debug, Deserialize)]
pub(crate) struct CreatePayload {
    #[serde(deserialize_with = "disallow_empty_string")]
    url: String,
}

#[debug_handler]
pub(crate) async fn create_product_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePayload>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let start_time = Instant::now();

    let scraped = state
        .retailer
        .scrape_product(&payload.url)
        .await
        .inspect_err(|_| {
            put_metric!(Metrics::ScrapeFailed, 1, "operation" => "create");
        })?;

    let product = state
        .db
        .create(NewProduct::from_scrape(
            payload.url,
            scraped,
            get_current_time(),
        ))
        .await?;

    put_metric!(Metrics::ProductCreated, 1, "retailer" => state.retailer.get_retailer_name());

    info!("Tracking product {} ({})", product.id, product.url);
    debug!("Request time: {}ms", start_time.elapsed().as_millis());

    Ok((StatusCode::CREATED, Json(product)))
}

#[debug_handler]
pub(crate) async fn recheck_product_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Product>, ApiError> {
    let start_time = Instant::now();

    let Some(product) = state.db.get_by_id(&id).await? else {
        return Err(ApiError::NotFound(id));
    };

    let scraped = state
        .retailer
        .scrape_product(&product.url)
        .await
        .inspect_err(|_| {
            put_metric!(Metrics::ScrapeFailed, 1, "operation" => "recheck");
        })?;

    let entry = PriceHistoryEntry {
        price: scraped.price,
        date: get_current_time(),
    };

    // the product can only vanish between the two calls if something
    // outside the API deleted it
    let Some(updated) = state.db.update_price(&id, entry).await? else {
        return Err(ApiError::NotFound(id));
    };

    put_metric!(Metrics::PriceRechecked, 1, "retailer" => state.retailer.get_retailer_name());

    info!(
        "Rechecked product {}: {} -> {}",
        updated.id, product.current_price, updated.current_price
    );
    debug!("Request time: {}ms", start_time.elapsed().as_millis());

    Ok(Json(updated))
}

pub(crate) async fn list_products_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let start_time = Instant::now();

    let products = state.db.list_all().await?;

    debug!("Request time: {}ms", start_time.elapsed().as_millis());

    Ok(Json(products))
}

pub(crate) async fn search_products_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, ApiError>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let start_time = Instant::now();

    let params = SearchParams::from_query_pairs(pairs).map_err(ApiError::InvalidSearchParams)?;

    debug!("{:?}", params);

    let products = state.db.search(&params).await?;

    debug!(
        "Found {} products, request time: {}ms",
        products.len(),
        start_time.elapsed().as_millis()
    );

    Ok(Json(products))
}
