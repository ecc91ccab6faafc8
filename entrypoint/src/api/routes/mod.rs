pub(crate) mod error_message_erasure;
pub(crate) mod products;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};

use crate::{
    ServerState,
    routes::products::{
        create_product_handler, list_products_handler, recheck_product_handler,
        search_products_handler,
    },
    service_layers::build_service_layers,
};

pub(crate) fn build_router(state: Arc<ServerState>, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route(
            "/api/products",
            post(create_product_handler).get(list_products_handler),
        )
        .route("/api/products/search", get(search_products_handler))
        .route("/api/products/{id}/recheck", post(recheck_product_handler))
        .layer(build_service_layers(allowed_origins))
        .with_state(state)
}
