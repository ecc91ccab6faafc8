use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb_connector::errors::StoreError;
use retailers::errors::RetailerError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Errors leave the API as a status plus a generic message, the details only go to the logs.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error(transparent)]
    QueryExtractorRejection(#[from] QueryRejection),
    #[error(transparent)]
    JsonExtractorRejection(#[from] JsonRejection),
    #[error(transparent)]
    PathExtractorRejection(#[from] PathRejection),
    #[error("Invalid search params: {0}")]
    InvalidSearchParams(serde_json::Error),
    #[error("Product {0} not found")]
    NotFound(String),
    #[error("Failed to scrape product: {0}")]
    ScrapeFailed(#[from] RetailerError),
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::QueryExtractorRejection(rejection) => {
                debug!("Failed to parse incoming request: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            Self::JsonExtractorRejection(rejection) => {
                debug!("Failed to parse incoming request: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            Self::PathExtractorRejection(rejection) => {
                debug!("Failed to parse incoming request: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            Self::InvalidSearchParams(err) => {
                debug!("{}", err);
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            Self::NotFound(id) => {
                debug!("No product with id {}", id);
                (StatusCode::NOT_FOUND, "Product not found")
            }
            Self::ScrapeFailed(err) => {
                error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error fetching product details",
                )
            }
            Self::Store(err) => {
                error!("{}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
