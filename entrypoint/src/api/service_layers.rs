use axum::http::{HeaderValue, Method, header};
use tower::{
    ServiceBuilder,
    layer::util::{Identity, Stack},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// An empty origin list allows any origin.
pub(crate) fn build_service_layers(
    allowed_origins: Vec<HeaderValue>,
) -> ServiceBuilder<Stack<CorsLayer, Identity>> {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins)
    };

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin);

    ServiceBuilder::new().layer(cors_layer)
}
