//! Route table and HTTP layers

use super::handlers::{
    create_product, delete_product, get_product, health_check, list_products, root,
    route_not_found, update_product,
};
use super::state::AppState;
use crate::config::CorsConfig;
use axum::http::HeaderValue;
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the product API routes
///
/// - GET    /                      - Service banner
/// - GET    /health                - Liveness probe
/// - GET    /api/products          - List with filters, sort and pagination
/// - POST   /api/products          - Create
/// - GET    /api/products/{id}     - Read
/// - PUT    /api/products/{id}     - Partial update
/// - DELETE /api/products/{id}     - Delete
///
/// Anything else answers 404 `Route not found`.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .fallback(route_not_found)
        .with_state(state)
}

/// Build the complete application: routes plus CORS and request tracing
pub fn build_app(state: AppState, cors: &CorsConfig) -> Router {
    build_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors)),
    )
}

/// CORS policy; an empty origin list allows any origin
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
