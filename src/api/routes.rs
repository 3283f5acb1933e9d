//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{health, user_routes};
use super::middleware::{cors_layer, json_method_not_allowed, route_not_found, security_headers};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::API_PREFIX;

/// Create the application router with all routes configured.
///
/// `allowed_origins` empty means any origin may call the API.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(&format!("{}/user", API_PREFIX), user_routes())
        .fallback(route_not_found)
        // Global middleware, outermost last
        .layer(middleware::from_fn(json_method_not_allowed))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(allowed_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
