//! API layer - HTTP handlers and middleware
//!
//! - Request handlers
//! - Middleware (request id, CORS, security headers, JSON routing errors)
//! - Validating extractors
//! - Route definitions and OpenAPI docs

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
