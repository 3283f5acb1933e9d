//! API middleware.

mod cors;
mod fallback;
mod security;

pub use cors::cors_layer;
pub use fallback::{json_method_not_allowed, route_not_found};
pub use security::security_headers;
