//! Shared types for pagination and response envelopes.

mod pagination;
mod response;

pub use pagination::PaginationParams;
pub use response::{status_description, Acknowledged, ApiResponse, Created, Success};
