//! JSON bodies for routing failures.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// Handler for paths no route matches.
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

/// Replaces axum's empty 405 body with the standard envelope, keeping `Allow`.
pub async fn json_method_not_allowed(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut replaced = AppError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        replaced.headers_mut().insert(header::ALLOW, allow);
    }
    replaced
}
