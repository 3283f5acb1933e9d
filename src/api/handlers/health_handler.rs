//! Health check handler.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    name: String,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    database: ServiceStatus,
    cache: ServiceStatus,
}

/// Service status
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn disabled() -> Self {
        Self {
            status: "disabled",
            error: None,
        }
    }

    fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Health check with database and (when enabled) cache connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All services reachable", body = HealthResponse),
        (status = 503, description = "At least one service unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ServiceStatus::from_result(state.database.ping().await);

    let cache = match &state.cache {
        Some(cache) => ServiceStatus::from_result(cache.ping().await),
        None => ServiceStatus::disabled(),
    };

    let degraded = database.is_unhealthy() || cache.is_unhealthy();
    let status_code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        name: state.app_name.clone(),
        services: ServiceHealth { database, cache },
    };

    (status_code, Json(response))
}
