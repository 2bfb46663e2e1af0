//! Health check endpoint handlers.
//!
//! `/health` pings the store, `/health/live` only proves the process answers.

use std::collections::HashMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state).await;
    let status = database.status;

    let mut checks = HashMap::new();
    checks.insert("database".to_string(), database);

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now(),
        checks,
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(response))
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_database(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let outcome = tokio::time::timeout(state.query_timeout, state.store.ping()).await;
    let response_time_ms = Some(start.elapsed().as_millis() as u64);

    match outcome {
        Ok(Ok(())) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Connected".to_string()),
            response_time_ms,
        },
        Ok(Err(error)) => {
            tracing::warn!(error = ?error, "Health check could not reach the database");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some("Database unreachable".to_string()),
                response_time_ms,
            }
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = state.query_timeout.as_millis() as u64,
                "Health check timed out waiting for the database"
            );
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some("Database did not answer in time".to_string()),
                response_time_ms,
            }
        }
    }
}
