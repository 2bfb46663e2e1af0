//! `IntoResponse` for `AppError`.
//!
//! Status mapping:
//! - NotFound → 404, empty body
//! - BadRequest, Validation, ValidationErrors → 400, JSON body
//! - Conflict → 409, JSON body
//! - Database, ConnectionPool, PostWriteVerification, Configuration,
//!   Internal → 500, empty body
//!
//! Server-side causes are logged here and never leave the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = RequestId::current();

        let (status, body) = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => {
                tracing::debug!(%entity, %field, %value, "Resource not found");
                return StatusCode::NOT_FOUND.into_response();
            }
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", reason)
                    .with_details(json!({ "field": field })),
            ),
            AppError::ValidationErrors { errors } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(json!({ "errors": errors })),
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                ErrorResponse::new("CONFLICT", message),
            ),
            AppError::Database { .. }
            | AppError::ConnectionPool { .. }
            | AppError::PostWriteVerification { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => {
                tracing::error!(
                    request_id = request_id.as_deref().unwrap_or("unknown"),
                    error = ?self,
                    "Request failed"
                );
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (status, Json(body.with_request_id(request_id))).into_response()
    }
}
