//! HTTP request handlers, one module per resource.

pub mod categories;
pub mod health;
pub mod products;
pub mod users;

use crate::error::AppError;

/// Answers `PUT` and `DELETE` on a collection path, which lack the `{id}`
/// segment those verbs require.
pub async fn missing_identifier() -> AppError {
    AppError::BadRequest {
        message: "A resource id is required in the path".to_string(),
    }
}
