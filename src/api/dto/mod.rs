//! Data Transfer Objects for API requests and responses.
//!
//! Resource bodies are the model types themselves; this module only holds
//! the shapes that are specific to the HTTP surface.

mod error;
mod health;
mod pagination;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::PaginationParams;
