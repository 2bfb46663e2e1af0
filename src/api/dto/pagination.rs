//! Pagination query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::utils::PageRequest;

/// Raw `page` / `limit` query values.
///
/// Kept as strings so that a non-numeric value falls back to its default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-based), defaults to 1
    #[param(value_type = Option<i64>, minimum = 1, example = 1)]
    pub page: Option<String>,

    /// Rows per page, defaults to 10
    #[param(value_type = Option<i64>, minimum = 1, example = 10)]
    pub limit: Option<String>,
}

impl PaginationParams {
    pub fn resolve(&self) -> PageRequest {
        PageRequest::resolve(self.page.as_deref(), self.limit.as_deref())
    }
}
