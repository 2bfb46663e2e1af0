//! Product request handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    routing::put,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use super::missing_identifier;
use crate::api::doc::PRODUCT_TAG;
use crate::api::dto::{ErrorResponse, PaginationParams};
use crate::error::AppResult;
use crate::models::{Product, ProductInput, ProductWithCategory, Updated};
use crate::state::AppState;
use crate::utils::{IdPath, ValidatedJson};

/// Routes:
/// - GET /        - List products joined with their category
/// - POST /       - Create a product
/// - GET /{id}    - Get product by ID
/// - PUT /{id}    - Overwrite product by ID
/// - DELETE /{id} - Delete product by ID
pub fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_products, create_product))
        .routes(routes!(get_product, update_product, delete_product))
        .route("/", put(missing_identifier).delete(missing_identifier))
}

/// Lists one page of products. Category columns are `null` when the product
/// has no category.
#[utoipa::path(
    get,
    path = "/",
    tag = PRODUCT_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of products", body = Vec<ProductWithCategory>)
    )
)]
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<ProductWithCategory>>> {
    let rows = state.services.products.list(params.resolve()).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Product not found")
    )
)]
async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Product>> {
    let product = state.services.products.get(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/",
    tag = PRODUCT_TAG,
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid request or unknown category", body = ErrorResponse)
    )
)]
async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.services.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Overwrites every field of a product and echoes the submitted fields.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Submitted fields with the product id", body = ProductInput),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Product not found")
    )
)]
async fn update_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<ProductInput>,
) -> AppResult<Json<Updated<ProductInput>>> {
    let updated = state.services.products.update(id, payload).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<StatusCode> {
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
