//! Category request handlers, mounted under `/cat`.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    routing::put,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use super::missing_identifier;
use crate::api::doc::CATEGORY_TAG;
use crate::api::dto::{ErrorResponse, PaginationParams};
use crate::error::AppResult;
use crate::models::{Category, CategoryInput, Updated};
use crate::state::AppState;
use crate::utils::{IdPath, ValidatedJson};

pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories, create_category))
        .routes(routes!(get_category, update_category, delete_category))
        .route("/", put(missing_identifier).delete(missing_identifier))
}

#[utoipa::path(
    get,
    path = "/",
    tag = CATEGORY_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of categories", body = Vec<Category>)
    )
)]
async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.categories.list(params.resolve()).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Category not found")
    )
)]
async fn get_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Category>> {
    let category = state.services.categories.get(id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    post,
    path = "/",
    tag = CATEGORY_TAG,
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.services.categories.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Submitted fields with the category id", body = CategoryInput),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Category not found")
    )
)]
async fn update_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> AppResult<Json<Updated<CategoryInput>>> {
    let updated = state.services.categories.update(id, payload).await?;
    Ok(Json(updated))
}

/// Categories still referenced by a product cannot be deleted.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category is referenced by products", body = ErrorResponse)
    )
)]
async fn delete_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<StatusCode> {
    state.services.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
