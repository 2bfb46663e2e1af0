//! User request handlers.
//!
//! Passwords are accepted on create and update but never returned.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    routing::put,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use super::missing_identifier;
use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, PaginationParams};
use crate::error::AppResult;
use crate::models::{Updated, User, UserInput};
use crate::state::AppState;
use crate::utils::{IdPath, ValidatedJson};

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
        .route("/", put(missing_identifier).delete(missing_identifier))
}

#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<User>)
    )
)]
async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list(params.resolve()).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "User not found")
    )
)]
async fn get_user(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<User>> {
    let user = state.services.users.get(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserInput,
    responses(
        (status = 200, description = "Submitted fields (without password) with the user id", body = UserInput),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found")
    )
)]
async fn update_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<UserInput>,
) -> AppResult<Json<Updated<UserInput>>> {
    let updated = state.services.users.update(id, payload).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
async fn delete_user(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
