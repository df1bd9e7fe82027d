use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use common::types::ApiResponse;
use models::user_profile;
use service::users::domain::{CreateUserInput, UpdateUserInput};

use crate::errors::JsonApiError;
use crate::extract::ValidJson;
use crate::state::ServerState;

#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All profiles"), (status = 403, description = "Admin only")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ApiResponse<Vec<user_profile::Model>>>, JsonApiError> {
    let users = state.users.list().await.map_err(|e| JsonApiError::from_service(e, "Failed to fetch users"))?;
    Ok(Json(ApiResponse::ok(users)))
}

#[utoipa::path(
    get, path = "/api/users/{id}", tag = "users",
    params(("id" = String, Path, description = "Identity uid")),
    responses((status = 200, description = "OK"), (status = 404, description = "User not found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<user_profile::Model>>, JsonApiError> {
    let user = state.users.get(&id).await.map_err(|e| JsonApiError::from_service(e, "Failed to fetch user"))?;
    Ok(Json(ApiResponse::ok(user)))
}

#[utoipa::path(
    post, path = "/api/users", tag = "users",
    request_body = crate::openapi::CreateUserRequest,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ValidJson(input): ValidJson<CreateUserInput>,
) -> Result<(StatusCode, Json<ApiResponse<user_profile::Model>>), JsonApiError> {
    let user = state.users.create(input).await.map_err(|e| JsonApiError::from_service(e, "Failed to create user"))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user).with_message("User created successfully"))))
}

#[utoipa::path(
    put, path = "/api/users/{id}", tag = "users",
    params(("id" = String, Path, description = "Identity uid")),
    request_body = crate::openapi::UpdateUserRequest,
    responses((status = 200, description = "Updated"), (status = 404, description = "User not found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<UpdateUserInput>,
) -> Result<Json<ApiResponse<user_profile::Model>>, JsonApiError> {
    let user = state.users.update(&id, input).await.map_err(|e| JsonApiError::from_service(e, "Failed to update user"))?;
    Ok(Json(ApiResponse::ok(user).with_message("User updated successfully")))
}

#[utoipa::path(
    delete, path = "/api/users/{id}", tag = "users",
    params(("id" = String, Path, description = "Identity uid")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "User not found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<()>>, JsonApiError> {
    state.users.delete(&id).await.map_err(|e| JsonApiError::from_service(e, "Failed to delete user"))?;
    Ok(Json(ApiResponse::done("User deleted successfully")))
}
