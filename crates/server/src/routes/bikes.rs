use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use common::types::ApiResponse;
use models::bike;
use service::inventory::domain::{CreateBikeInput, UpdateBikeInput};

use super::auth::AuthUser;
use crate::errors::JsonApiError;
use crate::extract::ValidJson;
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `available` or `sold`
    pub status: Option<String>,
}

#[utoipa::path(
    get, path = "/api/bikes", tag = "bikes",
    params(ListQuery),
    responses((status = 200, description = "Bikes, newest first"), (status = 400, description = "Bad status filter"))
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<bike::Model>>>, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request("Invalid query", Some(e.body_text())))?;
    let bikes = state
        .inventory
        .list(q.status.as_deref())
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch bikes"))?;
    info!(count = bikes.len(), "list bikes");
    Ok(Json(ApiResponse::ok(bikes).with_message("Bikes fetched successfully")))
}

#[utoipa::path(
    post, path = "/api/bikes", tag = "bikes",
    request_body = crate::openapi::CreateBikeRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation failed"))
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(input): ValidJson<CreateBikeInput>,
) -> Result<(StatusCode, Json<ApiResponse<bike::Model>>), JsonApiError> {
    let bike = state
        .inventory
        .create(&user.uid, input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to add bike"))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(bike).with_message("Bike added successfully"))))
}

#[utoipa::path(
    get, path = "/api/bikes/{id}", tag = "bikes",
    params(("id" = String, Path, description = "Bike id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Bike not found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<bike::Model>>, JsonApiError> {
    let bike = state.inventory.get(&id).await.map_err(|e| JsonApiError::from_service(e, "Failed to fetch bike"))?;
    Ok(Json(ApiResponse::ok(bike)))
}

#[utoipa::path(
    put, path = "/api/bikes/{id}", tag = "bikes",
    params(("id" = String, Path, description = "Bike id")),
    request_body = crate::openapi::UpdateBikeRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Bike not found"),
        (status = 409, description = "Purchase price of a sold bike")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<UpdateBikeInput>,
) -> Result<Json<ApiResponse<bike::Model>>, JsonApiError> {
    let bike = state.inventory.update(&id, input).await.map_err(|e| JsonApiError::from_service(e, "Failed to update bike"))?;
    Ok(Json(ApiResponse::ok(bike).with_message("Bike updated successfully")))
}

#[utoipa::path(
    delete, path = "/api/bikes/{id}", tag = "bikes",
    params(("id" = String, Path, description = "Bike id")),
    responses((status = 200, description = "Deleted with its sales"), (status = 404, description = "Bike not found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<()>>, JsonApiError> {
    state.inventory.delete(&id).await.map_err(|e| JsonApiError::from_service(e, "Failed to delete bike"))?;
    Ok(Json(ApiResponse::done("Bike and associated sales data deleted successfully")))
}
