use axum::{
    extract::{Path, State},
    Extension, Json,
};

use common::types::ApiResponse;
use models::sale;
use service::sales::domain::{MarkSoldInput, ResetSummary};

use super::auth::AuthUser;
use crate::errors::JsonApiError;
use crate::extract::ValidJson;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/api/sales/bike/{id}/sold", tag = "sales",
    params(("id" = String, Path, description = "Bike id")),
    request_body = crate::openapi::MarkSoldRequest,
    responses(
        (status = 200, description = "Sale recorded"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Bike not found"),
        (status = 409, description = "Bike is already sold")
    )
)]
pub async fn mark_sold(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<MarkSoldInput>,
) -> Result<Json<ApiResponse<sale::Model>>, JsonApiError> {
    let sale = state
        .sales
        .mark_sold(&id, &user.uid, input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to mark bike as sold"))?;
    Ok(Json(ApiResponse::ok(sale).with_message("Bike marked as sold successfully")))
}

#[utoipa::path(get, path = "/api/sales", tag = "sales", responses((status = 200, description = "Sales, newest first")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ApiResponse<Vec<sale::Model>>>, JsonApiError> {
    let sales = state.sales.list().await.map_err(|e| JsonApiError::from_service(e, "Failed to fetch sales"))?;
    Ok(Json(ApiResponse::ok(sales)))
}

#[utoipa::path(
    get, path = "/api/sales/{id}", tag = "sales",
    params(("id" = String, Path, description = "Sale id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Sale not found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<sale::Model>>, JsonApiError> {
    let sale = state.sales.get(&id).await.map_err(|e| JsonApiError::from_service(e, "Failed to fetch sale"))?;
    Ok(Json(ApiResponse::ok(sale)))
}

#[utoipa::path(
    get, path = "/api/sales/bike/{id}", tag = "sales",
    params(("id" = String, Path, description = "Bike id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Sale not found for this bike"))
)]
pub async fn by_bike(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ApiResponse<sale::Model>>, JsonApiError> {
    let sale = state.sales.by_bike(&id).await.map_err(|e| JsonApiError::from_service(e, "Failed to fetch sale"))?;
    Ok(Json(ApiResponse::ok(sale)))
}

#[utoipa::path(
    delete, path = "/api/sales/clear-all", tag = "sales",
    responses((status = 200, description = "All sales deleted, sold bikes reset"), (status = 403, description = "Admin only"))
)]
pub async fn clear_all(State(state): State<ServerState>) -> Result<Json<ApiResponse<ResetSummary>>, JsonApiError> {
    let summary = state.sales.reset_all().await.map_err(|e| JsonApiError::from_service(e, "Failed to clear sales data"))?;
    let message = format!(
        "Successfully cleared {} sales records and reset {} bikes to available status",
        summary.sales_deleted, summary.bikes_reset
    );
    Ok(Json(ApiResponse::ok(summary).with_message(message)))
}
