use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use common::types::ApiResponse;
use service::analytics::{KpiSummary, MonthlyBucket};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Raw query values; parsing happens in the service so errors share one shape.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KpiQuery {
    /// Calendar year, defaults to the current UTC year
    pub year: Option<String>,
    /// Zero-based month (0 = January)
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyQuery {
    pub year: Option<String>,
}

fn bad_query(e: QueryRejection) -> JsonApiError {
    JsonApiError::bad_request("Invalid query", Some(e.body_text()))
}

#[utoipa::path(
    get, path = "/api/analytics/kpi", tag = "analytics",
    params(KpiQuery),
    responses((status = 200, description = "KPI summary"), (status = 400, description = "Bad year or month"), (status = 403, description = "Admin only"))
)]
pub async fn kpi(
    State(state): State<ServerState>,
    query: Result<Query<KpiQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<KpiSummary>>, JsonApiError> {
    let Query(q) = query.map_err(bad_query)?;
    let summary = state
        .analytics
        .kpi(q.year.as_deref(), q.month.as_deref())
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch KPI data"))?;
    Ok(Json(ApiResponse::ok(summary)))
}

#[utoipa::path(
    get, path = "/api/analytics/monthly-sales", tag = "analytics",
    params(MonthlyQuery),
    responses((status = 200, description = "Twelve monthly buckets"), (status = 403, description = "Admin only"))
)]
pub async fn monthly_sales(
    State(state): State<ServerState>,
    query: Result<Query<MonthlyQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<MonthlyBucket>>>, JsonApiError> {
    let Query(q) = query.map_err(bad_query)?;
    let months = state
        .analytics
        .monthly(q.year.as_deref())
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch monthly sales data"))?;
    Ok(Json(ApiResponse::ok(months)))
}
