//! Operator utilities, mounted only when `server.enable_debug_routes` is set.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use common::types::ApiResponse;
use models::Role;

use super::auth::AuthUser;
use crate::errors::JsonApiError;
use crate::extract::ValidJson;
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetRoleInput {
    pub email: String,
    pub role: String,
}

/// Identity claim next to what the middleware resolved for this request.
pub async fn user_role(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Value>>, JsonApiError> {
    let account = state
        .identity
        .find_by_uid(&user.uid)
        .await
        .map_err(|e| JsonApiError::from_identity(e, "Failed to fetch user role"))?;
    let claim = account.and_then(|a| a.role);
    Ok(Json(ApiResponse::ok(json!({
        "uid": user.uid,
        "email": user.email,
        "customClaims": { "role": claim },
        "tokenClaims": user,
    }))))
}

pub async fn set_role(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    ValidJson(input): ValidJson<SetRoleInput>,
) -> Result<Json<ApiResponse<()>>, JsonApiError> {
    if input.email.trim().is_empty() || input.role.trim().is_empty() {
        return Err(JsonApiError::bad_request("Email and role are required", None));
    }
    let role: Role = input.role.parse().map_err(|e: models::errors::ModelError| {
        JsonApiError::bad_request("Role must be either admin or worker", Some(e.to_string()))
    })?;
    let account = state
        .identity
        .find_by_email(&input.email)
        .await
        .map_err(|e| JsonApiError::from_identity(e, "Failed to set role"))?
        .ok_or_else(|| JsonApiError::new(axum::http::StatusCode::NOT_FOUND, "User not found", None))?;
    state.identity.set_role(&account.uid, role).await.map_err(|e| JsonApiError::from_identity(e, "Failed to set role"))?;
    warn!(by = %caller.uid, target = %account.uid, role = %role, "role_claim_set_via_debug");
    Ok(Json(ApiResponse::done(format!("Role {} set for user {}", role, account.email))))
}
