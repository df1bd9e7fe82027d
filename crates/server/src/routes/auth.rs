use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::{info, warn};

use common::types::ApiResponse;
use models::Role;
use service::identity::domain::{IssuedToken, LoginInput};

use crate::errors::JsonApiError;
use crate::extract::ValidJson;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Caller resolved by [`require_bearer_token_state`], available to handlers as an extension.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie.
/// A present but non-Bearer header is treated as no token.
fn token_from(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
    }
    CookieJar::from_headers(headers).get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty())
}

/// Verify the bearer token and attach an [`AuthUser`] to the request.
/// The role comes from the identity claim and defaults to worker.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let Some(token) = token_from(req.headers()) else {
        warn!(path = %path, "missing bearer token");
        return Err(JsonApiError::unauthorized("Unauthorized: No token provided"));
    };
    let who = state.identity.verify_token(&token).await.map_err(|e| {
        warn!(path = %path, err = %e, "token validation failed");
        JsonApiError::unauthorized("Unauthorized: Invalid token")
    })?;
    let role = match state.identity.role_of(&who.uid).await {
        Ok(claim) => claim.unwrap_or(Role::Worker),
        Err(e) if e.is_auth_failure() => {
            warn!(path = %path, uid = %who.uid, "token for unknown account");
            return Err(JsonApiError::unauthorized("Unauthorized: Invalid token"));
        }
        Err(e) => return Err(JsonApiError::from_identity(e, "Authentication failed")),
    };

    req.extensions_mut().insert(AuthUser { uid: who.uid, email: who.email, role });
    Ok(next.run(req).await)
}

/// Admin gate; must run after [`require_bearer_token_state`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, JsonApiError> {
    let Some(user) = req.extensions().get::<AuthUser>() else {
        return Err(JsonApiError::unauthorized("Unauthorized"));
    };
    if !user.is_admin() {
        warn!(uid = %user.uid, path = %req.uri().path(), "admin route denied");
        return Err(JsonApiError::forbidden());
    }
    Ok(next.run(req).await)
}

#[utoipa::path(
    post, path = "/api/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in"),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ValidJson(input): ValidJson<LoginInput>,
) -> Result<(CookieJar, Json<ApiResponse<IssuedToken>>), JsonApiError> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(JsonApiError::bad_request("Email and password are required", None));
    }
    let issued = state.identity.sign_in(&input.email, &input.password).await.map_err(|e| JsonApiError::from_identity(e, "Login failed"))?;

    let mut cookie = Cookie::new(AUTH_COOKIE, issued.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.settings.secure_cookies);
    cookie.set_same_site(SameSite::Lax);
    info!(uid = %issued.uid, role = %issued.role, "user_logged_in");
    Ok((jar.add(cookie), Json(ApiResponse::ok(issued).with_message("Login successful"))))
}
