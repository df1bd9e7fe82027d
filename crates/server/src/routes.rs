use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod analytics;
pub mod auth;
pub mod bikes;
pub mod debug;
pub mod sales;
pub mod upload;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "message": "Bike Management API",
        "endpoints": {
            "health": "/health",
            "bikes": "/api/bikes",
            "sales": "/api/sales",
            "analytics": "/api/analytics",
            "users": "/api/users",
            "docs": "/docs"
        }
    }))
}

async fn not_found() -> JsonApiError {
    JsonApiError::new(StatusCode::NOT_FOUND, "Route not found", None)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    error!(panic = %detail, "handler_panicked");
    JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None).into_response()
}

/// Origin list from config; an empty list allows any origin.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, HeaderName::from_static("x-requested-with")])
        .allow_credentials(true)
}

/// Build the full application router: public, authenticated and admin-only routes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let authenticate = middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state);
    // Room for multipart framing so the handler, not the transport, rejects oversized files.
    let upload_limit = DefaultBodyLimit::max(state.settings.max_upload_bytes.saturating_mul(2).max(1024 * 1024));

    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/login", post(auth::login));

    let mut protected = Router::new()
        .route("/api/bikes", get(bikes::list).post(bikes::create))
        .route("/api/bikes/:id", get(bikes::get).put(bikes::update).delete(bikes::delete))
        .route("/api/sales", get(sales::list))
        .route("/api/sales/:id", get(sales::get))
        .route("/api/sales/bike/:id", get(sales::by_bike))
        .route("/api/sales/bike/:id/sold", post(sales::mark_sold))
        .route("/api/upload", post(upload::upload).layer(upload_limit))
        .route("/api/storage/test", get(upload::storage_test));
    if state.settings.enable_debug_routes {
        protected = protected.route("/api/debug/user-role", get(debug::user_role));
    }

    let mut admin = Router::new()
        .route("/api/analytics/kpi", get(analytics::kpi))
        .route("/api/analytics/monthly-sales", get(analytics::monthly_sales))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/api/sales/clear-all", delete(sales::clear_all));
    if state.settings.enable_debug_routes {
        admin = admin.route("/api/debug/set-role", post(debug::set_role));
    }
    let admin = admin.route_layer(middleware::from_fn(auth::require_admin)).route_layer(authenticate.clone());

    public
        .merge(protected.route_layer(authenticate))
        .merge(admin)
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(SetResponseHeaderLayer::overriding(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")))
        .layer(SetResponseHeaderLayer::overriding(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")))
        .layer(SetResponseHeaderLayer::overriding(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .layer(CatchPanicLayer::custom(panic_response))
}
