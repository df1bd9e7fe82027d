use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use common::types::ApiResponse;
use service::errors::ServiceError;
use service::identity::errors::IdentityError;
use service::storage::StorageError;

/// Error rendered as the `{success:false, error, message?, data?}` envelope.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
    pub data: Option<Value>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
        Self { status, error: error.into(), message, data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn bad_request(error: impl Into<String>, message: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn unauthorized(error: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error, None)
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden: Insufficient permissions", None)
    }

    fn unavailable(detail: &str) -> Self {
        warn!(detail = %detail, "backing_store_unavailable");
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database not available",
            Some("The backing store is unreachable or its schema has not been migrated".into()),
        )
    }

    fn internal(fallback: &str, detail: &str) -> Self {
        error!(error = %detail, title = %fallback, "request_failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback, None)
    }

    /// Map a service failure onto a status and envelope. `fallback` is the
    /// operation-specific title used for anything unclassified.
    pub fn from_service(e: ServiceError, fallback: &str) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg, None),
            ServiceError::InvalidFields(fields) => Self::bad_request("Validation failed", None)
                .with_data(serde_json::to_value(fields).unwrap_or(Value::Null)),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg, None),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg, None),
            ServiceError::Unavailable(detail) => Self::unavailable(&detail),
            ServiceError::Db(detail) => Self::internal(fallback, &detail),
            ServiceError::Identity(e) => Self::from_identity(e, fallback),
            ServiceError::Storage(e) => Self::from_storage(e, fallback),
        }
    }

    pub fn from_identity(e: IdentityError, fallback: &str) -> Self {
        match e {
            IdentityError::Validation(msg) => Self::bad_request(msg, None),
            IdentityError::Conflict => Self::new(StatusCode::CONFLICT, "A user with this email already exists", None),
            IdentityError::NotFound => Self::new(StatusCode::NOT_FOUND, "User not found", None),
            IdentityError::InvalidCredentials => Self::unauthorized("Invalid email or password"),
            IdentityError::InvalidToken(_) => Self::unauthorized("Unauthorized: Invalid token"),
            IdentityError::Unavailable(detail) => Self::unavailable(&detail),
            other => Self::internal(fallback, &other.to_string()),
        }
    }

    /// Upload failures. A missing bucket on write is a 503; only the storage
    /// probe reports it as 404.
    pub fn from_upload(e: ServiceError) -> Self {
        match e {
            ServiceError::Storage(StorageError::BucketMissing(bucket)) => {
                warn!(bucket = %bucket, "upload_bucket_missing");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage service unavailable",
                    Some(format!("Storage bucket '{}' not found", bucket)),
                )
            }
            other => Self::from_service(other, "Failed to upload file"),
        }
    }

    pub fn from_storage(e: StorageError, fallback: &str) -> Self {
        match e {
            StorageError::BucketMissing(bucket) => Self::new(
                StatusCode::NOT_FOUND,
                "Storage bucket not found",
                Some(format!("Bucket '{}' does not exist or is not accessible", bucket)),
            ),
            other => Self::internal(fallback, &other.to_string()),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = ApiResponse::failure(self.error);
        body.data = self.data;
        body.message = self.message;
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
