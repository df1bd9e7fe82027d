use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    Extension, Json,
};
use bytes::Bytes;
use tracing::warn;

use common::types::ApiResponse;
use service::storage::upload::{UploadRequest, UploadedFile};
use service::storage::StorageStatus;

use super::auth::AuthUser;
use crate::errors::JsonApiError;
use crate::state::ServerState;

fn bad_multipart(e: MultipartError) -> JsonApiError {
    warn!(err = %e, "multipart read failed");
    JsonApiError::bad_request("Invalid multipart body", Some(e.body_text()))
}

#[utoipa::path(
    post, path = "/api/upload", tag = "upload",
    request_body(content = crate::openapi::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored; returns the public URL"),
        (status = 400, description = "Missing file, bad type, non-image or too large"),
        (status = 503, description = "Storage service unavailable")
    )
)]
pub async fn upload(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<UploadedFile>>, JsonApiError> {
    let mut multipart = multipart.map_err(|e| JsonApiError::bad_request("Invalid multipart body", Some(e.body_text())))?;
    let max = state.uploads.max_bytes();
    let mut req = UploadRequest { category: None, file_name: None, content_type: None, bytes: None, uploaded_by: user.uid };

    while let Some(mut field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                req.file_name = field.file_name().map(str::to_string);
                req.content_type = field.content_type().map(str::to_string);
                let mut buf: Vec<u8> = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
                    if buf.len() + chunk.len() > max {
                        return Err(JsonApiError::from_upload(state.uploads.too_large()));
                    }
                    buf.extend_from_slice(&chunk);
                }
                req.bytes = Some(Bytes::from(buf));
            }
            "type" => req.category = Some(field.text().await.map_err(bad_multipart)?),
            _ => {}
        }
    }

    let stored = state.uploads.upload(req).await.map_err(JsonApiError::from_upload)?;
    Ok(Json(ApiResponse::ok(stored).with_message("File uploaded successfully")))
}

#[utoipa::path(
    get, path = "/api/storage/test", tag = "upload",
    responses(
        (status = 200, description = "Bucket reachable"),
        (status = 404, description = "Storage bucket not found"),
        (status = 500, description = "Storage configuration error")
    )
)]
pub async fn storage_test(State(state): State<ServerState>) -> Result<Json<ApiResponse<StorageStatus>>, JsonApiError> {
    let status = state.uploads.probe().await.map_err(|e| JsonApiError::from_service(e, "Storage configuration error"))?;
    Ok(Json(ApiResponse::ok(status).with_message("Storage is configured correctly")))
}
