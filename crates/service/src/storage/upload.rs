use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use super::{BlobStore, PutObject, StorageStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Bike,
    Aadhar,
}

impl UploadCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "bike" => Some(Self::Bike),
            "aadhar" => Some(Self::Aadhar),
            _ => None,
        }
    }

    /// Top-level folder objects of this category are written under.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Bike => "bikes",
            Self::Aadhar => "aadhars",
        }
    }
}

/// Keep `[A-Za-z0-9.-]`, replace everything else with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "file".to_string() } else { cleaned }
}

pub fn object_key(category: UploadCategory, unix_millis: i64, original_name: &str) -> String {
    format!("{}/{}_{}", category.folder(), unix_millis, sanitize_file_name(original_name))
}

/// A multipart upload after the body has been read.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub category: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Option<Bytes>,
    pub uploaded_by: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub file_name: String,
    pub file_size: usize,
    pub content_type: String,
}

pub struct UploadService {
    blobs: Arc<dyn BlobStore>,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(blobs: Arc<dyn BlobStore>, max_bytes: usize) -> Self { Self { blobs, max_bytes } }

    pub fn max_bytes(&self) -> usize { self.max_bytes }

    pub fn too_large(&self) -> ServiceError {
        ServiceError::Validation(format!("File too large. Maximum size is {}MB", self.max_bytes / (1024 * 1024)))
    }

    /// Validate and store one image. Nothing reaches the blob store unless every check passes.
    #[instrument(skip(self, req), fields(uploaded_by = %req.uploaded_by))]
    pub async fn upload(&self, req: UploadRequest) -> Result<UploadedFile, ServiceError> {
        let Some(bytes) = req.bytes else {
            return Err(ServiceError::Validation("No file uploaded".into()));
        };
        let category = req
            .category
            .as_deref()
            .and_then(UploadCategory::parse)
            .ok_or_else(|| ServiceError::Validation("Invalid upload type. Must be \"bike\" or \"aadhar\"".into()))?;
        let content_type = req.content_type.unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(ServiceError::Validation("Only image files are allowed".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(self.too_large());
        }

        let original = req.file_name.unwrap_or_default();
        let now = Utc::now();
        let key = object_key(category, now.timestamp_millis(), &original);
        let file_size = bytes.len();
        self.blobs
            .put(PutObject {
                key: key.clone(),
                body: bytes,
                content_type: content_type.clone(),
                metadata: vec![
                    ("uploadedBy", req.uploaded_by.clone()),
                    ("uploadedAt", now.to_rfc3339()),
                    ("originalName", original),
                ],
            })
            .await?;

        info!(bucket = %self.blobs.bucket(), key = %key, size = file_size, "file_uploaded");
        Ok(UploadedFile { download_url: self.blobs.public_url(&key), file_name: key, file_size, content_type })
    }

    pub async fn probe(&self) -> Result<StorageStatus, ServiceError> {
        Ok(self.blobs.probe().await?)
    }
}
