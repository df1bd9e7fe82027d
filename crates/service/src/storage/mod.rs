//! Blob storage for uploaded images.
//!
//! [`BlobStore`] is the seam; [`object_blob::ObjectBlobStore`] backs it with
//! `object_store` (GCS, S3, local disk or memory).

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub mod object_blob;
pub mod upload;

pub use object_blob::ObjectBlobStore;
pub use upload::{UploadCategory, UploadRequest, UploadService, UploadedFile};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage bucket not found: {0}")]
    BucketMissing(String),
    #[error("storage configuration error: {0}")]
    Config(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// One object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub metadata: Vec<(&'static str, String)>,
}

/// Reachability report for the configured bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub bucket_name: String,
    pub backend: String,
    pub top_level_entries: usize,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    fn bucket(&self) -> &str;
    /// Stable public URL for `key`; readability is a bucket policy concern.
    fn public_url(&self, key: &str) -> String;
    async fn put(&self, object: PutObject) -> Result<(), StorageError>;
    /// Cheap listing call proving the bucket exists and credentials work.
    async fn probe(&self) -> Result<StorageStatus, StorageError>;
}
