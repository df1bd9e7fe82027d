use std::sync::Arc;

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tracing::{debug, info};

use configs::{StorageBackend, StorageConfig};

use super::{BlobStore, PutObject, StorageError, StorageStatus};

pub struct ObjectBlobStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
    public_base_url: String,
}

impl ObjectBlobStore {
    pub fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
        let config_err = |e: object_store::Error| StorageError::Config(e.to_string());
        let store: Arc<dyn ObjectStore> = match cfg.backend {
            StorageBackend::Gcs => {
                let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(&cfg.bucket);
                if let Some(path) = &cfg.service_account_path {
                    builder = builder.with_service_account_path(path);
                }
                Arc::new(builder.build().map_err(config_err)?)
            }
            StorageBackend::S3 => Arc::new(AmazonS3Builder::from_env().with_bucket_name(&cfg.bucket).build().map_err(config_err)?),
            StorageBackend::Local => {
                std::fs::create_dir_all(&cfg.local_root).map_err(|e| StorageError::Config(e.to_string()))?;
                Arc::new(LocalFileSystem::new_with_prefix(&cfg.local_root).map_err(config_err)?)
            }
            StorageBackend::Memory => Arc::new(InMemory::new()),
        };
        info!(backend = ?cfg.backend, bucket = %cfg.bucket, "blob_store_ready");
        Ok(Self {
            store,
            bucket: cfg.bucket.clone(),
            backend: cfg.backend,
            public_base_url: cfg.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Process-local store, used by tests and the `memory` backend.
    pub fn in_memory(bucket: &str, public_base_url: &str) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: bucket.to_string(),
            backend: StorageBackend::Memory,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn object_store(&self) -> Arc<dyn ObjectStore> {
        self.store.clone()
    }

    fn map_err(&self, e: object_store::Error) -> StorageError {
        let text = e.to_string();
        match e {
            object_store::Error::NotFound { .. } => StorageError::BucketMissing(self.bucket.clone()),
            _ if text.contains("does not exist") || text.contains("NoSuchBucket") => StorageError::BucketMissing(self.bucket.clone()),
            _ => StorageError::Backend(text),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }

    async fn put(&self, object: PutObject) -> Result<(), StorageError> {
        let path = Path::from(object.key.as_str());
        let mut attributes = Attributes::new();
        // The local filesystem backend rejects attributes.
        if self.backend != StorageBackend::Local {
            attributes.insert(Attribute::ContentType, object.content_type.into());
            for (name, value) in object.metadata {
                attributes.insert(Attribute::Metadata(name.into()), value.into());
            }
        }
        let opts = PutOptions { attributes, ..Default::default() };
        let size = object.body.len();
        self.store.put_opts(&path, PutPayload::from(object.body), opts).await.map_err(|e| self.map_err(e))?;
        debug!(key = %path, size, "blob_put");
        Ok(())
    }

    async fn probe(&self) -> Result<StorageStatus, StorageError> {
        let listing = self.store.list_with_delimiter(None).await.map_err(|e| self.map_err(e))?;
        Ok(StorageStatus {
            bucket_name: self.bucket.clone(),
            backend: format!("{:?}", self.backend).to_lowercase(),
            top_level_entries: listing.common_prefixes.len() + listing.objects.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn put_then_read_back() {
        let blobs = ObjectBlobStore::in_memory("shop-bucket", "https://storage.example.com/");
        blobs
            .put(PutObject {
                key: "bikes/1_a.png".into(),
                body: Bytes::from_static(b"png"),
                content_type: "image/png".into(),
                metadata: vec![("uploadedBy", "uid-1".into())],
            })
            .await
            .unwrap();

        let got = blobs.object_store().get(&Path::from("bikes/1_a.png")).await.unwrap();
        assert_eq!(got.attributes.get(&Attribute::ContentType).map(|v| AsRef::<str>::as_ref(v)), Some("image/png"));
        assert_eq!(got.bytes().await.unwrap(), Bytes::from_static(b"png"));
        assert_eq!(blobs.public_url("bikes/1_a.png"), "https://storage.example.com/shop-bucket/bikes/1_a.png");
    }

    #[tokio::test]
    async fn probe_counts_top_level_prefixes() {
        let blobs = ObjectBlobStore::in_memory("b", "http://x");
        for key in ["bikes/1.png", "bikes/2.png", "aadhars/3.png"] {
            blobs
                .put(PutObject { key: key.into(), body: Bytes::from_static(b"x"), content_type: "image/png".into(), metadata: vec![] })
                .await
                .unwrap();
        }
        let status = blobs.probe().await.unwrap();
        assert_eq!(status.bucket_name, "b");
        assert_eq!(status.backend, "memory");
        assert_eq!(status.top_level_entries, 2);
    }
}
