//! Object storage
//!
//! The pipeline writes through the [`ObjectStore`] trait so the destination can be S3 (or
//! any S3-compatible endpoint) in production and a plain directory during development.
//! A single store is built at startup and handed to the pipeline.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod local;
pub mod s3;

pub use local::LocalStore;
pub use s3::S3Store;

pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status a store reports for a successful write
pub const STATUS_OK: u16 = 200;

/// What a store reports back after a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub key: String,
    pub size: u64,
    /// Hex SHA-256 of the uploaded bytes
    pub checksum: String,
    /// HTTP-style status of the write
    pub status: u16,
}

impl PutReceipt {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human readable destination, used in logs
    fn describe(&self) -> String;

    /// Write `data` under `key`, replacing any existing object
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<PutReceipt>;
}

/// Object key naming: `<prefix><index>.jpg`, `<prefix><index>_thumbnail.jpg`,
/// `<prefix><index>.json`, with a 1-based index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn image(&self, index: usize) -> String {
        format!("{}{}.jpg", self.prefix, index)
    }

    pub fn thumbnail(&self, index: usize) -> String {
        format!("{}{}_thumbnail.jpg", self.prefix, index)
    }

    pub fn metadata(&self, index: usize) -> String {
        format!("{}{}.json", self.prefix, index)
    }
}

/// Build the store selected by the configuration
///
/// `aws_profile` only matters for the S3 backend without static credentials.
pub async fn connect(
    config: &StorageConfig,
    aws_profile: Option<&str>,
) -> Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match &config.backend {
        StorageBackend::S3(settings) => {
            Arc::new(S3Store::connect(&config.bucket, settings, aws_profile).await)
        },
        StorageBackend::Local { root } => Arc::new(LocalStore::new(root.join(&config.bucket))),
    };

    Ok(store)
}
