use crate::error::{PipelineError, Result};
use crate::storage::{ObjectStore, PutReceipt, STATUS_OK};
use async_trait::async_trait;
use bgsync_common::checksum::sha256_hex;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Directory-backed store. Keys map to relative paths below `root`.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }

    #[instrument(skip(self, data, _content_type))]
    async fn put_object(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<PutReceipt> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::storage(key, e))?;
        }

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| PipelineError::storage(key, e))?;

        debug!(path = %path.display(), size = data.len(), "Wrote object");

        Ok(PutReceipt {
            key: key.to_string(),
            size: data.len() as u64,
            checksum: sha256_hex(&data),
            status: STATUS_OK,
        })
    }
}
