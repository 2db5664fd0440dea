//! The image pipeline
//!
//! One run: build the request, fetch candidates, normalize them, then for every record in
//! response order upload the resized image, the thumbnail and the metadata JSON.
//!
//! Failure policy:
//! - fetch and normalization errors abort before anything is uploaded
//! - image/thumbnail failures are logged and recorded as skipped steps, or abort the run
//!   when the policy is [`FailurePolicy::FailFast`]
//! - a metadata write that fails or reports a non-200 status always aborts

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::imaging;
use crate::report::{RecordReport, RunReport, StepOutcome};
use crate::source::{build_request_url, normalize, ImageMetadata, ImageRecord, PhotoSource};
use crate::storage::{KeyLayout, ObjectStore, PutReceipt, CONTENT_TYPE_JPEG, CONTENT_TYPE_JSON};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

pub struct ImagePipeline {
    config: PipelineConfig,
    source: PhotoSource,
    store: Arc<dyn ObjectStore>,
    keys: KeyLayout,
}

impl ImagePipeline {
    pub fn new(config: PipelineConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        let source = PhotoSource::new(&config.source)?;
        let keys = KeyLayout::new(config.storage.key_prefix.clone());

        Ok(Self {
            config,
            source,
            store,
            keys,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one full run
    #[instrument(skip(self), fields(store = %self.store.describe()))]
    pub async fn run(&self) -> Result<RunReport> {
        info!("Operation started");

        let url = build_request_url(&self.config.source);
        let candidates = self.source.fetch_candidates(&url).await?;
        let records = normalize(&candidates)?;

        let mut report = RunReport::start();

        for (position, record) in records.iter().enumerate() {
            let index = position + 1;

            let record_report = self
                .process_record(record, index)
                .instrument(info_span!("record", index))
                .await?;

            report.push(record_report);
        }

        let report = report.finish();

        info!(
            run_id = %report.run_id,
            records = report.records.len(),
            succeeded = report.succeeded(),
            partial = report.partial(),
            failed = report.failed(),
            "Operation complete"
        );

        Ok(report)
    }

    async fn process_record(&self, record: &ImageRecord, index: usize) -> Result<RecordReport> {
        info!("Processing image");

        let (image, thumbnail) = self.upload_full_and_thumbnail(record, index).await?;
        let metadata = self.upload_metadata(&record.meta_data, index).await?;

        Ok(RecordReport {
            index,
            image,
            thumbnail,
            metadata,
        })
    }

    /// Upload the resized full image and the untouched thumbnail for record `index`
    pub async fn upload_full_and_thumbnail(
        &self,
        record: &ImageRecord,
        index: usize,
    ) -> Result<(StepOutcome, StepOutcome)> {
        let image = self.settle(index, "image", self.upload_full(record, index).await)?;
        let thumbnail = self.settle(index, "thumbnail", self.upload_thumbnail(record, index).await)?;

        Ok((image, thumbnail))
    }

    async fn upload_full(&self, record: &ImageRecord, index: usize) -> Result<PutReceipt> {
        let original = self.source.download(&record.image_url).await?;
        let resized = imaging::resize_blocking(original, self.config.resize).await?;

        self.put_checked(&self.keys.image(index), resized.data, CONTENT_TYPE_JPEG)
            .await
    }

    async fn upload_thumbnail(&self, record: &ImageRecord, index: usize) -> Result<PutReceipt> {
        let thumbnail = self.source.download(&record.thumbnail_url).await?;

        self.put_checked(&self.keys.thumbnail(index), thumbnail, CONTENT_TYPE_JPEG)
            .await
    }

    /// Upload `meta` as pretty-printed JSON; any failure is fatal
    pub async fn upload_metadata(&self, meta: &ImageMetadata, index: usize) -> Result<StepOutcome> {
        let key = self.keys.metadata(index);
        let body = serde_json::to_vec_pretty(meta)?;

        let receipt = self.put_checked(&key, body, CONTENT_TYPE_JSON).await.map_err(|e| {
            error!(key = %key, error = %e, "Metadata upload failed, aborting");
            e
        })?;

        Ok(uploaded(receipt))
    }

    async fn put_checked(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<PutReceipt> {
        let receipt = self.store.put_object(key, data, content_type).await?;

        debug!(
            key,
            size = receipt.size,
            checksum = %receipt.checksum,
            status = receipt.status,
            "Put completed"
        );

        if !receipt.is_success() {
            return Err(PipelineError::storage(
                key,
                format!("store reported status {}", receipt.status),
            ));
        }

        Ok(receipt)
    }

    /// Turn a step result into an outcome according to the failure policy
    fn settle(&self, index: usize, step: &str, result: Result<PutReceipt>) -> Result<StepOutcome> {
        match result {
            Ok(receipt) => Ok(uploaded(receipt)),
            Err(e) if e.is_skippable() => match self.config.failure_policy {
                FailurePolicy::BestEffort => {
                    warn!(index, step, error = %e, "Step failed, skipping");
                    Ok(StepOutcome::Skipped {
                        reason: e.to_string(),
                    })
                },
                FailurePolicy::FailFast => {
                    error!(index, step, error = %e, "Step failed, aborting run");
                    Err(PipelineError::RecordFailed {
                        index,
                        source: Box::new(e),
                    })
                },
            },
            Err(e) => Err(e),
        }
    }
}

fn uploaded(receipt: PutReceipt) -> StepOutcome {
    StepOutcome::Uploaded {
        key: receipt.key,
        size: receipt.size,
        checksum: receipt.checksum,
    }
}
