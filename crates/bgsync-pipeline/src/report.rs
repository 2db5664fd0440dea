//! Per-record outcomes and the run summary

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of one upload step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Uploaded {
        key: String,
        size: u64,
        /// Hex SHA-256 of the stored bytes
        checksum: String,
    },
    Skipped { reason: String },
}

impl StepOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, StepOutcome::Uploaded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Image and thumbnail uploaded
    Success,
    /// One of image or thumbnail uploaded
    Partial,
    /// Neither image nor thumbnail uploaded
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    /// 1-based position in the API response
    pub index: usize,
    pub image: StepOutcome,
    pub thumbnail: StepOutcome,
    pub metadata: StepOutcome,
}

impl RecordReport {
    /// Metadata is not considered: a failed metadata write aborts the run instead
    pub fn status(&self) -> RecordStatus {
        match (self.image.is_uploaded(), self.thumbnail.is_uploaded()) {
            (true, true) => RecordStatus::Success,
            (false, false) => RecordStatus::Failed,
            _ => RecordStatus::Partial,
        }
    }
}

/// Summary of one invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records: Vec<RecordReport>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: RecordReport) {
        self.records.push(record);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    fn count(&self, status: RecordStatus) -> usize {
        self.records.iter().filter(|r| r.status() == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(RecordStatus::Success)
    }

    pub fn partial(&self) -> usize {
        self.count(RecordStatus::Partial)
    }

    pub fn failed(&self) -> usize {
        self.count(RecordStatus::Failed)
    }

    /// True when every record has both image and thumbnail
    pub fn is_complete(&self) -> bool {
        self.records.iter().all(|r| r.status() == RecordStatus::Success)
    }

    /// Keys of every object written during the run, in upload order
    pub fn uploaded_keys(&self) -> Vec<&str> {
        self.records
            .iter()
            .flat_map(|r| [&r.image, &r.thumbnail, &r.metadata])
            .filter_map(|step| match step {
                StepOutcome::Uploaded { key, .. } => Some(key.as_str()),
                StepOutcome::Skipped { .. } => None,
            })
            .collect()
    }
}
