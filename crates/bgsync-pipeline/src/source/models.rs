//! Photo API records and their normalized form

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The parts of a photo API record the pipeline reads. Everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub user: RawUser,
    pub links: RawLinks,
    pub urls: RawUrls,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLinks {
    /// Photographer's public profile page
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawUrls {
    pub full: String,
    pub thumb: String,
}

/// Description stored next to each image as `<prefix><index>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: String,
    pub profile: String,
}

/// A record ready for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_url: String,
    pub thumbnail_url: String,
    pub meta_data: ImageMetadata,
}

impl RawRecord {
    /// Parse one element of the API response. `index` is the 1-based position, used only for errors.
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        RawRecord::deserialize(value).map_err(|e| PipelineError::RecordShapeError {
            index,
            reason: e.to_string(),
        })
    }

    /// Simplify into the upload shape
    ///
    /// The display name is always `first + " " + last`, so a photographer with only a last
    /// name ends up with a leading space. Downstream consumers already rely on that.
    pub fn normalize(&self) -> ImageRecord {
        let first = or_empty(&self.user.first_name);
        let last = or_empty(&self.user.last_name);

        ImageRecord {
            image_url: self.urls.full.clone(),
            thumbnail_url: self.urls.thumb.clone(),
            meta_data: ImageMetadata {
                name: format!("{} {}", first, last),
                profile: or_empty(&self.links.html).to_string(),
            },
        }
    }
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Normalize a whole API response, preserving order
///
/// A record missing `user`, `links`, `urls.full` or `urls.thumb` aborts with
/// [`PipelineError::RecordShapeError`]; nothing is dropped silently.
pub fn normalize(records: &[Value]) -> Result<Vec<ImageRecord>> {
    records
        .iter()
        .enumerate()
        .map(|(position, value)| RawRecord::from_value(position + 1, value).map(|raw| raw.normalize()))
        .collect()
}
