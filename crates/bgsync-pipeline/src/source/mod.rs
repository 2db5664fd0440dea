//! Photo API client
//!
//! Builds the random-photo request, fetches candidate records and downloads image bytes.
//! Only the candidate request has a timeout; image downloads use the transport default.

use crate::config::SourceConfig;
use crate::error::{PipelineError, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

pub mod models;

pub use models::{normalize, ImageMetadata, ImageRecord, RawRecord};

/// Build the random-photo request URL
///
/// The keyword is inserted verbatim; callers are responsible for passing something the API
/// accepts. Exactly one `/` separates the base URL from the `random` path segment.
pub fn build_request_url(config: &SourceConfig) -> String {
    format!(
        "{}/random?client_id={}&count={}&orientation={}&query={}",
        config.api_url.trim_end_matches('/'),
        config.client_id,
        config.image_count,
        config.orientation,
        config.search_keywords
    )
}

/// HTTP client for the photo API and its image CDN
#[derive(Clone)]
pub struct PhotoSource {
    api: Client,
    images: Client,
}

impl PhotoSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let api = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PipelineError::config(format!("Failed to build API client: {}", e)))?;

        let images = Client::builder()
            .build()
            .map_err(|e| PipelineError::config(format!("Failed to build image client: {}", e)))?;

        Ok(Self { api, images })
    }

    /// Request candidate records
    ///
    /// Transport errors, non-success statuses and non-array bodies are all
    /// [`PipelineError::FetchFailure`].
    #[instrument(skip(self, url))]
    pub async fn fetch_candidates(&self, url: &str) -> Result<Vec<Value>> {
        debug!("Requesting random photos");

        let response = self
            .api
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(redact(url), e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(redact(url), format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PipelineError::fetch(redact(url), e.without_url()))?;

        match body {
            Value::Array(records) => {
                info!(count = records.len(), "Fetched photo candidates");
                Ok(records)
            },
            other => Err(PipelineError::fetch(
                redact(url),
                format!("expected a JSON array, got {}", json_kind(&other)),
            )),
        }
    }

    /// Download an image; any failure is [`PipelineError::ImageDownloadFailure`]
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .images
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::download(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::download(url, format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::download(url, e))?;

        debug!(size = bytes.len(), "Downloaded image");

        Ok(bytes.to_vec())
    }
}

/// Strip the query string so the client id never reaches the logs
fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((path, _)) => format!("{}?<redacted>", path),
        None => url.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
