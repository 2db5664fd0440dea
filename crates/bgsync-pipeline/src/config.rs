//! Pipeline configuration
//!
//! All settings come from the process environment (optionally seeded from a `.env` file)
//! and are validated once at startup. A missing or malformed required key is fatal.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Timeout of the candidate request to the photo API, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// JPEG quality for resized images. Matches the usual library default.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// The photo API rejects `count` above this value.
pub const MAX_IMAGE_COUNT: u32 = 30;

/// Default region when talking to S3 without an explicit one.
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Orientation filter accepted by the photo API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

impl FromStr for Orientation {
    type Err = PipelineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            "squarish" => Ok(Orientation::Squarish),
            other => Err(PipelineError::config(format!(
                "IMAGE_ORIENTATION must be landscape, portrait or squarish, got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an image or thumbnail step fails for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log, mark the step skipped and carry on with the run
    #[default]
    BestEffort,
    /// Abort the run on the first failed step
    FailFast,
}

/// Photo API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub api_url: String,
    pub client_id: String,
    pub image_count: u32,
    pub orientation: Orientation,
    /// Passed to the API verbatim
    pub search_keywords: String,
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resize target and encoding settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

/// Which object store receives the uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageBackend {
    S3(S3Settings),
    /// Write objects below a directory; intended for local runs
    Local { root: PathBuf },
}

/// Connection overrides for S3-compatible endpoints (MinIO, LocalStack)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct S3Settings {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub path_style: bool,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// Destination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    /// Prepended verbatim to every object key
    pub key_prefix: String,
    pub backend: StorageBackend,
}

/// Complete, validated pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source: SourceConfig,
    pub resize: ResizeConfig,
    pub storage: StorageConfig,
    pub failure_policy: FailurePolicy,
}

impl PipelineConfig {
    /// Load configuration from the environment, after reading `.env` if present
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let backend = match vars
            .optional("STORAGE_BACKEND")
            .unwrap_or_else(|| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3(S3Settings {
                endpoint: vars.optional("S3_ENDPOINT"),
                region: vars.optional("S3_REGION"),
                path_style: vars.parse_or("S3_PATH_STYLE", false)?,
                access_key: vars
                    .optional("S3_ACCESS_KEY")
                    .or_else(|| vars.optional("AWS_ACCESS_KEY_ID")),
                secret_key: vars
                    .optional("S3_SECRET_KEY")
                    .or_else(|| vars.optional("AWS_SECRET_ACCESS_KEY")),
            }),
            "local" => StorageBackend::Local {
                root: PathBuf::from(vars.required("LOCAL_STORAGE_DIR")?),
            },
            other => {
                return Err(PipelineError::config(format!(
                    "STORAGE_BACKEND must be s3 or local, got '{}'",
                    other
                )))
            },
        };

        let config = PipelineConfig {
            source: SourceConfig {
                api_url: vars.required("UNSPLASH_API_URL")?,
                client_id: vars.required("UNSPLASH_CLIENT_ID")?,
                image_count: vars.parse_required("IMAGE_COUNT")?,
                orientation: vars.required("IMAGE_ORIENTATION")?.parse()?,
                search_keywords: vars.required_allow_empty("SEARCH_KEYWORDS")?,
                timeout_secs: vars.parse_or("API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?,
            },
            resize: ResizeConfig {
                width: vars.parse_required("IMAGE_WIDTH")?,
                height: vars.parse_required("IMAGE_HEIGHT")?,
                jpeg_quality: vars.parse_or("JPEG_QUALITY", DEFAULT_JPEG_QUALITY)?,
            },
            storage: StorageConfig {
                bucket: vars.required("S3_BUCKET")?,
                key_prefix: vars.required_allow_empty("BG_IMAGES_PREFIX")?,
                backend,
            },
            failure_policy: if vars.parse_or("FAIL_FAST", false)? {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::BestEffort
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        if self.source.image_count == 0 || self.source.image_count > MAX_IMAGE_COUNT {
            return Err(PipelineError::config(format!(
                "IMAGE_COUNT must be between 1 and {}, got {}",
                MAX_IMAGE_COUNT, self.source.image_count
            )));
        }

        if self.resize.width == 0 || self.resize.height == 0 {
            return Err(PipelineError::config(format!(
                "IMAGE_WIDTH and IMAGE_HEIGHT must be greater than 0, got {}x{}",
                self.resize.width, self.resize.height
            )));
        }

        if !(1..=100).contains(&self.resize.jpeg_quality) {
            return Err(PipelineError::config(format!(
                "JPEG_QUALITY must be between 1 and 100, got {}",
                self.resize.jpeg_quality
            )));
        }

        if self.source.timeout_secs == 0 {
            return Err(PipelineError::config("API_TIMEOUT_SECS must be greater than 0"));
        }

        if !self.source.api_url.starts_with("http://") && !self.source.api_url.starts_with("https://") {
            return Err(PipelineError::config(format!(
                "UNSPLASH_API_URL must be an http(s) URL, got '{}'",
                self.source.api_url
            )));
        }

        if let StorageBackend::S3(ref s3) = self.storage.backend {
            if s3.access_key.is_some() != s3.secret_key.is_some() {
                return Err(PipelineError::config(
                    "S3_ACCESS_KEY and S3_SECRET_KEY must be set together",
                ));
            }
        }

        Ok(())
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| PipelineError::config(format!("{} is not set", key)))
    }

    fn required_allow_empty(&self, key: &str) -> Result<String> {
        (self.0)(key).ok_or_else(|| PipelineError::config(format!("{} is not set", key)))
    }

    fn parse_required<T: FromStr>(&self, key: &str) -> Result<T> {
        let raw = self.required(key)?;
        raw.trim()
            .parse()
            .map_err(|_| PipelineError::config(format!("{} has an invalid value '{}'", key, raw)))
    }

    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.optional(key) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                PipelineError::config(format!("{} has an invalid value '{}'", key, raw))
            }),
            None => Ok(default),
        }
    }
}
