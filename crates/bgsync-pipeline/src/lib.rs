//! bgsync Pipeline Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Fetches random photos from an Unsplash-compatible API, resizes them and uploads image,
//! thumbnail and metadata objects to S3.
//!
//! # Modules
//!
//! - [`config`]: typed configuration loaded from the environment
//! - [`source`]: photo API client, request building and record normalization
//! - [`imaging`]: exact-size JPEG resize
//! - [`storage`]: the [`storage::ObjectStore`] trait with S3 and local directory backends
//! - [`pipeline`]: the run orchestration
//! - [`report`]: per-record outcomes
//! - [`handler`]: the Lambda function handler
//!
//! # Example
//!
//! ```no_run
//! use bgsync_pipeline::{config::PipelineConfig, pipeline::ImagePipeline, storage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::load()?;
//!     let store = storage::connect(&config.storage, None).await?;
//!     let report = ImagePipeline::new(config, store)?.run().await?;
//!     println!("uploaded {} objects", report.uploaded_keys().len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod imaging;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod storage;

pub use error::{PipelineError, Result};
