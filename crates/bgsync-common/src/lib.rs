//! bgsync Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared logging and checksum helpers for the bgsync workspace.
//!
//! # Overview
//!
//! - **Logging**: environment-driven `tracing` setup shared by every binary
//! - **Checksums**: SHA-256 digests recorded for uploaded objects
//!
//! # Example
//!
//! ```no_run
//! use bgsync_common::checksum::sha256_hex;
//! use bgsync_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!(checksum = %sha256_hex(b"payload"), "computed");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod logging;
