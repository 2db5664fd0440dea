//! Image resizing
//!
//! Decodes the downloaded full-size image, stretches it to the configured dimensions with a
//! bilinear filter and re-encodes it as baseline JPEG. Aspect ratio is not preserved.
//!
//! Decoding and resampling are CPU bound, so async callers go through [`resize_blocking`].

use crate::config::ResizeConfig;
use crate::error::Result;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use tracing::debug;

/// Result of a resize
#[derive(Debug)]
pub struct ResizedImage {
    /// JPEG encoded bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Resize `original` to exactly `config.width` x `config.height` and encode as JPEG
pub fn resize(original: &[u8], config: &ResizeConfig) -> Result<ResizedImage> {
    let img = image::load_from_memory(original)?;

    let (orig_w, orig_h) = img.dimensions();
    debug!(
        original_width = orig_w,
        original_height = orig_h,
        width = config.width,
        height = config.height,
        "Resizing image"
    );

    // JPEG has no alpha channel; flatten to RGB before encoding
    let resized = img
        .resize_exact(config.width, config.height, FilterType::Triangle)
        .to_rgb8();

    let mut data = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut data, config.jpeg_quality);
        encoder.encode_image(&resized)?;
    }

    debug!(size = data.len(), "Encoded resized image");

    Ok(ResizedImage {
        data,
        width: resized.width(),
        height: resized.height(),
    })
}

/// [`resize`] on the blocking thread pool
pub async fn resize_blocking(original: Vec<u8>, config: ResizeConfig) -> Result<ResizedImage> {
    tokio::task::spawn_blocking(move || resize(&original, &config)).await?
}
