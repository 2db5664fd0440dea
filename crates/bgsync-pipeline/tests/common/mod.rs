//! Shared fixtures for pipeline integration tests
//!
//! A wiremock server stands in for both the photo API and its image CDN, and
//! [`RecordingStore`] captures every write instead of talking to S3.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use bgsync_common::checksum::sha256_hex;
use bgsync_pipeline::config::PipelineConfig;
use bgsync_pipeline::storage::{ObjectStore, PutReceipt, STATUS_OK};
use bgsync_pipeline::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_PREFIX: &str = "backgrounds/";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-memory store that records writes in order
///
/// Keys listed in `rejected` get a 503 receipt instead of being stored.
#[derive(Default)]
pub struct RecordingStore {
    objects: Mutex<Vec<StoredObject>>,
    rejected: Vec<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(keys: &[&str]) -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            rejected: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects().into_iter().map(|o| o.key).collect()
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects().into_iter().find(|o| o.key == key)
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    fn describe(&self) -> String {
        "memory://test".to_string()
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<PutReceipt> {
        let status = if self.rejected.iter().any(|k| k == key) { 503 } else { STATUS_OK };

        let receipt = PutReceipt {
            key: key.to_string(),
            size: data.len() as u64,
            checksum: sha256_hex(&data),
            status,
        };

        if status == STATUS_OK {
            self.objects.lock().unwrap().push(StoredObject {
                key: key.to_string(),
                data,
                content_type: content_type.to_string(),
            });
        }

        Ok(receipt)
    }
}

/// Pipeline configuration pointed at `api_url`, with optional overrides
pub fn test_config(api_url: &str, overrides: &[(&str, &str)]) -> PipelineConfig {
    let mut vars: HashMap<String, String> = [
        ("UNSPLASH_API_URL", api_url),
        ("UNSPLASH_CLIENT_ID", TEST_CLIENT_ID),
        ("IMAGE_COUNT", "3"),
        ("IMAGE_ORIENTATION", "landscape"),
        ("SEARCH_KEYWORDS", "nature"),
        ("IMAGE_WIDTH", "32"),
        ("IMAGE_HEIGHT", "20"),
        ("S3_BUCKET", "test-bucket"),
        ("BG_IMAGES_PREFIX", TEST_PREFIX),
        ("API_TIMEOUT_SECS", "5"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    PipelineConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

/// Solid-colour JPEG of the given size
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// One API record whose image URLs point back at `server`
pub fn photo_record(server: &MockServer, index: usize, last_name: Option<&str>) -> Value {
    let mut user = json!({ "first_name": format!("Photographer{}", index) });
    if let Some(last) = last_name {
        user["last_name"] = json!(last);
    }

    json!({
        "id": format!("photo-{}", index),
        "user": user,
        "links": { "html": format!("https://unsplash.example/photos/{}", index) },
        "urls": {
            "full": format!("{}/images/{}/full", server.uri(), index),
            "thumb": format!("{}/images/{}/thumb", server.uri(), index),
        }
    })
}

/// Mount the random-photo endpoint returning `body`
pub async fn mount_random(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .and(query_param("client_id", TEST_CLIENT_ID))
        .and(query_param("orientation", "landscape"))
        .and(query_param("query", "nature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve a full-size image and a thumbnail for record `index`
pub async fn mount_images(server: &MockServer, index: usize) {
    Mock::given(method("GET"))
        .and(path(format!("/images/{}/full", index)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(jpeg_bytes(120, 80)),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/images/{}/thumb", index)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(thumbnail_bytes(index)),
        )
        .mount(server)
        .await;
}

/// Thumbnails are stored untouched, so each one is distinguishable by size
pub fn thumbnail_bytes(index: usize) -> Vec<u8> {
    jpeg_bytes(8 + index as u32, 8)
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}/photos/", server.uri())
}
