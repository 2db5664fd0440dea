use crate::config::{S3Settings, DEFAULT_S3_REGION};
use crate::error::{PipelineError, Result};
use crate::storage::{ObjectStore, PutReceipt, STATUS_OK};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bgsync_common::checksum::sha256_hex;
use tracing::{debug, info, instrument};

/// S3 (or S3-compatible) bucket
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Wrap an existing client
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Resolve credentials and region, then build the client
    ///
    /// Static keys from the settings win; otherwise the default AWS provider chain is used
    /// (Lambda execution role, environment, or `aws_profile` from the shared config files).
    pub async fn connect(bucket: &str, settings: &S3Settings, aws_profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = aws_profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.path_style);

        if sdk_config.region().is_none() {
            builder = builder.region(Region::new(DEFAULT_S3_REGION));
        }

        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) = (&settings.access_key, &settings.secret_key) {
            builder = builder.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "bgsync-static",
            ));
        }

        info!(bucket, endpoint = ?settings.endpoint, "S3 client initialized");

        Self::new(Client::from_conf(builder.build()), bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn describe(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    #[instrument(skip(self, data))]
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<PutReceipt> {
        let checksum = sha256_hex(&data);
        let size = data.len() as u64;

        debug!("Uploading {} bytes to s3://{}/{}", size, self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                let status = e
                    .raw_response()
                    .map(|r| r.status().as_u16().to_string())
                    .unwrap_or_else(|| "no response".to_string());
                PipelineError::storage(key, format!("{} ({})", DisplayErrorContext(&e), status))
            })?;

        info!("Uploaded s3://{}/{}", self.bucket, key);

        Ok(PutReceipt {
            key: key.to_string(),
            size,
            checksum,
            status: STATUS_OK,
        })
    }
}
